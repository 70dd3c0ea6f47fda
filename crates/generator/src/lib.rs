//! Bruno collection generation
//!
//! This crate transforms the descriptor IR into Bruno collection files:
//! - `bruno.json` collection config
//! - one environment file per configured endpoint
//! - an HTTP request per method with a `google.api.http` rule
//! - a gRPC request per method
//!
//! Generation is pure: it returns `(path, content)` pairs and leaves writing
//! them to the caller (see [`write_to_directory`]).

mod classifier;
mod example;
mod http_rule;
mod naming;
mod requests;
mod templates;

pub use classifier::{classify, place, BodySelector, FieldPartition, Placement};
pub use example::{ExampleBuilder, WellKnownType, MAX_DEPTH};
pub use http_rule::{decode_rule, extract_path_params, HttpVerb};
pub use naming::{
    build_endpoints, collection_prefix, derive_collection_name, derive_rpc_endpoint,
    format_package_name, pascal_case, EndpointConfig, DEFAULT_COLLECTION_NAME,
};
pub use requests::RequestRenderer;

use protoc_gen_bruno_common::{
    DescriptorSet, GeneratedFile, GeneratorConfig, GeneratorError, ProtoFile, Result,
};
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tera::{Context, Tera};

/// Directory, relative to a collection root, holding environment files
pub const ENVIRONMENTS_DIR: &str = "environments";

#[derive(Serialize)]
struct BrunoConfig<'a> {
    version: &'a str,
    name: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    grpc: Option<GrpcConfig<'a>>,
}

#[derive(Serialize)]
struct GrpcConfig<'a> {
    proto: ProtoConfig<'a>,
}

#[derive(Serialize)]
struct ProtoConfig<'a> {
    root: &'a str,
}

/// Bruno collection generator
///
/// Holds the run configuration, the endpoint list derived from it, and the
/// loaded templates. One instance can generate any number of descriptor sets.
pub struct CollectionGenerator {
    config: GeneratorConfig,
    endpoints: Vec<EndpointConfig>,
    tera: Tera,
}

impl CollectionGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        let tera = templates::load_templates()?;
        let endpoints = build_endpoints(&config);
        Ok(Self {
            config,
            endpoints,
            tera,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn endpoints(&self) -> &[EndpointConfig] {
        &self.endpoints
    }

    /// Generate every file for a descriptor set
    pub fn generate(&self, set: &DescriptorSet) -> Result<Vec<GeneratedFile>> {
        let mut emitted_groups = HashSet::new();
        self.generate_with_groups(set, &mut emitted_groups)
    }

    /// Generate every file, skipping collection config for groups already in
    /// `emitted_groups`
    ///
    /// Each collection prefix that receives a config is added to the set, so
    /// a caller can spread one collection over several calls.
    pub fn generate_with_groups(
        &self,
        set: &DescriptorSet,
        emitted_groups: &mut HashSet<String>,
    ) -> Result<Vec<GeneratedFile>> {
        let renderer = RequestRenderer::new(&self.tera, set);
        let mut files = Vec::new();

        for file in &set.files {
            let prefix = self.prefix_for(file);

            if !file.services.is_empty() && emitted_groups.insert(prefix.clone()) {
                files.extend(self.collection_config(set, &prefix)?);
            }

            files.extend(self.file_requests(&renderer, file, &prefix)?);
        }

        tracing::info!(
            files = files.len(),
            collections = emitted_groups.len(),
            mode = self.config.mode.as_str(),
            "generated Bruno collection"
        );

        Ok(files)
    }

    /// Output folder prefix for a file: empty for a single collection,
    /// otherwise derived from the package
    fn prefix_for(&self, file: &ProtoFile) -> String {
        if self.config.single_collection || file.services.is_empty() {
            String::new()
        } else {
            collection_prefix(&file.package)
        }
    }

    /// `bruno.json` and the environment files for one collection
    fn collection_config(&self, set: &DescriptorSet, prefix: &str) -> Result<Vec<GeneratedFile>> {
        let service_names: Vec<String> = set.services().map(|s| pascal_case(&s.name)).collect();
        let package = set.files.first().map_or("", |f| f.package.as_str());
        let name = derive_collection_name(
            self.config.collection_name.as_deref(),
            &service_names,
            package,
        );

        let mode = self.config.mode;
        let bruno_config = BrunoConfig {
            version: "1",
            name: &name,
            kind: "collection",
            grpc: mode.includes_grpc().then(|| GrpcConfig {
                proto: ProtoConfig {
                    root: &self.config.proto_root,
                },
            }),
        };

        let mut json = serde_json::to_string_pretty(&bruno_config)?;
        json.push('\n');

        let mut files = vec![GeneratedFile::new(format!("{}bruno.json", prefix), json)];

        for endpoint in &self.endpoints {
            let mut context = Context::new();
            context.insert("endpoint", endpoint);
            context.insert("include_http", &mode.includes_http());
            context.insert("include_grpc", &mode.includes_grpc());

            let content = templates::render(&self.tera, templates::ENVIRONMENT, &context)?;
            files.push(GeneratedFile::new(
                format!("{}{}/{}.bru", prefix, ENVIRONMENTS_DIR, endpoint.name),
                content,
            ));
        }

        Ok(files)
    }

    /// HTTP and gRPC requests for every method of a file, in declaration order
    fn file_requests(
        &self,
        renderer: &RequestRenderer<'_>,
        file: &ProtoFile,
        prefix: &str,
    ) -> Result<Vec<GeneratedFile>> {
        let mode = self.config.mode;
        let mut files = Vec::new();

        for service in &file.services {
            let service_name = pascal_case(&service.name);

            for method in &service.methods {
                let method_name = pascal_case(&method.name);

                if mode.includes_http() {
                    if let Some(content) = renderer.render_http(method)? {
                        files.push(GeneratedFile::new(
                            format!("{}{}/{}.bru", prefix, service_name, method_name),
                            content,
                        ));
                    }
                }

                if mode.includes_grpc() {
                    let content = renderer.render_grpc(method, &file.path)?;
                    files.push(GeneratedFile::new(
                        format!("{}{}-gRPC/{}.bru", prefix, service_name, method_name),
                        content,
                    ));
                }
            }
        }

        Ok(files)
    }
}

/// Generate a collection with a one-off generator
pub fn generate_collection(
    set: &DescriptorSet,
    config: GeneratorConfig,
) -> Result<Vec<GeneratedFile>> {
    CollectionGenerator::new(config)?.generate(set)
}

/// Write generated files below `output_dir`, creating folders as needed
pub fn write_to_directory(files: &[GeneratedFile], output_dir: &Path) -> Result<()> {
    for file in files {
        let path = output_dir.join(&file.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                GeneratorError::Generation(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        fs::write(&path, &file.content).map_err(|e| {
            GeneratorError::Generation(format!("Failed to write {}: {}", path.display(), e))
        })?;

        tracing::debug!(path = %path.display(), "wrote file");
    }

    Ok(())
}
