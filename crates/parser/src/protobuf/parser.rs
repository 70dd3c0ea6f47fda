//! Protobuf descriptor parser

use super::request::PluginRequest;
use prost_reflect::DescriptorPool;
use protoc_gen_bruno_common::{DescriptorSet, GeneratorError, Result};
use std::fs;
use std::path::Path;

/// Protobuf/gRPC descriptor parser
///
/// Holds a descriptor pool (compiled .proto files plus their imports) and the
/// subset of files that requests should be generated for.
pub struct ProtobufParser {
    /// Descriptor pool for reflection
    pool: DescriptorPool,

    /// Files to generate; `None` selects every file outside `google.*`
    files_to_generate: Option<Vec<String>>,
}

impl ProtobufParser {
    /// Load a FileDescriptorSet from a binary file
    ///
    /// The set should be produced with `--include_imports` so that
    /// `google/api/annotations.proto` is present; without it no method has an
    /// HTTP rule.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = fs::read(path.as_ref()).map_err(|e| {
            GeneratorError::Parse(format!(
                "Failed to read FileDescriptorSet file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_file_descriptor_set(&bytes)
    }

    /// Parse a serialized FileDescriptorSet
    pub fn from_file_descriptor_set(bytes: &[u8]) -> Result<Self> {
        Ok(Self {
            pool: decode_pool(bytes)?,
            files_to_generate: None,
        })
    }

    /// Build the pool from a protoc plugin request
    pub fn from_plugin_request(request: &PluginRequest) -> Result<Self> {
        let pool = decode_pool(&request.file_descriptor_set_bytes())?;

        for name in &request.file_to_generate {
            if pool.get_file_by_name(name).is_none() {
                return Err(GeneratorError::Parse(format!(
                    "File to generate {} is missing from the request",
                    name
                )));
            }
        }

        Ok(Self {
            pool,
            files_to_generate: Some(request.file_to_generate.clone()),
        })
    }

    /// Convert the pool into the descriptor IR
    pub fn parse(&self) -> Result<DescriptorSet> {
        let targets = match &self.files_to_generate {
            Some(names) => names.clone(),
            None => self
                .pool
                .files()
                .filter(|file| !is_google_package(file.package_name()))
                .map(|file| file.name().to_string())
                .collect(),
        };

        super::converter::convert_pool_to_descriptor_set(&self.pool, &targets)
    }

    /// Get reference to the underlying descriptor pool
    pub fn pool(&self) -> &DescriptorPool {
        &self.pool
    }
}

/// Decode raw bytes so that options keep their extension fields
fn decode_pool(bytes: &[u8]) -> Result<DescriptorPool> {
    DescriptorPool::decode(bytes)
        .map_err(|e| GeneratorError::Parse(format!("Failed to create DescriptorPool: {}", e)))
}

fn is_google_package(package: &str) -> bool {
    package == "google" || package.starts_with("google.")
}
