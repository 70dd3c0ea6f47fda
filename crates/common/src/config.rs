//! Generator configuration
//!
//! Configuration arrives either as the protoc plugin parameter string
//! (`--bruno_opt=mode=http,dev_url=https://...`) or as a YAML file for the
//! standalone CLI. Both use the same keys.

use crate::{GeneratorError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default location of the proto sources relative to the collection folder
pub const DEFAULT_PROTO_ROOT: &str = "../../proto";

/// Which request kinds to generate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    #[default]
    All,
    Http,
    Grpc,
}

impl GenerationMode {
    /// Parse a mode flag, falling back to `All` for anything unrecognized
    pub fn from_flag(value: &str) -> Self {
        match value {
            "http" => GenerationMode::Http,
            "grpc" => GenerationMode::Grpc,
            _ => GenerationMode::All,
        }
    }

    pub fn includes_http(self) -> bool {
        matches!(self, GenerationMode::All | GenerationMode::Http)
    }

    pub fn includes_grpc(self) -> bool {
        matches!(self, GenerationMode::All | GenerationMode::Grpc)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GenerationMode::All => "all",
            GenerationMode::Http => "http",
            GenerationMode::Grpc => "grpc",
        }
    }
}

/// HTTP base URLs per environment, as configured (unset when absent or empty)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentUrls<'a> {
    pub local: Option<&'a str>,
    pub development: Option<&'a str>,
    pub staging: Option<&'a str>,
    pub production: Option<&'a str>,
}

/// Configuration for one generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    pub mode: GenerationMode,

    /// One collection for every file, or one per proto package
    pub single_collection: bool,

    /// Overrides the collection name derived from services
    pub collection_name: Option<String>,

    pub local_url: Option<String>,
    pub dev_url: Option<String>,
    pub stg_url: Option<String>,
    pub prd_url: Option<String>,

    /// gRPC host:port overrides; derived from the HTTP URLs when unset
    pub grpc_local_url: Option<String>,
    pub grpc_dev_url: Option<String>,
    pub grpc_stg_url: Option<String>,
    pub grpc_prd_url: Option<String>,

    /// Proto root path written into bruno.json, relative to the collection
    pub proto_root: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            mode: GenerationMode::All,
            single_collection: true,
            collection_name: None,
            local_url: None,
            dev_url: None,
            stg_url: None,
            prd_url: None,
            grpc_local_url: None,
            grpc_dev_url: None,
            grpc_stg_url: None,
            grpc_prd_url: None,
            proto_root: DEFAULT_PROTO_ROOT.to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Parse a protoc plugin parameter string (`key=value,key=value`)
    ///
    /// Options consumed by protoc itself (`paths`, `module`, `annotate_code`
    /// and `M<file>=<path>` mappings) are accepted and ignored. Any other
    /// unknown key is an error.
    pub fn from_parameter(parameter: &str) -> Result<Self> {
        let mut config = Self::default();

        for part in parameter.split(',') {
            let (key, value) = match part.split_once('=') {
                Some((key, value)) => (key, value),
                None => (part, ""),
            };
            config.set(key, value)?;
        }

        Ok(config)
    }

    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            GeneratorError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        Self::from_yaml(&content).map_err(|e| match e {
            GeneratorError::Yaml(e) => GeneratorError::Config(format!(
                "Failed to parse config YAML from {:?}: {}",
                path, e
            )),
            other => other,
        })
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        Ok(config.normalized())
    }

    /// Apply a single `key=value` option
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let slot = match key {
            "" | "paths" | "module" | "annotate_code" => return Ok(()),
            _ if key.starts_with('M') => return Ok(()),
            "mode" => {
                self.mode = GenerationMode::from_flag(value);
                return Ok(());
            }
            "single_collection" => {
                self.single_collection = value != "false";
                return Ok(());
            }
            "proto_root" => {
                self.proto_root = value.to_string();
                return Ok(());
            }
            "collection_name" => &mut self.collection_name,
            "local_url" => &mut self.local_url,
            "dev_url" => &mut self.dev_url,
            "stg_url" => &mut self.stg_url,
            "prd_url" => &mut self.prd_url,
            "grpc_local_url" => &mut self.grpc_local_url,
            "grpc_dev_url" => &mut self.grpc_dev_url,
            "grpc_stg_url" => &mut self.grpc_stg_url,
            "grpc_prd_url" => &mut self.grpc_prd_url,
            _ => {
                return Err(GeneratorError::Config(format!(
                    "unknown parameter \"{}\"",
                    key
                )))
            }
        };

        *slot = non_empty(value);
        Ok(())
    }

    /// HTTP base URLs that were actually supplied
    pub fn http_urls(&self) -> EnvironmentUrls<'_> {
        EnvironmentUrls {
            local: self.local_url.as_deref(),
            development: self.dev_url.as_deref(),
            staging: self.stg_url.as_deref(),
            production: self.prd_url.as_deref(),
        }
    }

    /// Explicit gRPC endpoint overrides that were actually supplied
    pub fn grpc_urls(&self) -> EnvironmentUrls<'_> {
        EnvironmentUrls {
            local: self.grpc_local_url.as_deref(),
            development: self.grpc_dev_url.as_deref(),
            staging: self.grpc_stg_url.as_deref(),
            production: self.grpc_prd_url.as_deref(),
        }
    }

    /// Treat empty strings from YAML the same as absent keys
    fn normalized(mut self) -> Self {
        for slot in [
            &mut self.collection_name,
            &mut self.local_url,
            &mut self.dev_url,
            &mut self.stg_url,
            &mut self.prd_url,
            &mut self.grpc_local_url,
            &mut self.grpc_dev_url,
            &mut self.grpc_stg_url,
            &mut self.grpc_prd_url,
        ] {
            if slot.as_deref() == Some("") {
                *slot = None;
            }
        }
        self
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
