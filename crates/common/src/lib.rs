//! Common types and utilities for protoc-gen-bruno
//!
//! This crate contains the descriptor intermediate representation shared by
//! the parser and generator, the generator configuration, and the error type
//! used across the workspace.

mod config;
mod descriptor;

pub use config::{EnvironmentUrls, GenerationMode, GeneratorConfig, DEFAULT_PROTO_ROOT};
pub use descriptor::{
    DescriptorSet, EnumDescriptor, FieldDescriptor, FieldKind, GeneratedFile, HttpPattern,
    HttpRule, MessageDescriptor, MethodDescriptor, ProtoFile, ServiceDescriptor,
};

use thiserror::Error;

/// Errors that can occur while generating a collection
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Generation error: {0}")]
    Generation(String),

    /// A descriptor referenced a message that is not part of the set.
    ///
    /// The front-end guarantees every referenced type is present, so this is
    /// never a data-shape variation and aborts the run.
    #[error("Unresolved message type: {0}")]
    UnresolvedType(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, GeneratorError>;
