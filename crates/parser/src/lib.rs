//! Protobuf descriptor decoding for protoc-gen-bruno
//!
//! This crate turns compiled `.proto` files into the descriptor IR
//! (`DescriptorSet`) consumed by the generator.
//!
//! ## Sources
//! - **protoc plugin requests**: `CodeGeneratorRequest` read from stdin
//! - **FileDescriptorSet files**: `protoc --include_imports --descriptor_set_out=api.pb`
//!
//! Both are decoded from their raw bytes into a `prost_reflect::DescriptorPool`
//! so that method options keep their `google.api.http` extension.

mod protobuf;

pub use protobuf::{PluginRequest, ProtobufParser, HTTP_RULE_EXTENSION};

use protoc_gen_bruno_common::{DescriptorSet, Result};
use std::path::Path;

/// Parse a FileDescriptorSet file into the descriptor IR
///
/// # Arguments
/// * `path` - Path to a binary FileDescriptorSet (usually `*.pb`)
///
/// # Returns
/// * `DescriptorSet` - every non-`google.*` file plus all messages in the pool
pub fn parse_descriptor_set_file(path: &Path) -> Result<DescriptorSet> {
    let parser = ProtobufParser::from_file(path)?;
    parser.parse()
}
