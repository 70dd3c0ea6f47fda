//! Raw protoc plugin request decoding
//!
//! `prost_types::compiler::CodeGeneratorRequest` decodes `proto_file` into
//! `FileDescriptorProto` values, which drops unknown fields and with them
//! every custom option such as `google.api.http`. These mirrors keep each
//! file as raw bytes so the descriptor pool can decode the options itself.

use prost::Message;
use protoc_gen_bruno_common::{GeneratorError, Result};

/// `google.protobuf.compiler.CodeGeneratorRequest` with raw proto files
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PluginRequest {
    /// Files explicitly listed on the protoc command line
    #[prost(string, repeated, tag = "1")]
    pub file_to_generate: Vec<String>,

    /// Comma-separated plugin parameter (`--bruno_opt`)
    #[prost(string, optional, tag = "2")]
    pub parameter: Option<String>,

    /// Serialized `FileDescriptorProto`s in topological order
    #[prost(bytes = "vec", repeated, tag = "15")]
    pub proto_file: Vec<Vec<u8>>,
}

/// `google.protobuf.FileDescriptorSet` with raw files
#[derive(Clone, PartialEq, ::prost::Message)]
struct RawFileDescriptorSet {
    #[prost(bytes = "vec", repeated, tag = "1")]
    file: Vec<Vec<u8>>,
}

impl PluginRequest {
    /// Decode a request as read from the plugin's stdin
    pub fn decode_bytes(bytes: &[u8]) -> Result<Self> {
        Self::decode(bytes).map_err(|e| {
            GeneratorError::Parse(format!("Failed to decode CodeGeneratorRequest: {}", e))
        })
    }

    /// Re-frame the proto files as a serialized FileDescriptorSet
    pub(crate) fn file_descriptor_set_bytes(&self) -> Vec<u8> {
        RawFileDescriptorSet {
            file: self.proto_file.clone(),
        }
        .encode_to_vec()
    }
}
