//! Protobuf/gRPC descriptor parser
//!
//! Decodes compiled `.proto` descriptors and converts them to the
//! generator's descriptor IR.
//!
//! ## Sources
//! - **protoc plugin**: `CodeGeneratorRequest` handed to `protoc-gen-bruno`
//! - **FileDescriptorSet**: Compiled from .proto files using protoc
//!
//! ## Example
//! ```rust,ignore
//! use protoc_gen_bruno_parser::ProtobufParser;
//!
//! let parser = ProtobufParser::from_file("api.pb")?;
//! let descriptors = parser.parse()?;
//! ```

mod converter;
mod parser;
mod request;

pub use converter::HTTP_RULE_EXTENSION;
pub use parser::ProtobufParser;
pub use request::PluginRequest;
