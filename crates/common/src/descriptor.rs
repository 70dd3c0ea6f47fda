//! Descriptor intermediate representation
//!
//! A read-only snapshot of the services, methods, and messages found in a
//! compiled set of `.proto` files. Ordering everywhere is declaration order,
//! which the generated output depends on.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Everything the generator needs from a compiled set of proto files
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescriptorSet {
    /// Files to generate requests for, in the order the compiler listed them
    pub files: Vec<ProtoFile>,

    /// Every message in the pool keyed by fully-qualified name, including
    /// messages from imported files
    pub messages: HashMap<String, MessageDescriptor>,
}

impl DescriptorSet {
    /// Look up a message by fully-qualified name (no leading dot)
    pub fn message(&self, full_name: &str) -> Option<&MessageDescriptor> {
        self.messages.get(full_name)
    }

    /// Register a message, replacing any previous entry with the same name
    pub fn insert_message(&mut self, message: MessageDescriptor) {
        self.messages.insert(message.full_name.clone(), message);
    }

    /// All services across all files, in file then declaration order
    pub fn services(&self) -> impl Iterator<Item = &ServiceDescriptor> {
        self.files.iter().flat_map(|f| f.services.iter())
    }
}

/// A single `.proto` file selected for generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtoFile {
    /// Path relative to the proto root (e.g. "example/v1/user.proto")
    pub path: String,

    /// Proto package (e.g. "example.v1"), empty when undeclared
    pub package: String,

    pub services: Vec<ServiceDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    /// Simple service name as declared (e.g. "UserService")
    pub name: String,

    pub methods: Vec<MethodDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    /// Simple method name as declared (e.g. "CreateUser")
    pub name: String,

    /// Fully-qualified request message name
    pub input_type: String,

    /// `google.api.http` annotation, if the method carries one
    pub http_rule: Option<HttpRule>,

    /// gRPC selector in `package.Service/Method` form
    ///
    /// Files without a package give `Service/Method`; there is never a
    /// leading dot.
    pub rpc_selector: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageDescriptor {
    /// Fully-qualified name without a leading dot
    pub full_name: String,

    pub fields: Vec<FieldDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name as declared (e.g. "page_size")
    pub name: String,

    /// Proto3 JSON name (e.g. "pageSize")
    pub json_name: String,

    pub kind: FieldKind,

    /// True for `repeated` fields. Map fields are not repeated; their kind is
    /// the synthetic map-entry message.
    pub repeated: bool,
}

/// Semantic kind of a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Double,
    Float,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Sint64,
    Fixed32,
    Fixed64,
    Sfixed32,
    Sfixed64,
    Bool,
    String,
    Bytes,
    Enum(EnumDescriptor),
    /// Message type by fully-qualified name
    Message(String),
    /// proto2 group; has no JSON shape we synthesize
    Group,
}

impl FieldKind {
    /// True for every fixed and variable width integer kind
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            FieldKind::Int32
                | FieldKind::Int64
                | FieldKind::Uint32
                | FieldKind::Uint64
                | FieldKind::Sint32
                | FieldKind::Sint64
                | FieldKind::Fixed32
                | FieldKind::Fixed64
                | FieldKind::Sfixed32
                | FieldKind::Sfixed64
        )
    }

    /// Message type name for message fields
    pub fn message_type(&self) -> Option<&str> {
        match self {
            FieldKind::Message(name) => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDescriptor {
    pub full_name: String,

    /// Value names in declaration order
    pub values: Vec<String>,
}

/// HTTP mapping of an RPC method (`google.api.http`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpRule {
    /// The verb/template pair; `None` when the rule sets no pattern
    pub pattern: Option<HttpPattern>,

    /// Body selector: "*", a top-level field name, or empty for no body
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpPattern {
    Get(String),
    Put(String),
    Post(String),
    Delete(String),
    Patch(String),
    Custom { kind: String, path: String },
}

/// One output document: a relative path and its full text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

impl GeneratedFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}
