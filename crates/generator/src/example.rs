//! Example value synthesis for request bodies and query parameters
//!
//! Produces JSON-like literal text for a field or message. The output is
//! built by hand rather than through a JSON serializer so the layout stays
//! byte-stable: nested objects keep their opening brace on the field's line,
//! fields are indented two spaces per level, and repeated fields wrap a
//! single example element in brackets.

use protoc_gen_bruno_common::{
    DescriptorSet, FieldDescriptor, FieldKind, GeneratorError, MessageDescriptor, Result,
};

/// Messages nested deeper than this render as `{}`
pub const MAX_DEPTH: usize = 3;

/// Well-known types with a fixed JSON example
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WellKnownType {
    Timestamp,
    Duration,
    FieldMask,
    Struct,
    Value,
    ListValue,
    Any,
    Empty,
}

impl WellKnownType {
    pub fn from_full_name(full_name: &str) -> Option<Self> {
        let wkt = match full_name {
            "google.protobuf.Timestamp" => WellKnownType::Timestamp,
            "google.protobuf.Duration" => WellKnownType::Duration,
            "google.protobuf.FieldMask" => WellKnownType::FieldMask,
            "google.protobuf.Struct" => WellKnownType::Struct,
            "google.protobuf.Value" => WellKnownType::Value,
            "google.protobuf.ListValue" => WellKnownType::ListValue,
            "google.protobuf.Any" => WellKnownType::Any,
            "google.protobuf.Empty" => WellKnownType::Empty,
            _ => return None,
        };
        Some(wkt)
    }

    pub fn example(self) -> &'static str {
        match self {
            WellKnownType::Timestamp => "\"2024-01-01T00:00:00Z\"",
            WellKnownType::Duration => "\"1.5s\"",
            WellKnownType::FieldMask => "\"field1,field2.subfield\"",
            WellKnownType::Struct => "{}",
            WellKnownType::Value => "null",
            WellKnownType::ListValue => "[]",
            WellKnownType::Any => "{\"@type\": \"type.googleapis.com/example.Type\", \"value\": \"...\"}",
            WellKnownType::Empty => "{}",
        }
    }
}

/// Synthesizes example values from the message registry of a descriptor set
pub struct ExampleBuilder<'a> {
    set: &'a DescriptorSet,
}

impl<'a> ExampleBuilder<'a> {
    pub fn new(set: &'a DescriptorSet) -> Self {
        Self { set }
    }

    /// Example object for a message looked up by fully-qualified name
    ///
    /// The depth limit is checked before the lookup, so a message type that
    /// only appears past the limit never has to resolve.
    pub fn message_json(&self, full_name: &str, depth: usize) -> Result<String> {
        if depth > MAX_DEPTH {
            return Ok("{}".to_string());
        }

        let message = self
            .set
            .message(full_name)
            .ok_or_else(|| GeneratorError::UnresolvedType(full_name.to_string()))?;

        self.object_json(message, depth)
    }

    /// Example object for a message at the given nesting depth
    ///
    /// `depth` is 1 for a top-level body. Fields are indented `2 * (depth + 1)`
    /// spaces and the closing brace `2 * depth` spaces.
    pub fn object_json(&self, message: &MessageDescriptor, depth: usize) -> Result<String> {
        if depth > MAX_DEPTH {
            return Ok("{}".to_string());
        }

        let field_indent = "  ".repeat(depth + 1);
        let last = message.fields.len().saturating_sub(1);

        let mut lines = vec!["{".to_string()];
        for (i, field) in message.fields.iter().enumerate() {
            let value = self.element_value(field, depth + 1)?;
            let separator = if i < last { "," } else { "" };
            lines.push(format!(
                "{}\"{}\": {}{}",
                field_indent, field.json_name, value, separator
            ));
        }
        lines.push(format!("{}}}", "  ".repeat(depth)));

        Ok(lines.join("\n"))
    }

    /// Field value as it appears inside an object, brackets included for
    /// repeated fields
    pub fn element_value(&self, field: &FieldDescriptor, depth: usize) -> Result<String> {
        let value = self.field_value(field, depth)?;
        if field.repeated {
            Ok(format!("[{}]", value))
        } else {
            Ok(value)
        }
    }

    /// Example literal for a single value of a field's type
    pub fn field_value(&self, field: &FieldDescriptor, depth: usize) -> Result<String> {
        let value = match &field.kind {
            FieldKind::String => format!("\"example_{}\"", field.json_name),
            FieldKind::Bool => "false".to_string(),
            FieldKind::Float | FieldKind::Double => "0.0".to_string(),
            FieldKind::Bytes => "\"base64_encoded_data\"".to_string(),
            FieldKind::Enum(enum_desc) => match enum_desc.values.first() {
                Some(first) => format!("\"{}\"", first),
                None => "\"ENUM_VALUE\"".to_string(),
            },
            FieldKind::Message(type_name) => match WellKnownType::from_full_name(type_name) {
                Some(wkt) => wkt.example().to_string(),
                None => self.message_json(type_name, depth)?,
            },
            FieldKind::Group => "\"unknown\"".to_string(),
            kind => {
                debug_assert!(kind.is_integer());
                "0".to_string()
            }
        };

        Ok(value)
    }

    /// Example text for a query parameter, surrounding quotes removed
    pub fn query_value(&self, field: &FieldDescriptor) -> Result<String> {
        let value = self.field_value(field, 0)?;
        Ok(value.trim_matches('"').to_string())
    }
}
