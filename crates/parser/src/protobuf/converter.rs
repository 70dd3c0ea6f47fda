//! Converts protobuf descriptors to the descriptor IR

use prost_reflect::{
    DescriptorPool, DynamicMessage, ExtensionDescriptor, Kind, Value,
    FieldDescriptor as ReflectField, MessageDescriptor as ReflectMessage,
    MethodDescriptor as ReflectMethod, ServiceDescriptor as ReflectService,
};
use protoc_gen_bruno_common::{
    DescriptorSet, EnumDescriptor, FieldDescriptor, FieldKind, GeneratorError, HttpPattern,
    HttpRule, MessageDescriptor, MethodDescriptor, ProtoFile, Result, ServiceDescriptor,
};

/// Fully-qualified name of the `google.api.http` method option
pub const HTTP_RULE_EXTENSION: &str = "google.api.http";

/// Convert a DescriptorPool to a DescriptorSet for the given target files
pub fn convert_pool_to_descriptor_set(
    pool: &DescriptorPool,
    targets: &[String],
) -> Result<DescriptorSet> {
    let http_ext = pool.get_extension_by_name(HTTP_RULE_EXTENSION);
    if http_ext.is_none() {
        tracing::debug!(
            "{} is not in the descriptor pool, no method will have an HTTP rule",
            HTTP_RULE_EXTENSION
        );
    }

    let mut set = DescriptorSet::default();

    for message in pool.all_messages() {
        set.insert_message(convert_message(&message));
    }

    for name in targets {
        let file = pool.get_file_by_name(name).ok_or_else(|| {
            GeneratorError::Parse(format!("File {} is not in the descriptor pool", name))
        })?;

        let services = file
            .services()
            .map(|service| convert_service(&service, http_ext.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        set.files.push(ProtoFile {
            path: file.name().to_string(),
            package: file.package_name().to_string(),
            services,
        });
    }

    tracing::debug!(
        files = set.files.len(),
        messages = set.messages.len(),
        "converted descriptor pool"
    );

    Ok(set)
}

fn convert_service(
    service: &ReflectService,
    http_ext: Option<&ExtensionDescriptor>,
) -> Result<ServiceDescriptor> {
    let methods = service
        .methods()
        .map(|method| convert_method(service, &method, http_ext))
        .collect::<Result<Vec<_>>>()?;

    Ok(ServiceDescriptor {
        name: service.name().to_string(),
        methods,
    })
}

fn convert_method(
    service: &ReflectService,
    method: &ReflectMethod,
    http_ext: Option<&ExtensionDescriptor>,
) -> Result<MethodDescriptor> {
    let http_rule = match http_ext {
        Some(ext) => extract_http_rule(&method.options(), ext)?,
        None => None,
    };

    Ok(MethodDescriptor {
        name: method.name().to_string(),
        input_type: method.input().full_name().to_string(),
        http_rule,
        // full_name() has no leading dot and omits an empty package
        rpc_selector: format!("{}/{}", service.full_name(), method.name()),
    })
}

/// Read the `google.api.http` option of a method, if set
fn extract_http_rule(
    options: &DynamicMessage,
    ext: &ExtensionDescriptor,
) -> Result<Option<HttpRule>> {
    if !options.has_extension(ext) {
        return Ok(None);
    }

    let value = options.get_extension(ext);
    let Value::Message(rule) = value.as_ref() else {
        return Err(GeneratorError::Parse(format!(
            "{} option is not a message",
            HTTP_RULE_EXTENSION
        )));
    };

    let pattern = if let Some(path) = string_field(rule, "get") {
        Some(HttpPattern::Get(path))
    } else if let Some(path) = string_field(rule, "put") {
        Some(HttpPattern::Put(path))
    } else if let Some(path) = string_field(rule, "post") {
        Some(HttpPattern::Post(path))
    } else if let Some(path) = string_field(rule, "delete") {
        Some(HttpPattern::Delete(path))
    } else if let Some(path) = string_field(rule, "patch") {
        Some(HttpPattern::Patch(path))
    } else if rule.has_field_by_name("custom") {
        let custom = rule.get_field_by_name("custom");
        let custom = custom.as_deref().and_then(Value::as_message);
        Some(HttpPattern::Custom {
            kind: custom
                .and_then(|c| string_field(c, "kind"))
                .unwrap_or_default(),
            path: custom
                .and_then(|c| string_field(c, "path"))
                .unwrap_or_default(),
        })
    } else {
        None
    };

    Ok(Some(HttpRule {
        pattern,
        body: string_field(rule, "body").unwrap_or_default(),
    }))
}

/// String value of a set field; oneof members count as set even when empty
fn string_field(message: &DynamicMessage, name: &str) -> Option<String> {
    if !message.has_field_by_name(name) {
        return None;
    }
    message
        .get_field_by_name(name)
        .and_then(|value| value.as_str().map(str::to_string))
}

fn convert_message(message: &ReflectMessage) -> MessageDescriptor {
    MessageDescriptor {
        full_name: message.full_name().to_string(),
        fields: message.fields().map(|field| convert_field(&field)).collect(),
    }
}

fn convert_field(field: &ReflectField) -> FieldDescriptor {
    FieldDescriptor {
        name: field.name().to_string(),
        json_name: field.json_name().to_string(),
        kind: convert_kind(field),
        repeated: field.is_list(),
    }
}

/// Convert a protobuf Kind to FieldKind
fn convert_kind(field: &ReflectField) -> FieldKind {
    if field.is_group() {
        return FieldKind::Group;
    }

    match field.kind() {
        Kind::Double => FieldKind::Double,
        Kind::Float => FieldKind::Float,
        Kind::Int32 => FieldKind::Int32,
        Kind::Int64 => FieldKind::Int64,
        Kind::Uint32 => FieldKind::Uint32,
        Kind::Uint64 => FieldKind::Uint64,
        Kind::Sint32 => FieldKind::Sint32,
        Kind::Sint64 => FieldKind::Sint64,
        Kind::Fixed32 => FieldKind::Fixed32,
        Kind::Fixed64 => FieldKind::Fixed64,
        Kind::Sfixed32 => FieldKind::Sfixed32,
        Kind::Sfixed64 => FieldKind::Sfixed64,
        Kind::Bool => FieldKind::Bool,
        Kind::String => FieldKind::String,
        Kind::Bytes => FieldKind::Bytes,
        Kind::Enum(enum_desc) => FieldKind::Enum(EnumDescriptor {
            full_name: enum_desc.full_name().to_string(),
            values: enum_desc.values().map(|v| v.name().to_string()).collect(),
        }),
        Kind::Message(msg_desc) => FieldKind::Message(msg_desc.full_name().to_string()),
    }
}
