//! Rendering of HTTP and gRPC request files for a single RPC method

use crate::classifier::{classify, BodySelector};
use crate::example::ExampleBuilder;
use crate::http_rule::{decode_rule, extract_path_params};
use crate::templates::{self, GRPC_REQUEST, HTTP_REQUEST};
use protoc_gen_bruno_common::{
    DescriptorSet, GeneratorError, MessageDescriptor, MethodDescriptor, Result,
};
use serde::Serialize;
use tera::{Context, Tera};

#[derive(Debug, Serialize)]
struct QueryParam {
    name: String,
    value: String,
}

/// Renders `.bru` request documents against one descriptor set
pub struct RequestRenderer<'a> {
    tera: &'a Tera,
    set: &'a DescriptorSet,
    examples: ExampleBuilder<'a>,
}

impl<'a> RequestRenderer<'a> {
    pub fn new(tera: &'a Tera, set: &'a DescriptorSet) -> Self {
        Self {
            tera,
            set,
            examples: ExampleBuilder::new(set),
        }
    }

    /// HTTP request text, or `None` when the method has no usable HTTP rule
    pub fn render_http(&self, method: &MethodDescriptor) -> Result<Option<String>> {
        let Some(rule) = method.http_rule.as_ref() else {
            tracing::debug!(method = %method.rpc_selector, "no HTTP rule, skipping HTTP request");
            return Ok(None);
        };

        let Some((verb, url)) = decode_rule(rule) else {
            tracing::debug!(
                method = %method.rpc_selector,
                "HTTP rule has no supported verb or URL, skipping HTTP request"
            );
            return Ok(None);
        };

        let input = self.input_message(method)?;
        let path_params = extract_path_params(url);
        let selector = BodySelector::parse(&rule.body);
        let partition = classify(&input.fields, &path_params, verb, selector);

        let query_params = partition
            .query
            .iter()
            .map(|field| {
                Ok(QueryParam {
                    name: field.json_name.clone(),
                    value: self.examples.query_value(field)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let body = match (partition.body.first(), selector) {
            (None, _) => None,
            (Some(_), BodySelector::Wildcard) => Some(self.examples.object_json(input, 1)?),
            (Some(field), _) => match field.kind.message_type() {
                Some(type_name) => Some(self.examples.message_json(type_name, 1)?),
                // scalar body field: send its own literal
                None => Some(self.examples.element_value(field, 1)?),
            },
        };

        let mut context = Context::new();
        context.insert("method_name", &method.name);
        context.insert("verb", verb.as_str());
        context.insert("url", url);
        context.insert("query_params", &query_params);
        context.insert("body", &body);

        templates::render(self.tera, HTTP_REQUEST, &context).map(Some)
    }

    /// gRPC request text; every method has one
    pub fn render_grpc(&self, method: &MethodDescriptor, proto_path: &str) -> Result<String> {
        let input = self.input_message(method)?;

        let mut context = Context::new();
        context.insert("method_name", &method.name);
        context.insert("rpc_selector", &method.rpc_selector);
        context.insert("body", &self.examples.object_json(input, 1)?);
        context.insert("proto_path", proto_path);

        templates::render(self.tera, GRPC_REQUEST, &context)
    }

    fn input_message(&self, method: &MethodDescriptor) -> Result<&'a MessageDescriptor> {
        self.set
            .message(&method.input_type)
            .ok_or_else(|| GeneratorError::UnresolvedType(method.input_type.clone()))
    }
}
