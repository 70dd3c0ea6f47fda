//! Template loading and management

use crate::naming::pascal_case;
use protoc_gen_bruno_common::{GeneratorError, Result};
use std::collections::HashMap;
use tera::{Tera, Value};

pub const HTTP_REQUEST: &str = "http_request.bru";
pub const GRPC_REQUEST: &str = "grpc_request.bru";
pub const ENVIRONMENT: &str = "environment.bru";

/// Load all templates
pub fn load_templates() -> Result<Tera> {
    let mut tera = Tera::default();

    tera.register_filter("pascal_case", pascal_case_filter);

    let templates = [
        (HTTP_REQUEST, include_str!("../templates/http_request.bru.tera")),
        (GRPC_REQUEST, include_str!("../templates/grpc_request.bru.tera")),
        (ENVIRONMENT, include_str!("../templates/environment.bru.tera")),
    ];

    for (name, content) in templates {
        tera.add_raw_template(name, content).map_err(|e| {
            GeneratorError::Generation(format!("Failed to load {} template: {}", name, e))
        })?;
    }

    Ok(tera)
}

/// Render a loaded template, mapping tera errors into the crate error type
pub fn render(tera: &Tera, name: &str, context: &tera::Context) -> Result<String> {
    tera.render(name, context)
        .map_err(|e| GeneratorError::Generation(format!("Template error in {}: {:?}", name, e)))
}

/// Filter to convert a proto identifier to PascalCase
fn pascal_case_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("pascal_case filter expects a string"))?;

    Ok(Value::String(pascal_case(s)))
}
