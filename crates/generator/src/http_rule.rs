//! `google.api.http` rule decoding
//!
//! Turns a method's HTTP rule into a verb and URL template, and lists the
//! placeholders the template binds from request fields.

use protoc_gen_bruno_common::{HttpPattern, HttpRule};

/// HTTP verbs a Bruno request can be generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpVerb {
    /// Lowercase block name used in `.bru` files
    pub fn as_str(self) -> &'static str {
        match self {
            HttpVerb::Get => "get",
            HttpVerb::Post => "post",
            HttpVerb::Put => "put",
            HttpVerb::Delete => "delete",
            HttpVerb::Patch => "patch",
        }
    }
}

/// Decode the verb and URL template of a rule
///
/// Returns `None` when no pattern is set, when the pattern is a custom verb,
/// or when the URL template is empty.
pub fn decode_rule(rule: &HttpRule) -> Option<(HttpVerb, &str)> {
    let (verb, path) = match rule.pattern.as_ref()? {
        HttpPattern::Get(path) => (HttpVerb::Get, path),
        HttpPattern::Post(path) => (HttpVerb::Post, path),
        HttpPattern::Put(path) => (HttpVerb::Put, path),
        HttpPattern::Delete(path) => (HttpVerb::Delete, path),
        HttpPattern::Patch(path) => (HttpVerb::Patch, path),
        HttpPattern::Custom { .. } => return None,
    };

    if path.is_empty() {
        return None;
    }

    Some((verb, path.as_str()))
}

/// Extract parameter names from a URL template
///
/// Examples:
/// - "/v1/users/{user_id}/posts/{post_id}" -> ["user_id", "post_id"]
/// - "/v1alpha1/{name=environments/*/contact}" -> ["name"]
/// - "/v1alpha1/{parent=accounts/*}/environments" -> ["parent"]
///
/// Unbalanced braces are not an error: only spans closed before the end of
/// the template are returned.
pub fn extract_path_params(path: &str) -> Vec<String> {
    let mut params = Vec::new();
    let mut start = None;

    for (i, ch) in path.char_indices() {
        match ch {
            '{' => start = Some(i + 1),
            '}' => {
                if let Some(begin) = start.take() {
                    let param = &path[begin..i];
                    // Resource patterns: keep the name before '='
                    let name = param.split_once('=').map_or(param, |(name, _)| name);
                    params.push(name.to_string());
                }
            }
            _ => {}
        }
    }

    params
}
