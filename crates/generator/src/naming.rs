//! Collection naming and endpoint derivation

use protoc_gen_bruno_common::GeneratorConfig;
use serde::Serialize;

/// Name used when there is no custom name and no service to derive one from
pub const DEFAULT_COLLECTION_NAME: &str = "API Collection";

pub const DEFAULT_LOCAL_HTTP_URL: &str = "http://localhost:8080";
pub const DEFAULT_LOCAL_GRPC_URL: &str = "localhost:50051";

/// A named deployment target with its HTTP base URL and gRPC host:port
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointConfig {
    pub name: String,
    pub http_url: String,
    pub grpc_url: String,
}

impl EndpointConfig {
    fn new(name: &str, http_url: &str, grpc_url: String, grpc_override: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            http_url: http_url.to_string(),
            grpc_url: grpc_override.map_or(grpc_url, str::to_string),
        }
    }
}

/// Build the endpoint list in Local, Development, Staging, Production order
///
/// Local is present when a local URL is configured or when no other
/// environment is.
pub fn build_endpoints(config: &GeneratorConfig) -> Vec<EndpointConfig> {
    let http = config.http_urls();
    let grpc = config.grpc_urls();
    let mut endpoints = Vec::new();

    let has_remote =
        http.development.is_some() || http.staging.is_some() || http.production.is_some();
    if http.local.is_some() || !has_remote {
        let (http_url, grpc_url) = match http.local {
            Some(url) => (url, derive_rpc_endpoint(url)),
            None => (DEFAULT_LOCAL_HTTP_URL, DEFAULT_LOCAL_GRPC_URL.to_string()),
        };
        endpoints.push(EndpointConfig::new("Local", http_url, grpc_url, grpc.local));
    }

    let remotes = [
        ("Development", http.development, grpc.development),
        ("Staging", http.staging, grpc.staging),
        ("Production", http.production, grpc.production),
    ];

    for (name, url, grpc_override) in remotes {
        if let Some(url) = url {
            endpoints.push(EndpointConfig::new(
                name,
                url,
                derive_rpc_endpoint(url),
                grpc_override,
            ));
        }
    }

    endpoints
}

/// Derive a gRPC host:port from an HTTP(S) base URL
///
/// Examples:
/// - "https://api.dev.example.com/service" -> "api.dev.example.com:443"
/// - "http://localhost:8080" -> "localhost:8080"
pub fn derive_rpc_endpoint(url: &str) -> String {
    let is_https = url.starts_with("https://");
    let stripped = url.strip_prefix("https://").unwrap_or(url);
    let stripped = stripped.strip_prefix("http://").unwrap_or(stripped);

    let host = stripped.split('/').next().unwrap_or_default();
    if host.contains(':') {
        host.to_string()
    } else if is_https {
        format!("{}:443", host)
    } else {
        format!("{}:80", host)
    }
}

/// Human-readable collection name
///
/// `service_names` should already be in identifier form (see [`pascal_case`]).
pub fn derive_collection_name(
    custom_name: Option<&str>,
    service_names: &[String],
    package: &str,
) -> String {
    if let Some(name) = custom_name.filter(|name| !name.is_empty()) {
        return name.to_string();
    }

    match service_names {
        [] => DEFAULT_COLLECTION_NAME.to_string(),
        [single] => format!("{} API", single),
        _ if !package.is_empty() => format!("{} API", format_package_name(package)),
        _ => format!("{} APIs", service_names.join(" & ")),
    }
}

/// "example.v1" -> "Example V1"
pub fn format_package_name(package: &str) -> String {
    package
        .split('.')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Convert a proto identifier to the PascalCase form used for file names
/// and display names
///
/// Underscores followed by a lowercase letter are dropped and the letter is
/// upper-cased, so "get_user" becomes "GetUser". A leading underscore becomes
/// "X" and runs of digits are kept as-is.
pub fn pascal_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 1);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next_is_lower = chars.get(i + 1).is_some_and(char::is_ascii_lowercase);

        match c {
            '.' if next_is_lower => {}
            '.' => out.push('_'),
            '_' if i == 0 || chars[i - 1] == '.' => out.push('X'),
            '_' if next_is_lower => {}
            c if c.is_ascii_digit() => out.push(c),
            c => {
                out.push(c.to_ascii_uppercase());
                while chars.get(i + 1).is_some_and(char::is_ascii_lowercase) {
                    i += 1;
                    out.push(chars[i]);
                }
            }
        }
        i += 1;
    }

    out
}

/// Collection subfolder for a package, e.g. "example.v1" -> "example_v1/"
pub fn collection_prefix(package: &str) -> String {
    if package.is_empty() {
        String::new()
    } else {
        format!("{}/", package.replace('.', "_"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn test_derive_rpc_endpoint() {
        assert_eq!(
            derive_rpc_endpoint("https://api.dev.example.com/service"),
            "api.dev.example.com:443"
        );
        assert_eq!(derive_rpc_endpoint("http://localhost:8080"), "localhost:8080");
        assert_eq!(derive_rpc_endpoint("http://example.com/a/b"), "example.com:80");
        assert_eq!(derive_rpc_endpoint("https://example.com:8443"), "example.com:8443");
        assert_eq!(derive_rpc_endpoint("example.com"), "example.com:80");
    }

    #[test]
    fn test_collection_name_custom() {
        assert_eq!(
            derive_collection_name(Some("My Collection"), &names(&["A", "B"]), "example.v1"),
            "My Collection"
        );
    }

    #[test]
    fn test_collection_name_from_services() {
        assert_eq!(derive_collection_name(None, &[], "example.v1"), "API Collection");
        assert_eq!(
            derive_collection_name(None, &names(&["UserService"]), "example.v1"),
            "UserService API"
        );
        assert_eq!(
            derive_collection_name(None, &names(&["UserService", "OrderService"]), "example.v1"),
            "Example V1 API"
        );
        assert_eq!(
            derive_collection_name(None, &names(&["Users", "Orders"]), ""),
            "Users & Orders APIs"
        );
    }

    #[test]
    fn test_empty_custom_name_is_ignored() {
        assert_eq!(
            derive_collection_name(Some(""), &names(&["UserService"]), ""),
            "UserService API"
        );
    }

    #[test]
    fn test_format_package_name() {
        assert_eq!(format_package_name("example.v1"), "Example V1");
        assert_eq!(format_package_name("acme.billing.v2beta"), "Acme Billing V2beta");
        assert_eq!(format_package_name("a..b"), "A  B");
    }

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("CreateUser"), "CreateUser");
        assert_eq!(pascal_case("get_user"), "GetUser");
        assert_eq!(pascal_case("listUsers"), "ListUsers");
        assert_eq!(pascal_case("user_service_v2"), "UserServiceV2");
        assert_eq!(pascal_case("field_1"), "Field_1");
        assert_eq!(pascal_case("_private"), "XPrivate");
        assert_eq!(pascal_case("HTTPProxy"), "HTTPProxy");
    }

    #[test]
    fn test_collection_prefix() {
        assert_eq!(collection_prefix("example.v1"), "example_v1/");
        assert_eq!(collection_prefix("billing"), "billing/");
        assert_eq!(collection_prefix(""), "");
    }

    #[test]
    fn test_default_endpoints() {
        let endpoints = build_endpoints(&GeneratorConfig::default());
        assert_eq!(
            endpoints,
            vec![EndpointConfig {
                name: "Local".to_string(),
                http_url: "http://localhost:8080".to_string(),
                grpc_url: "localhost:50051".to_string(),
            }]
        );
    }

    #[test]
    fn test_remote_endpoints_drop_implicit_local() {
        let config = GeneratorConfig {
            dev_url: Some("https://api.dev.example.com/service".to_string()),
            prd_url: Some("https://api.example.com".to_string()),
            grpc_prd_url: Some("grpc.example.com:443".to_string()),
            ..Default::default()
        };

        let endpoints = build_endpoints(&config);
        let summary: Vec<(&str, &str, &str)> = endpoints
            .iter()
            .map(|e| (e.name.as_str(), e.http_url.as_str(), e.grpc_url.as_str()))
            .collect();

        assert_eq!(
            summary,
            vec![
                ("Development", "https://api.dev.example.com/service", "api.dev.example.com:443"),
                ("Production", "https://api.example.com", "grpc.example.com:443"),
            ]
        );
    }

    #[test]
    fn test_explicit_local_with_remotes() {
        let config = GeneratorConfig {
            local_url: Some("http://localhost:3000".to_string()),
            stg_url: Some("https://stg.example.com".to_string()),
            grpc_local_url: Some("localhost:9090".to_string()),
            ..Default::default()
        };

        let endpoints = build_endpoints(&config);
        assert_eq!(endpoints.len(), 2);
        assert_eq!(endpoints[0].name, "Local");
        assert_eq!(endpoints[0].http_url, "http://localhost:3000");
        assert_eq!(endpoints[0].grpc_url, "localhost:9090");
        assert_eq!(endpoints[1].name, "Staging");
        assert_eq!(endpoints[1].grpc_url, "stg.example.com:443");
    }

    #[test]
    fn test_local_grpc_derived_from_local_url() {
        let config = GeneratorConfig {
            local_url: Some("http://127.0.0.1:8000/api".to_string()),
            ..Default::default()
        };

        let endpoints = build_endpoints(&config);
        assert_eq!(endpoints[0].grpc_url, "127.0.0.1:8000");
    }
}
