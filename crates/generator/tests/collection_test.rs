//! Integration tests for Bruno collection generation

use pretty_assertions::assert_eq;
use protoc_gen_bruno_common::{
    DescriptorSet, EnumDescriptor, FieldDescriptor, FieldKind, GeneratedFile, GenerationMode,
    GeneratorConfig, GeneratorError, HttpPattern, HttpRule, MessageDescriptor, MethodDescriptor,
    ProtoFile, ServiceDescriptor,
};
use protoc_gen_bruno_generator::{generate_collection, write_to_directory, CollectionGenerator};
use std::collections::HashSet;
use tempfile::TempDir;

fn field(name: &str, json_name: &str, kind: FieldKind) -> FieldDescriptor {
    FieldDescriptor {
        name: name.to_string(),
        json_name: json_name.to_string(),
        kind,
        repeated: false,
    }
}

fn message(full_name: &str, fields: Vec<FieldDescriptor>) -> MessageDescriptor {
    MessageDescriptor {
        full_name: full_name.to_string(),
        fields,
    }
}

fn method(
    package: &str,
    service: &str,
    name: &str,
    input_type: &str,
    rule: Option<(HttpPattern, &str)>,
) -> MethodDescriptor {
    MethodDescriptor {
        name: name.to_string(),
        input_type: input_type.to_string(),
        http_rule: rule.map(|(pattern, body)| HttpRule {
            pattern: Some(pattern),
            body: body.to_string(),
        }),
        rpc_selector: format!("{}.{}/{}", package, service, name),
    }
}

/// `example/v1/user.proto` with a user service and an admin service
fn user_api() -> DescriptorSet {
    let mut set = DescriptorSet::default();

    let status = FieldKind::Enum(EnumDescriptor {
        full_name: "example.v1.Status".to_string(),
        values: vec!["STATUS_UNSPECIFIED".to_string(), "STATUS_ACTIVE".to_string()],
    });
    let mut roles = field("roles", "roles", FieldKind::String);
    roles.repeated = true;

    set.insert_message(message(
        "example.v1.User",
        vec![
            field("user_id", "userId", FieldKind::String),
            field("display_name", "displayName", FieldKind::String),
            field("status", "status", status),
            roles,
            field(
                "create_time",
                "createTime",
                FieldKind::Message("google.protobuf.Timestamp".to_string()),
            ),
        ],
    ));
    set.insert_message(message(
        "example.v1.CreateUserRequest",
        vec![
            field("name", "name", FieldKind::String),
            field("email", "email", FieldKind::String),
        ],
    ));
    set.insert_message(message(
        "example.v1.ListUsersRequest",
        vec![
            field("page_size", "pageSize", FieldKind::Int32),
            field("page_token", "pageToken", FieldKind::String),
        ],
    ));
    set.insert_message(message(
        "example.v1.UpdateUserRequest",
        vec![
            field("user_id", "userId", FieldKind::String),
            field("user", "user", FieldKind::Message("example.v1.User".to_string())),
            field(
                "update_mask",
                "updateMask",
                FieldKind::Message("google.protobuf.FieldMask".to_string()),
            ),
        ],
    ));
    set.insert_message(message(
        "example.v1.PurgeRequest",
        vec![field("older_than_days", "olderThanDays", FieldKind::Uint32)],
    ));

    let user_service = ServiceDescriptor {
        name: "UserService".to_string(),
        methods: vec![
            method(
                "example.v1",
                "UserService",
                "CreateUser",
                "example.v1.CreateUserRequest",
                Some((HttpPattern::Post("/v1/users".to_string()), "*")),
            ),
            method(
                "example.v1",
                "UserService",
                "ListUsers",
                "example.v1.ListUsersRequest",
                Some((HttpPattern::Get("/v1/users".to_string()), "")),
            ),
            method(
                "example.v1",
                "UserService",
                "UpdateUser",
                "example.v1.UpdateUserRequest",
                Some((HttpPattern::Patch("/v1/users/{user_id}".to_string()), "user")),
            ),
        ],
    };

    let admin_service = ServiceDescriptor {
        name: "AdminService".to_string(),
        methods: vec![method(
            "example.v1",
            "AdminService",
            "purge_users",
            "example.v1.PurgeRequest",
            None,
        )],
    };

    set.files.push(ProtoFile {
        path: "example/v1/user.proto".to_string(),
        package: "example.v1".to_string(),
        services: vec![user_service, admin_service],
    });

    set
}

fn find<'a>(files: &'a [GeneratedFile], path: &str) -> &'a str {
    files
        .iter()
        .find(|f| f.path == path)
        .map(|f| f.content.as_str())
        .unwrap_or_else(|| panic!("{} was not generated", path))
}

fn paths(files: &[GeneratedFile]) -> Vec<&str> {
    files.iter().map(|f| f.path.as_str()).collect()
}

#[test]
fn test_generate_user_api_paths() {
    let files = generate_collection(&user_api(), GeneratorConfig::default()).unwrap();

    assert_eq!(
        paths(&files),
        vec![
            "bruno.json",
            "environments/Local.bru",
            "UserService/CreateUser.bru",
            "UserService-gRPC/CreateUser.bru",
            "UserService/ListUsers.bru",
            "UserService-gRPC/ListUsers.bru",
            "UserService/UpdateUser.bru",
            "UserService-gRPC/UpdateUser.bru",
            "AdminService-gRPC/PurgeUsers.bru",
        ]
    );
}

#[test]
fn test_collection_name_from_package() {
    let files = generate_collection(&user_api(), GeneratorConfig::default()).unwrap();
    assert!(find(&files, "bruno.json").contains("\"name\": \"Example V1 API\""));
}

#[test]
fn test_create_user_http_request() {
    let files = generate_collection(&user_api(), GeneratorConfig::default()).unwrap();

    let expected = r#"meta {
  name: CreateUser
  type: http
  seq: 1
}

post {
  url: {{base_url}}/v1/users
}

body:json {
{
    "name": "example_name",
    "email": "example_email"
  }
}
"#;
    assert_eq!(find(&files, "UserService/CreateUser.bru"), expected);
}

#[test]
fn test_list_users_http_request() {
    let files = generate_collection(&user_api(), GeneratorConfig::default()).unwrap();

    let expected = r#"meta {
  name: ListUsers
  type: http
  seq: 1
}

get {
  url: {{base_url}}/v1/users
}

params:query {
  pageSize: 0
  pageToken: example_pageToken
}
"#;
    assert_eq!(find(&files, "UserService/ListUsers.bru"), expected);
}

#[test]
fn test_update_user_named_body_field() {
    let files = generate_collection(&user_api(), GeneratorConfig::default()).unwrap();

    let expected = r#"meta {
  name: UpdateUser
  type: http
  seq: 1
}

patch {
  url: {{base_url}}/v1/users/{user_id}
}

params:query {
  updateMask: field1,field2.subfield
}

body:json {
{
    "userId": "example_userId",
    "displayName": "example_displayName",
    "status": "STATUS_UNSPECIFIED",
    "roles": ["example_roles"],
    "createTime": "2024-01-01T00:00:00Z"
  }
}
"#;
    assert_eq!(find(&files, "UserService/UpdateUser.bru"), expected);
}

#[test]
fn test_update_user_grpc_request() {
    let files = generate_collection(&user_api(), GeneratorConfig::default()).unwrap();

    let expected = r#"meta {
  name: UpdateUser
  type: grpc
  seq: 1
}

grpc {
  url: {{grpc_url}}
  method: example.v1.UserService/UpdateUser
}

metadata {
}

body {
{
    "userId": "example_userId",
    "user": {
      "userId": "example_userId",
      "displayName": "example_displayName",
      "status": "STATUS_UNSPECIFIED",
      "roles": ["example_roles"],
      "createTime": "2024-01-01T00:00:00Z"
    },
    "updateMask": "field1,field2.subfield"
  }
}

script:pre-request {
  // Proto file: example/v1/user.proto
}
"#;
    assert_eq!(find(&files, "UserService-gRPC/UpdateUser.bru"), expected);
}

#[test]
fn test_method_without_rule_only_has_grpc_request() {
    let files = generate_collection(&user_api(), GeneratorConfig::default()).unwrap();

    assert!(files.iter().all(|f| !f.path.starts_with("AdminService/")));
    let grpc = find(&files, "AdminService-gRPC/PurgeUsers.bru");
    assert!(grpc.contains("  name: PurgeUsers\n"));
    assert!(grpc.contains("  method: example.v1.AdminService/purge_users\n"));
}

#[test]
fn test_environment_files() {
    let config = GeneratorConfig {
        dev_url: Some("https://api.dev.example.com/users".to_string()),
        prd_url: Some("https://api.example.com".to_string()),
        grpc_prd_url: Some("grpc.example.com:8443".to_string()),
        ..Default::default()
    };
    let files = generate_collection(&user_api(), config).unwrap();

    assert!(files.iter().all(|f| f.path != "environments/Local.bru"));
    assert_eq!(
        find(&files, "environments/Development.bru"),
        "vars {\n  base_url: https://api.dev.example.com/users\n  grpc_url: api.dev.example.com:443\n}\n"
    );
    assert_eq!(
        find(&files, "environments/Production.bru"),
        "vars {\n  base_url: https://api.example.com\n  grpc_url: grpc.example.com:8443\n}\n"
    );
}

#[test]
fn test_per_package_collections() {
    let mut set = user_api();
    set.insert_message(message("billing.v1.GetInvoiceRequest", vec![]));
    set.files.push(ProtoFile {
        path: "billing/v1/billing.proto".to_string(),
        package: "billing.v1".to_string(),
        services: vec![ServiceDescriptor {
            name: "BillingService".to_string(),
            methods: vec![method(
                "billing.v1",
                "BillingService",
                "GetInvoice",
                "billing.v1.GetInvoiceRequest",
                None,
            )],
        }],
    });
    // a file without services opens no collection
    set.files.push(ProtoFile {
        path: "shared/v1/types.proto".to_string(),
        package: "shared.v1".to_string(),
        services: vec![],
    });

    let config = GeneratorConfig {
        single_collection: false,
        ..Default::default()
    };
    let files = generate_collection(&set, config).unwrap();

    let configs: Vec<&str> = paths(&files)
        .into_iter()
        .filter(|p| p.ends_with("bruno.json"))
        .collect();
    assert_eq!(configs, vec!["example_v1/bruno.json", "billing_v1/bruno.json"]);

    assert!(paths(&files).contains(&"billing_v1/environments/Local.bru"));
    assert!(paths(&files).contains(&"billing_v1/BillingService-gRPC/GetInvoice.bru"));
    assert!(paths(&files).contains(&"example_v1/UserService/CreateUser.bru"));
    assert!(paths(&files).iter().all(|p| !p.starts_with("shared_v1/")));

    // the name is derived from every service and the first file's package
    assert!(find(&files, "billing_v1/bruno.json").contains("\"name\": \"Example V1 API\""));

    let empty_body = find(&files, "billing_v1/BillingService-gRPC/GetInvoice.bru");
    assert!(empty_body.contains("body {\n{\n  }\n}\n"));
}

#[test]
fn test_single_collection_emits_config_once() {
    let mut set = user_api();
    set.files.push(ProtoFile {
        path: "example/v1/other.proto".to_string(),
        package: "example.v2".to_string(),
        services: vec![ServiceDescriptor {
            name: "OtherService".to_string(),
            methods: vec![],
        }],
    });

    let files = generate_collection(&set, GeneratorConfig::default()).unwrap();
    let configs = paths(&files)
        .into_iter()
        .filter(|p| p.ends_with("bruno.json"))
        .count();
    assert_eq!(configs, 1);
}

#[test]
fn test_groups_shared_across_calls() {
    let generator = CollectionGenerator::new(GeneratorConfig::default()).unwrap();
    let mut emitted = HashSet::new();

    let first = generator.generate_with_groups(&user_api(), &mut emitted).unwrap();
    let second = generator.generate_with_groups(&user_api(), &mut emitted).unwrap();

    assert!(paths(&first).contains(&"bruno.json"));
    assert!(!paths(&second).contains(&"bruno.json"));
    assert!(emitted.contains(""));
}

#[test]
fn test_http_mode() {
    let config = GeneratorConfig {
        mode: GenerationMode::Http,
        ..Default::default()
    };
    let files = generate_collection(&user_api(), config).unwrap();

    assert!(files.iter().all(|f| !f.path.contains("-gRPC/")));
    assert!(!find(&files, "bruno.json").contains("grpc"));
    assert!(!find(&files, "environments/Local.bru").contains("grpc_url"));
}

#[test]
fn test_custom_proto_root() {
    let config = GeneratorConfig {
        proto_root: "../../api/proto/src".to_string(),
        collection_name: Some("Users".to_string()),
        ..Default::default()
    };
    let files = generate_collection(&user_api(), config).unwrap();

    assert_eq!(
        find(&files, "bruno.json"),
        "{\n  \"version\": \"1\",\n  \"name\": \"Users\",\n  \"type\": \"collection\",\n  \"grpc\": {\n    \"proto\": {\n      \"root\": \"../../api/proto/src\"\n    }\n  }\n}\n"
    );
}

#[test]
fn test_generation_is_deterministic() {
    let set = user_api();
    let first = generate_collection(&set, GeneratorConfig::default()).unwrap();
    let second = generate_collection(&set, GeneratorConfig::default()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_unresolved_input_aborts() {
    let mut set = user_api();
    set.messages.remove("example.v1.ListUsersRequest");

    let result = generate_collection(&set, GeneratorConfig::default());
    assert!(matches!(
        result,
        Err(GeneratorError::UnresolvedType(name)) if name == "example.v1.ListUsersRequest"
    ));
}

#[test]
fn test_write_collection_to_directory() {
    let temp_dir = TempDir::new().unwrap();
    let files = generate_collection(&user_api(), GeneratorConfig::default()).unwrap();

    write_to_directory(&files, temp_dir.path()).unwrap();

    let output = temp_dir.path();
    assert!(output.join("bruno.json").exists());
    assert!(output.join("environments/Local.bru").exists());
    assert!(output.join("UserService/CreateUser.bru").exists());
    assert!(output.join("AdminService-gRPC/PurgeUsers.bru").exists());

    let written = std::fs::read_to_string(output.join("UserService/ListUsers.bru")).unwrap();
    assert_eq!(written, find(&files, "UserService/ListUsers.bru"));
}
