//! Partitioning of request fields into path, query, and body parameters

use crate::http_rule::HttpVerb;
use protoc_gen_bruno_common::FieldDescriptor;

/// The `body` setting of an HTTP rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodySelector<'a> {
    /// No body configured (empty string)
    None,
    /// `body: "*"`, every non-path field
    Wildcard,
    /// `body: "<field>"`, one top-level field
    Field(&'a str),
}

impl<'a> BodySelector<'a> {
    pub fn parse(body: &'a str) -> Self {
        match body {
            "" => BodySelector::None,
            "*" => BodySelector::Wildcard,
            name => BodySelector::Field(name),
        }
    }
}

/// Where a single request field is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Path,
    Query,
    Body,
}

/// Top-level request fields split by placement, each in declaration order
#[derive(Debug, Default, PartialEq)]
pub struct FieldPartition<'f> {
    pub path: Vec<&'f FieldDescriptor>,
    pub query: Vec<&'f FieldDescriptor>,
    pub body: Vec<&'f FieldDescriptor>,
}

/// Decide where one field goes
///
/// POST, PUT, and PATCH without a body selector send every non-path field as
/// a query parameter rather than in a body.
pub fn place(
    field_name: &str,
    is_path_param: bool,
    verb: HttpVerb,
    selector: BodySelector<'_>,
) -> Placement {
    match (is_path_param, verb, selector) {
        (true, _, _) => Placement::Path,
        (false, HttpVerb::Get | HttpVerb::Delete, _) => Placement::Query,
        (false, _, BodySelector::Wildcard) => Placement::Body,
        (false, _, BodySelector::Field(name)) if name == field_name => Placement::Body,
        (false, _, BodySelector::Field(_) | BodySelector::None) => Placement::Query,
    }
}

/// Partition the top-level fields of a request message
pub fn classify<'f>(
    fields: &'f [FieldDescriptor],
    path_params: &[String],
    verb: HttpVerb,
    selector: BodySelector<'_>,
) -> FieldPartition<'f> {
    let mut partition = FieldPartition::default();

    for field in fields {
        let is_path_param = path_params.iter().any(|param| *param == field.name);
        match place(&field.name, is_path_param, verb, selector) {
            Placement::Path => partition.path.push(field),
            Placement::Query => partition.query.push(field),
            Placement::Body => partition.body.push(field),
        }
    }

    partition
}
