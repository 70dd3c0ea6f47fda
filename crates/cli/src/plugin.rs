//! protoc plugin mode
//!
//! protoc writes a `CodeGeneratorRequest` to stdin and expects a
//! `CodeGeneratorResponse` on stdout. Failures are reported through the
//! response `error` field so protoc can print them next to the input file.

use anyhow::{Context, Result};
use prost::Message;
use prost_types::compiler::{code_generator_response, CodeGeneratorResponse};
use protoc_gen_bruno_common::{GeneratedFile, GeneratorConfig};
use protoc_gen_bruno_generator::CollectionGenerator;
use protoc_gen_bruno_parser::{PluginRequest, ProtobufParser};
use std::io::{self, Read, Write};

/// Read a request from stdin and write the response to stdout
pub fn run() -> Result<()> {
    let mut input = Vec::new();
    io::stdin()
        .read_to_end(&mut input)
        .context("Failed to read CodeGeneratorRequest from stdin")?;

    let response = handle_request(&input);

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(&response.encode_to_vec())
        .context("Failed to write CodeGeneratorResponse")?;
    stdout.flush().context("Failed to flush stdout")?;

    Ok(())
}

/// Turn a serialized request into a response; never fails
pub fn handle_request(input: &[u8]) -> CodeGeneratorResponse {
    let mut response = match generate(input) {
        Ok(files) => CodeGeneratorResponse {
            file: files.into_iter().map(into_response_file).collect(),
            ..Default::default()
        },
        Err(e) => {
            tracing::error!("{:#}", e);
            CodeGeneratorResponse {
                error: Some(format!("{:#}", e)),
                ..Default::default()
            }
        }
    };

    response.supported_features =
        Some(code_generator_response::Feature::Proto3Optional as u64);
    response
}

fn generate(input: &[u8]) -> Result<Vec<GeneratedFile>> {
    let request = PluginRequest::decode_bytes(input)?;
    let config = GeneratorConfig::from_parameter(request.parameter())
        .context("Invalid plugin parameter")?;

    tracing::debug!(
        files = request.file_to_generate.len(),
        parameter = request.parameter(),
        "received plugin request"
    );

    let set = ProtobufParser::from_plugin_request(&request)
        .and_then(|parser| parser.parse())
        .context("Failed to read proto descriptors")?;

    let generator = CollectionGenerator::new(config).context("Failed to create generator")?;
    generator
        .generate(&set)
        .context("Failed to generate Bruno collection")
}

fn into_response_file(file: GeneratedFile) -> code_generator_response::File {
    code_generator_response::File {
        name: Some(file.path),
        content: Some(file.content),
        ..Default::default()
    }
}
