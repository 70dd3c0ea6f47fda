//! protoc-gen-bruno CLI
//!
//! Run without a subcommand, the binary is a protoc plugin:
//!
//! ```text
//! protoc --bruno_out=bruno/collections --bruno_opt=mode=all -I proto api.proto
//! ```
//!
//! The `generate` and `inspect` subcommands work on a FileDescriptorSet
//! produced with `protoc --include_imports --descriptor_set_out=api.pb`.

mod plugin;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use protoc_gen_bruno_common::{
    DescriptorSet, GenerationMode, GeneratorConfig, HttpPattern, MethodDescriptor,
};
use protoc_gen_bruno_generator::{write_to_directory, CollectionGenerator};
use protoc_gen_bruno_parser::parse_descriptor_set_file;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "protoc-gen-bruno")]
#[command(
    version,
    about = "Generate Bruno collections from Protocol Buffer services",
    long_about = "Generate Bruno collections from Protocol Buffer services.\n\n\
        Without a subcommand this binary speaks the protoc plugin protocol on stdin/stdout."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a Bruno collection from a FileDescriptorSet
    #[command(after_help = "EXAMPLES:\n  \
        # Compile protos with imports, then generate\n  \
        protoc --include_imports --descriptor_set_out=api.pb -I proto proto/example/v1/*.proto\n  \
        protoc-gen-bruno generate --descriptor-set api.pb --output bruno/collections\n\n  \
        # HTTP requests only, with a YAML config\n  \
        protoc-gen-bruno generate \\\n    \
        --descriptor-set api.pb \\\n    \
        --config bruno.yaml \\\n    \
        --mode http")]
    Generate {
        /// Path to a binary FileDescriptorSet
        #[arg(short, long)]
        descriptor_set: PathBuf,

        /// YAML file with generator options (same keys as the plugin parameter)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, default_value = "./bruno")]
        output: PathBuf,

        /// Which request kinds to generate (overrides the config file)
        #[arg(short, long)]
        mode: Option<ModeArg>,

        /// Collection name (overrides the config file)
        #[arg(long)]
        collection_name: Option<String>,

        /// One collection per proto package instead of a single collection
        #[arg(long)]
        per_package: bool,
    },

    /// Show the services, methods, and HTTP rules in a FileDescriptorSet
    Inspect {
        /// Path to a binary FileDescriptorSet
        #[arg(short, long)]
        descriptor_set: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    /// HTTP and gRPC requests
    All,
    /// HTTP requests for methods with a google.api.http rule
    Http,
    /// gRPC requests for every method
    Grpc,
}

impl From<ModeArg> for GenerationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::All => GenerationMode::All,
            ModeArg::Http => GenerationMode::Http,
            ModeArg::Grpc => GenerationMode::Grpc,
        }
    }
}

/// Overrides from `generate` flags, applied on top of the config file
struct GenerateOverrides {
    mode: Option<ModeArg>,
    collection_name: Option<String>,
    per_package: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        None => plugin::run()?,
        Some(Commands::Generate {
            descriptor_set,
            config,
            output,
            mode,
            collection_name,
            per_package,
        }) => {
            generate_command(
                descriptor_set.as_path(),
                config.as_deref(),
                output.as_path(),
                GenerateOverrides {
                    mode,
                    collection_name,
                    per_package,
                },
                cli.verbose,
            )?;
        }
        Some(Commands::Inspect { descriptor_set }) => {
            inspect_command(descriptor_set.as_path())?;
        }
    }

    Ok(())
}

/// Logs go to stderr; stdout carries the plugin response
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>, overrides: GenerateOverrides) -> Result<GeneratorConfig> {
    let mut config = match path {
        Some(path) => GeneratorConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => GeneratorConfig::default(),
    };

    if let Some(mode) = overrides.mode {
        config.mode = mode.into();
    }
    if let Some(name) = overrides.collection_name.filter(|name| !name.is_empty()) {
        config.collection_name = Some(name);
    }
    if overrides.per_package {
        config.single_collection = false;
    }

    Ok(config)
}

fn generate_command(
    descriptor_set: &Path,
    config_path: Option<&Path>,
    output: &Path,
    overrides: GenerateOverrides,
    verbose: bool,
) -> Result<()> {
    println!(
        "{} Generating Bruno collection from: {}",
        "→".cyan(),
        descriptor_set.display()
    );

    let config = load_config(config_path, overrides)?;

    if verbose {
        println!("  Mode: {}", config.mode.as_str());
        println!("  Single collection: {}", config.single_collection);
        println!("  Proto root: {}", config.proto_root);
        println!("  Output: {}", output.display());
    }

    println!("{} Parsing descriptors...", "→".cyan());
    let set = parse_descriptor_set_file(descriptor_set)
        .context("Failed to parse FileDescriptorSet")?;

    let service_count = set.services().count();
    println!(
        "{} Parsed {} files with {} services",
        "✓".green(),
        set.files.len(),
        service_count
    );

    if service_count == 0 {
        println!(
            "{} No services found; was the set built from the right files?",
            "!".yellow()
        );
    }

    println!("{} Generating requests...", "→".cyan());
    let generator = CollectionGenerator::new(config).context("Failed to create generator")?;
    let files = generator
        .generate(&set)
        .context("Failed to generate Bruno collection")?;

    write_to_directory(&files, output).context("Failed to write collection")?;

    println!("\n{}", "✓ Generation complete!".green().bold());
    println!("\n{}", "Generated files:".bold());
    for file in &files {
        println!("  📄 {}", output.join(&file.path).display());
    }
    println!("\n{}", "Environments:".bold());
    for endpoint in generator.endpoints() {
        println!(
            "  • {} ({}, {})",
            endpoint.name.cyan(),
            endpoint.http_url,
            endpoint.grpc_url
        );
    }

    Ok(())
}

fn inspect_command(descriptor_set: &Path) -> Result<()> {
    println!(
        "{} Inspecting descriptor set: {}",
        "→".cyan(),
        descriptor_set.display()
    );

    let set = parse_descriptor_set_file(descriptor_set)
        .context("Failed to parse FileDescriptorSet")?;

    println!("\n{}", "✓ Parse successful!".green().bold());
    print_descriptor_set(&set);

    Ok(())
}

fn print_descriptor_set(set: &DescriptorSet) {
    for file in &set.files {
        println!("\n{} {}", "File:".bold(), file.path.yellow());
        if !file.package.is_empty() {
            println!("  Package: {}", file.package);
        }

        for service in &file.services {
            println!("  {} {}", "Service:".bold(), service.name.cyan());
            for method in &service.methods {
                println!("    • {} {}", method.name, describe_http_rule(method).dimmed());
            }
        }
    }

    println!("\n  Messages: {}", set.messages.len());
}

fn describe_http_rule(method: &MethodDescriptor) -> String {
    let Some(rule) = &method.http_rule else {
        return "(gRPC only)".to_string();
    };

    let route = match &rule.pattern {
        Some(HttpPattern::Get(path)) => format!("GET {}", path),
        Some(HttpPattern::Post(path)) => format!("POST {}", path),
        Some(HttpPattern::Put(path)) => format!("PUT {}", path),
        Some(HttpPattern::Delete(path)) => format!("DELETE {}", path),
        Some(HttpPattern::Patch(path)) => format!("PATCH {}", path),
        Some(HttpPattern::Custom { kind, path }) => format!("{} {} (unsupported)", kind, path),
        None => "(no pattern)".to_string(),
    };

    if rule.body.is_empty() {
        route
    } else {
        format!("{} body={}", route, rule.body)
    }
}
