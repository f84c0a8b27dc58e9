//! gwint - Effective policy calculator for Gateway API resources
//!
//! Answers "what configuration actually applies to this resource?" by
//! resolving policy attachment across the GatewayClass → Gateway →
//! HTTPRoute → Backend hierarchy:
//! - List resources, policies, and policy CRDs from a cluster snapshot
//! - Describe a resource with its fully merged effective policies
//! - Trace every effective field back to the policy that set it

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod output;

use commands::{describe, get, parse_target_type, Context};
use config::CliConfig;
use error::{CliError, CliResult};
use gwint_snapshot::{FileSource, ResourceQuery, SnapshotSource};
use output::print_error;

/// gwint CLI application
#[derive(Parser)]
#[command(name = "gwint")]
#[command(about = "gwint - Effective policy calculator for Gateway API resources", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "GWINT_CONFIG")]
    config: Option<String>,

    /// Cluster snapshot file (multi-document YAML)
    #[arg(short, long, env = "GWINT_SNAPSHOT")]
    file: Option<PathBuf>,

    /// Namespace to operate in
    #[arg(short, long)]
    namespace: Option<String>,

    /// Operate across all namespaces
    #[arg(short = 'A', long)]
    all_namespaces: bool,

    /// Output format (table, json, yaml)
    #[arg(short, long, default_value = "table")]
    output: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Display one or many resources, policies, or policy CRDs
    Get {
        /// What to list: policies, policycrds, gatewayclasses, gateways,
        /// httproutes, or backends
        resource_type: String,
    },

    /// Show detailed state, including calculated effective policies
    Describe {
        /// What to describe: policies, policycrds, gatewayclasses,
        /// gateways, httproutes, or backends
        resource_type: String,

        /// Name of a single object; omit to describe all matches
        name: Option<String>,

        /// Merge effective policies across all parents of the target
        /// instead of reporting one result per parent
        #[arg(long)]
        across_parents: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    if let Err(e) = run(cli).await {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let config = CliConfig::load(cli.config.as_deref())?;

    let namespace = cli
        .namespace
        .or(config.default_namespace)
        .unwrap_or_else(|| "default".to_string());
    let query = if cli.all_namespaces {
        ResourceQuery::All
    } else {
        ResourceQuery::Namespace(namespace.clone())
    };

    let path = cli.file.or(config.default_snapshot).ok_or_else(|| {
        CliError::Config(
            "no snapshot file given; pass -f/--file or set default_snapshot".to_string(),
        )
    })?;
    let snapshot = FileSource::new(&path).load().await?;
    let ctx = Context::build(snapshot, query)?;

    match cli.command {
        Commands::Get { resource_type } => {
            let target = parse_target_type(&resource_type)?;
            get::execute(&ctx, target, cli.output)
        }
        Commands::Describe {
            resource_type,
            name,
            across_parents,
        } => {
            let target = parse_target_type(&resource_type)?;
            describe::execute(&ctx, target, name, &namespace, across_parents, cli.output)
        }
    }
}
