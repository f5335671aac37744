//! kubenav - navigate Kubernetes clusters from the terminal
//!
//! Discovers the resource kinds a cluster exposes, resolves loose aliases
//! the way kubectl does, renders uniform tables for any kind, and follows
//! declarative relationships between objects.

use anyhow::Result;
use clap::Parser;

use kubenav::cli::{self, Command};
use kubenav::services::ConnectionRegistry;

/// kubenav - navigate Kubernetes clusters from the terminal
#[derive(Parser, Debug)]
#[command(name = "kubenav")]
#[command(about = "Navigate Kubernetes resources and their relationships", long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(long, short = 'd')]
    debug: bool,

    /// Kubeconfig context to use (defaults to the current context)
    #[arg(long)]
    context: Option<String>,

    /// Namespace scope for queries
    #[arg(long, short = 'n', default_value = "default")]
    namespace: String,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    cli::logging::init_logging(args.debug);

    let registry = ConnectionRegistry::new();
    cli::commands::handle_command(&registry, args.context, &args.namespace, args.command).await
}
