//! Modgraph CLI entry point

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod manifest;

#[derive(Parser)]
#[command(name = "modgraph")]
#[command(about = "Module dependency tracking for incremental recompilation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Project root path (defaults to current directory)
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    /// Manifest describing modules, imports and includes, relative to the root
    #[arg(short, long, default_value = manifest::MANIFEST_FILE, global = true)]
    manifest: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Report the modules that become dirty when the given files change
    Dirty {
        /// Changed files, relative to the root
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Show transitive dependencies and dependents of a file
    Deps {
        file: PathBuf,
    },
    /// Print the closed dependency graph in Graphviz format
    Dot,
    /// Watch the project and report dirty modules as files change
    Watch,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so reports on stdout stay machine-readable.
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "modgraph={log_level},modgraph_core={log_level},modgraph_watcher={log_level}"
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("Modgraph v{}", env!("CARGO_PKG_VERSION"));
    let root = commands::resolve_root(&cli.root);
    tracing::debug!("Project root: {}", root.display());

    match cli.command {
        Commands::Dirty { files } => commands::dirty(root, cli.manifest, files),
        Commands::Deps { file } => commands::deps(root, cli.manifest, file),
        Commands::Dot => commands::dot(root, cli.manifest),
        Commands::Watch => commands::watch(root, cli.manifest).await,
        Commands::Version => {
            println!("Modgraph v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
