//! CLI entry point for mdsite

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mdsite")]
#[command(version)]
#[command(about = "Serve or build a tree of markdown content with layout templates", long_about = None)]
struct Cli {
    /// Site root directory (defaults to current directory)
    #[arg(short, long, global = true)]
    root: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the content tree over HTTP
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Render every markdown document to static HTML
    #[command(alias = "b")]
    Build {
        /// Output directory
        #[arg(short, long, default_value = "dist")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "mdsite=debug,info"
    } else {
        "mdsite=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let root_dir = cli.root.unwrap_or_else(|| std::env::current_dir().unwrap());

    match cli.command {
        Commands::Serve { port, ip } => {
            let site = mdsite::Site::new(&root_dir)?;
            site.prepare()?;
            let manager = site.content_manager()?;

            tracing::info!("content dir: {}", site.content_dir.display());
            tracing::info!("template dir: {}", site.template_dir.display());
            tracing::info!("static dir: {}", site.static_dir.display());

            mdsite::server::start(&site, manager, &ip, port).await?;
        }

        Commands::Build { output } => {
            let site = mdsite::Site::new(&root_dir)?;
            let manager = site.content_manager()?;
            let output = if output.is_absolute() {
                output
            } else {
                site.root_dir.join(output)
            };

            tracing::info!("Building '{}'...", site.content_dir.display());
            mdsite::commands::build::run(&site, &manager, &output)?;
        }
    }

    Ok(())
}
