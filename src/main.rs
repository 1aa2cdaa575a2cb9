//! `hdfilmizle` CLI - serve the addon or query it from the terminal

mod cmd;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hdfilmizle::ContentKind;

#[derive(Parser)]
#[command(name = "hdfilmizle")]
#[command(about = "Catalog, meta and stream addon for hdfilmizle.to")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the addon over HTTP
    Serve {
        /// Port to listen on (defaults to PORT or 7000)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print a catalog as JSON
    Catalog {
        /// Content kind (movie, series)
        kind: ContentKind,

        /// Search term
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Print the full record for an identifier as JSON
    Meta {
        /// Content kind (movie, series)
        kind: ContentKind,

        /// Content identifier (hdfilmizle:<kind>:<slug>:<payload>)
        id: String,
    },

    /// Print stream links for an identifier as JSON
    Streams {
        /// Content kind (movie, series)
        kind: ContentKind,

        /// Content identifier (hdfilmizle:<kind>:<slug>:<payload>)
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so JSON on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port } => {
            cmd::serve::cmd_serve(port).await?;
        }
        Commands::Catalog { kind, search } => {
            cmd::query::cmd_catalog(kind, search.as_deref()).await?;
        }
        Commands::Meta { kind, id } => {
            cmd::query::cmd_meta(kind, &id).await?;
        }
        Commands::Streams { kind, id } => {
            cmd::query::cmd_streams(kind, &id).await?;
        }
    }

    Ok(())
}
