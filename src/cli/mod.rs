pub mod commands;

use clap::{Parser, Subcommand};

use crate::config::{self, AppConfig};

#[derive(Parser)]
#[command(name = "catalog-api")]
#[command(about = "Product catalogue API over a document store")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Override the configured listen port")]
    pub port: Option<u16>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve,

    #[command(about = "Create indexes and seed empty collections, then exit")]
    Seed,
}

impl Cli {
    /// Process configuration with command line overrides applied
    pub fn resolve_config(&self) -> AppConfig {
        let mut config = config::config().clone();
        if let Some(port) = self.port {
            config.server.port = port;
        }
        config
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.resolve_config();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => commands::serve::handle(config).await,
        Commands::Seed => commands::seed::handle(config).await,
    }
}
