//! gemini-relay - local HTTP relay for the Gemini generative language API
//!
//! Accepts prompts from a local client and forwards them to the first
//! Gemini model that could be configured at startup.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gemini_relay::config::{Config, KeySource};
use gemini_relay::gemini::GeminiClient;
use gemini_relay::relay::{build_http_client, run_server};

#[derive(Parser)]
#[command(name = "gemini-relay")]
#[command(about = "Local HTTP relay for the Gemini generative language API")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the relay server
    Serve {
        /// Path to configuration file (defaults and environment when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override listen address
        #[arg(short, long)]
        listen: Option<String>,
    },

    /// Validate configuration
    Check {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List upstream models that support content generation
    Models {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

impl Commands {
    fn config_path(&self) -> Option<&PathBuf> {
        match self {
            Commands::Serve { config, .. }
            | Commands::Check { config }
            | Commands::Models { config } => config.as_ref(),
        }
    }
}

fn init_tracing(level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("gemini_relay={level},tower_http={level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (mut config, key_source) =
        Config::load(cli.command.config_path().map(PathBuf::as_path))
            .context("Failed to load configuration")?;

    init_tracing(&config.logging.level);

    match cli.command {
        Commands::Serve { config: path, listen } => {
            tracing::info!(config = ?path, key_source = %key_source, "Starting gemini-relay");

            if let Some(addr) = listen {
                tracing::info!(listen = %addr, "Override listen address");
                config.server.listen = addr;
                config
                    .server
                    .listen_addr()
                    .context("Invalid --listen override")?;
            }

            run_server(config).await
        }

        Commands::Check { .. } => {
            println!("Configuration OK");
            println!("  listen:     {}", config.server.listen);
            println!("  base_url:   {}", config.gemini.base_url);
            println!("  api_key:    {}", key_source);
            println!("  candidates: {}", config.gemini.models.join(", "));
            if key_source == KeySource::None {
                tracing::warn!("No API key configured - /generate will report 'not configured'");
            }
            Ok(())
        }

        Commands::Models { .. } => {
            let http = build_http_client(&config.gemini)?;
            let client = GeminiClient::from_config(&config.gemini, http).context(
                "No API key configured (set GEMINI_API_KEY or gemini.api_key)",
            )?;

            let models = client
                .list_generation_models()
                .await
                .context("Failed to list upstream models")?;
            for model in models {
                println!("{}", model);
            }
            Ok(())
        }
    }
}
