mod config;
mod generate_cmd;
mod serve_cmd;
#[cfg(test)]
mod test_util;

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use saarathi_core::backend::GeminiBackend;
use saarathi_core::{ClassLevel, Difficulty, GenerationClient, GenerationConfig, RequestController};

use generate_cmd::{GenerateArgs, OutputFormat};

#[derive(Parser)]
#[command(name = "saarathi", about = "NEP 2020 aligned lesson plan generator")]
struct Cli {
    /// Gemini API key (overrides SAARATHI_API_KEY env var)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Gemini model name (overrides SAARATHI_MODEL env var)
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a saarathi config file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Run the web interface
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
        /// Port to listen on
        #[arg(long, default_value_t = 3000)]
        port: u16,
    },
    /// Generate a single lesson plan
    Generate {
        /// Class: 6, 7 or 8
        #[arg(long, default_value = "6")]
        class: ClassLevel,
        /// Subject (e.g. Science)
        #[arg(long)]
        subject: String,
        /// Topic (e.g. Photosynthesis)
        #[arg(long)]
        topic: String,
        /// Difficulty: below-basic, average, advanced or mixed
        #[arg(long, default_value = "average")]
        difficulty: Difficulty,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Html)]
        format: OutputFormat,
        /// Output file path (defaults to stdout)
        #[arg(long)]
        output: Option<String>,
    },
    /// Print the JSON response schema sent to the model
    Schema,
}

/// Execute the `saarathi init` command: write config file.
fn cmd_init(overrides: &config::Overrides, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let api_key = overrides
        .api_key
        .clone()
        .or_else(|| std::env::var(config::ENV_API_KEY).ok())
        .filter(|k| !k.trim().is_empty())
        .with_context(|| {
            format!("no API key given; pass --api-key or set {}", config::ENV_API_KEY)
        })?;

    let cfg = config::ConfigFile {
        gemini: config::GeminiSection {
            api_key,
            model: overrides.model.clone(),
            temperature: None,
            endpoint: None,
        },
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    if let Some(model) = &cfg.gemini.model {
        println!("  gemini.model = {model}");
    }
    println!();
    println!("Next: run `saarathi serve` and open the printed address.");

    Ok(())
}

/// Resolve and validate the generation config.
fn resolve_config(overrides: &config::Overrides) -> anyhow::Result<GenerationConfig> {
    let resolved = config::resolve(overrides)?;
    resolved.validate().context("invalid configuration")?;
    tracing::debug!(config = ?resolved, "configuration resolved");
    Ok(resolved)
}

fn gemini_backend(config: &GenerationConfig) -> Arc<GeminiBackend> {
    Arc::new(GeminiBackend::new(&config.endpoint, &config.api_key))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let overrides = config::Overrides {
        api_key: cli.api_key,
        model: cli.model,
    };

    match cli.command {
        Commands::Init { force } => {
            cmd_init(&overrides, force)?;
        }
        Commands::Serve { bind, port } => {
            let resolved = resolve_config(&overrides)?;
            let client = GenerationClient::new(gemini_backend(&resolved), &resolved);
            let controller = Arc::new(RequestController::new(client));
            serve_cmd::run_serve(controller, &bind, port).await?;
        }
        Commands::Generate {
            class,
            subject,
            topic,
            difficulty,
            format,
            output,
        } => {
            let resolved = resolve_config(&overrides)?;
            let args = GenerateArgs {
                class,
                subject,
                topic,
                difficulty,
                format,
                output,
            };
            generate_cmd::run_generate(gemini_backend(&resolved), &resolved, &args).await?;
        }
        Commands::Schema => {
            generate_cmd::run_schema()?;
        }
    }

    Ok(())
}
