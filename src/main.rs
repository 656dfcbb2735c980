//! nanochat - a minimal tool-calling chat client for OpenAI-compatible
//! endpoints (hosted APIs or local model servers).

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use nanochat::cli;
use nanochat::config::loader::load_config;

const VERSION: &str = "0.1.0";

#[derive(Parser)]
#[command(name = "nanochat", about = "nanochat - tool-calling chat client", version = VERSION)]
struct Cli {
    /// Verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a single message and print the reply.
    Ask {
        /// Message to send.
        message: String,
        /// Sampling temperature override.
        #[arg(short, long)]
        temperature: Option<f64>,
        /// Max output tokens override.
        #[arg(long)]
        max_tokens: Option<u32>,
    },
    /// Interactive chat loop (/reset clears history, /quit exits).
    Chat,
    /// Write a default configuration file.
    Onboard,
    /// Show the effective configuration and registered tools.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_filter = if args.verbose { "nanochat=debug" } else { "nanochat=info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = load_config(None);

    match args.command {
        Commands::Ask {
            message,
            temperature,
            max_tokens,
        } => cli::run_ask(&config, &message, temperature, max_tokens).await,
        Commands::Chat => cli::run_chat(&config).await,
        Commands::Onboard => cli::run_onboard(),
        Commands::Status => cli::run_status(&config),
    }
}
