//! maiactl: manage MAIA memories, namespaces and context from the shell.

mod commands;
mod output;

use clap::{Parser, Subcommand};
use maia_client::{Client, ClientConfig};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "maiactl")]
#[command(about = "MAIA CLI - manage AI memory and context")]
#[command(version)]
struct Cli {
    /// MAIA server URL
    #[arg(
        short,
        long,
        env = "MAIA_URL",
        default_value = "http://localhost:8080",
        global = true
    )]
    server: String,

    /// API key sent as X-API-Key
    #[arg(long, env = "MAIA_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value = "30", global = true)]
    timeout: u64,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check server health
    Health,
    /// Show storage statistics
    Stats,
    /// Print the CLI version
    Version,
    /// Manage memories
    #[command(subcommand, visible_alias = "mem")]
    Memory(commands::MemoryCommand),
    /// Manage namespaces
    #[command(subcommand, visible_alias = "ns")]
    Namespace(commands::NamespaceCommand),
    /// Assemble context for a query
    Context(commands::ContextArgs),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if let Command::Version = cli.command {
        println!("maiactl {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    tracing::debug!(server = %cli.server, timeout_secs = cli.timeout, "connecting");
    let mut config = ClientConfig::new(&cli.server).with_timeout(Duration::from_secs(cli.timeout));
    if let Some(key) = cli.api_key {
        config = config.with_api_key(key);
    }
    let client = Client::with_config(config)?;
    let out = output::Printer::new(cli.json);

    let res = match cli.command {
        Command::Health => commands::health(&client, &out).await,
        Command::Stats => commands::stats(&client, &out).await,
        Command::Memory(cmd) => commands::memory(&client, &out, cmd).await,
        Command::Namespace(cmd) => commands::namespace(&client, &out, cmd).await,
        Command::Context(args) => commands::context(&client, &out, args).await,
        Command::Version => Ok(()),
    };
    client.close();
    res
}
