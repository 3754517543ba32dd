//! Ezyr gateway binary
//!
//! Run with: cargo run --bin ezyr
//! Or after build: ./target/release/ezyr

use clap::Parser;
use ezyr::config::AppConfig;

/// SaaS integration gateway for block-based CRUD over Google Sheets, Gmail,
/// and Airtable.
#[derive(Parser)]
#[command(name = "ezyr", version, about)]
struct Cli {
    /// Bind host (overrides EZYR_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides EZYR_PORT)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    // Load .env as early as possible so configuration sees it
    let _ = dotenvy::dotenv();

    ezyr::init_logging();

    let cli = Cli::parse();

    let mut config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    if let Err(e) = ezyr::http::start_server(config).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
