mod cli;
mod commands;
mod history;
mod output;
mod tui;

use anyhow::Result;
use clap::Parser;

use btksorgu_core::AppConfig;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // .env first so the subscriber and config both see its variables.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Logs go to stderr: stdout carries results, which must stay
    // machine-readable under --json.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_env();

    let api_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();
    if api_key.is_empty() {
        if cli.json {
            output::print_json_error("", "GEMINI_API_KEY ayarlanmamış");
        } else {
            eprintln!("GEMINI_API_KEY ayarlanmamış!");
            eprintln!();
            eprintln!("  .env dosyası oluşturun:");
            eprintln!("  GEMINI_API_KEY=your_api_key");
            eprintln!();
            eprintln!("  API anahtarı almak için: https://aistudio.google.com/app/apikey");
        }
        std::process::exit(1);
    }

    if cli.tui {
        return tui::run(api_key, config).await;
    }

    commands::run(cli, config, api_key).await
}
