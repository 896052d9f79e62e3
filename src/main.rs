use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use ean_price_compare::config::LoggingConfig;
use ean_price_compare::{AppConfig, ChromeRenderer, PageRenderer, Pacer, input, run_comparison};

#[derive(Debug, Parser)]
#[command(name = "ean-price-compare", version, about = "Compare retailer prices for a list of EAN codes")]
struct Cli {
    /// Configuration file (defaults to config/default.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Input CSV with `ean` and `termo_mercado_livre` columns
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output CSV path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Skip the randomized delay between retailer requests
    #[arg(long)]
    no_pacing: bool,

    /// Show the browser window
    #[arg(long)]
    headful: bool,
}

fn init_tracing(logging: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::from_default_env().add_directive("ean_price_compare=info".parse()?);

    match &logging.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, &logging.file_prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry().with(filter).with(fmt::layer()).init();
            Ok(None)
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(input) = cli.input {
        config.input.path = input;
    }
    if let Some(output) = cli.output {
        config.output.path = output;
    }
    if cli.no_pacing {
        config.pacing.enabled = false;
    }
    if cli.headful {
        config.browser.headless = false;
    }

    let _log_guard = init_tracing(&config.logging)?;
    info!("Starting EAN price comparison...");

    // Input problems are fatal before the browser is launched.
    let products = input::load_products(&config.input.path)
        .with_context(|| format!("Failed to read {}", config.input.path.display()))?;

    let mut renderer = ChromeRenderer::launch(&config.browser)?;
    let pacer = Pacer::from_config(&config.pacing);
    let table = run_comparison(&mut renderer, &products, &config, pacer).await;
    renderer.close().await?;

    if table.is_empty() {
        warn!("No products were processed; nothing written");
        return Ok(());
    }

    table
        .write_to_path(&config.output.path)
        .with_context(|| format!("Failed to write {}", config.output.path.display()))?;
    info!("Done! Prices saved to {}", config.output.path.display());

    Ok(())
}
