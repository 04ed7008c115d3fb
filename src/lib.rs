pub mod auth;
pub mod cli;
pub mod commands;
pub mod controller;
pub mod health;
pub mod metrics;
pub mod settings;
pub mod snapshot;
pub mod token;
pub mod upload;
mod utils;

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use cli::{Args, Command};
use controller::HealthDataController;
use health::export::load_export;
use settings::Settings;
use upload::UploadClient;

pub fn run() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    runtime.block_on(execute(args))
}

async fn execute(args: Args) -> Result<()> {
    let settings = Settings::load(&args.config)?;
    let store = load_export(&settings.export_path)?;
    let uploader = UploadClient::new(&settings.upload_config())
        .context("failed to build upload client")?;

    let controller = HealthDataController::with_lookback_days(
        Arc::new(store),
        uploader,
        settings.lookback_days,
    );

    log::info!(
        "Health Bridge starting ({:?}, endpoint {})",
        args.command,
        settings.endpoint
    );

    match commands::request_health_access(&controller).await {
        Ok(message) => println!("{message}"),
        Err(message) if args.command == Command::Authorize => return Err(anyhow!(message)),
        // Denied scopes just come back empty, so fetching still shows
        // whatever the store will give us.
        Err(message) => eprintln!("{message}"),
    }
    if args.command == Command::Authorize {
        return Ok(());
    }

    let metrics = commands::fetch_metrics(&controller).await;
    print!("{}", commands::render_metrics(&metrics));
    if args.command == Command::Fetch {
        return Ok(());
    }

    let token = tokio::task::spawn_blocking(token::resolve_token)
        .await
        .context("token prompt worker join failed")??;
    println!("Using session token: {} (not stored)", token::redact(&token));

    let message = commands::send_to_api(&controller, &token)
        .await
        .map_err(|message| anyhow!(message))?;
    println!("{message}");
    Ok(())
}
