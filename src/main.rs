mod config;
mod database;
mod models;
mod services;
mod utils;

use clap::Parser;
use config::{CleanupConfig, Cli};
use dotenv::dotenv;
use services::{CleanupOptions, CleanupReport};
use std::process::ExitCode;
use utils::CleanupError;

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    dotenv().ok();

    // Progress goes to stdout; failures are written to stderr below
    env_logger::Builder::from_env(env_logger::Env::new().default_filter_or("info"))
        .target(env_logger::Target::Stdout)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(report) => {
            log::debug!(
                "Scanned {} user(s), {} matched, {} modified (dry run: {})",
                report.scanned,
                report.fixed,
                report.updated,
                report.dry_run
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            let tier = if e.is_setup() { "setup" } else { "runtime" };
            eprintln!("Error during cleanup ({} failure): {}", tier, e);
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<CleanupReport, CleanupError> {
    let config = CleanupConfig::resolve(cli)?;

    let db = database::MongoDB::new(&config.credentials).await?;

    let options = CleanupOptions {
        collection: config.collection,
        dry_run: config.dry_run,
    };

    services::cleanup_empty_profile_images(&db, &options).await
}
