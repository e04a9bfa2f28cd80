//! PostgreSQL Backup Tool
//!
//! Dumps every non-template database (or one explicitly configured
//! database) with pg_dump and packages each dump, plus its file store when
//! one exists, into a dated zip archive.

// backuptool/src/main.rs
mod backup;
mod config;
mod utils;

use anyhow::{Context, Result};
use config::BackupConfig;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match run_app().await {
        Ok(_) => {
            println!("✅ Backup completed successfully.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("❌ Error: {:?}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run_app() -> Result<()> {
    // Credentials may live in a .env file instead of config.json.
    dotenv::dotenv().ok();

    // Config path defaults to config.json next to the executable (or the
    // project root under `cargo run`); the first argument overrides it.
    let config_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.json"));
    let config = BackupConfig::load_from_json(&config_path).with_context(|| {
        format!(
            "Failed to load backup configuration from {}",
            config_path.display()
        )
    })?;

    println!("🚀 Starting Backup Process...");
    backup::run_backup_flow(&config)
        .await
        .context("Backup process failed")
}
