mod logic;
pub(crate) mod archive; // Zip archive creation
pub(crate) mod db_dump; // pg_dump invocation with env-injected credentials

use crate::config::BackupConfig;
use anyhow::Result;

/// Public entry point for the backup process.
/// Wires the real pg_dump executor into the orchestration loop.
pub async fn run_backup_flow(config: &BackupConfig) -> Result<()> {
    let dumper = db_dump::PgDump::new(config)?;
    logic::perform_backup_orchestration(config, &dumper).await
}
