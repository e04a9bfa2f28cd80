// backuptool/src/backup/logic.rs
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::backup::archive::{archive_file_name, create_zip_archive};
use crate::backup::db_dump::{DUMP_FILE_NAME, DumpExecutor};
use crate::config::BackupConfig;
use crate::utils::databases::databases_to_execute;

/// The administrative database; never backed up, even when enumeration
/// returns it.
const ADMIN_DATABASE: &str = "postgres";

/// Drives a full backup run: resolve the target list once, then run one
/// sequential dump-and-archive pipeline per database.
pub async fn perform_backup_orchestration(
    config: &BackupConfig,
    dumper: &impl DumpExecutor,
) -> Result<()> {
    fs::create_dir_all(&config.backup_path).with_context(|| {
        format!(
            "Failed to create backup destination directory: {}",
            config.backup_path.display()
        )
    })?;

    let databases = databases_to_execute(config).await?;
    if databases.is_empty() {
        anyhow::bail!("No databases found or specified to back up.");
    }
    println!("Databases to be backed up: {:?}", databases);

    backup_databases(config, dumper, &databases)
}

/// Processes targets strictly in enumeration order. By default the first
/// failure aborts the run, leaving later databases unattempted; with
/// continue_on_error set, failures are collected and reported together at
/// the end.
fn backup_databases(
    config: &BackupConfig,
    dumper: &impl DumpExecutor,
    databases: &[String],
) -> Result<()> {
    let mut failures: Vec<(String, anyhow::Error)> = Vec::new();

    for database in databases {
        if database == ADMIN_DATABASE {
            println!("Skipping administrative database: {}", database);
            continue;
        }
        match backup_one_database(config, dumper, database) {
            Ok(()) => {
                println!("✓ Successfully backed up database: {}", database);
            }
            Err(e) if config.continue_on_error => {
                eprintln!("❌ Backup failed for {}: {:?}", database, e);
                failures.push((database.clone(), e));
            }
            Err(e) => return Err(e),
        }
    }

    if !failures.is_empty() {
        let summary = failures
            .iter()
            .map(|(db, e)| format!("  {}: {}", db, e))
            .collect::<Vec<_>>()
            .join("\n");
        anyhow::bail!(
            "Backup failed for {} database(s):\n{}",
            failures.len(),
            summary
        );
    }
    Ok(())
}

/// One per-database pipeline inside a scoped temporary directory. The
/// directory is removed on every exit path: explicitly on return here, and
/// by TempDir's Drop if anything panics in between.
fn backup_one_database(
    config: &BackupConfig,
    dumper: &impl DumpExecutor,
    database: &str,
) -> Result<()> {
    println!("🔍 Backing up database: {}", database);
    let dump_dir = TempDir::new().context("Failed to create temporary dump directory")?;

    let result = dump_and_archive(config, dumper, database, dump_dir.path());

    if let Err(e) = dump_dir.close() {
        eprintln!("⚠ Failed to remove temporary dump directory: {}", e);
    }
    result
}

fn dump_and_archive(
    config: &BackupConfig,
    dumper: &impl DumpExecutor,
    database: &str,
    dump_dir: &Path,
) -> Result<()> {
    let dump_path = dump_dir.join(DUMP_FILE_NAME);
    dumper.dump(database, &dump_path)?;

    let archive_path = config.backup_path.join(archive_file_name(database, false));
    create_zip_archive(dump_dir, &archive_path)
        .with_context(|| format!("Failed to archive dump for database: {}", database))?;

    let filestore_dir = config.filestore_root.join(database);
    if !filestore_dir.exists() {
        println!(
            "No file store at {}, skipping file-store archive for {}",
            filestore_dir.display(),
            database
        );
        return Ok(());
    }

    let filestore_archive_path = config.backup_path.join(archive_file_name(database, true));
    create_zip_archive(&filestore_dir, &filestore_archive_path)
        .with_context(|| format!("Failed to archive file store for database: {}", database))?;
    Ok(())
}
