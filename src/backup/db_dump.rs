// backuptool/src/backup/db_dump.rs
use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use which::which;

use crate::config::BackupConfig;

pub const DUMP_FILE_NAME: &str = "dump.sql";

// Helper function to find the pg_dump executable
fn find_pg_dump_executable() -> Result<PathBuf> {
    which("pg_dump").context(
        "pg_dump executable not found in PATH. Please ensure PostgreSQL client tools are installed and in your PATH.",
    )
}

/// A fully specified external command: program, arguments and the
/// environment overrides applied on top of the inherited environment.
/// Credentials travel here, never on the argument list, so they stay out
/// of process listings.
#[derive(Debug)]
pub struct PgCommand {
    program: PathBuf,
    args: Vec<OsString>,
    env: Vec<(&'static str, String)>,
}

impl PgCommand {
    pub fn new(program: PathBuf, config: &BackupConfig) -> Self {
        PgCommand {
            program,
            args: Vec::new(),
            env: vec![
                ("PGHOST", config.host.clone()),
                ("PGPORT", config.port.to_string()),
                ("PGUSER", config.username.clone()),
                ("PGPASSWORD", config.password.clone()),
            ],
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    fn name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.display().to_string())
    }

    /// Runs the command to completion, capturing stdout and stderr.
    /// A non-zero exit status is a hard failure carrying the command name
    /// and the captured stderr; there is no retry.
    pub fn run(self) -> Result<String> {
        let name = self.name();
        let output = Command::new(&self.program)
            .args(&self.args)
            .envs(self.env.iter().map(|(k, v)| (k, v.as_str())))
            .output()
            .with_context(|| format!("Failed to execute command: {}", name))?;

        if !output.status.success() {
            return Err(anyhow::anyhow!(
                "Command `{}` failed with status {}: {}",
                name,
                output.status,
                String::from_utf8_lossy(&output.stderr)
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Produces a SQL dump of one database at a caller-supplied path.
/// Abstracted as a trait so the orchestration loop can be exercised
/// without a running server.
pub trait DumpExecutor {
    fn dump(&self, database: &str, dump_path: &Path) -> Result<()>;
}

/// The real executor, shelling out to pg_dump.
pub struct PgDump {
    pg_dump_path: PathBuf,
    config: BackupConfig,
}

impl PgDump {
    pub fn new(config: &BackupConfig) -> Result<Self> {
        let pg_dump_path = find_pg_dump_executable()?;
        println!("Found pg_dump executable at: {}", pg_dump_path.display());
        Ok(PgDump {
            pg_dump_path,
            config: config.clone(),
        })
    }
}

impl DumpExecutor for PgDump {
    fn dump(&self, database: &str, dump_path: &Path) -> Result<()> {
        // --no-owner keeps the dump restorable under a different role.
        let mut file_flag = OsString::from("--file=");
        file_flag.push(dump_path);

        PgCommand::new(self.pg_dump_path.clone(), &self.config)
            .arg("--no-owner")
            .arg(file_flag)
            .arg(database)
            .run()
            .with_context(|| format!("pg_dump failed for database: {}", database))?;
        Ok(())
    }
}
