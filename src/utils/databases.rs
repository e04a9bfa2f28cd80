// backuptool/src/utils/databases.rs
use anyhow::{Context, Result};
use sqlx::{Connection, PgConnection, Row};

use crate::config::BackupConfig;

/// Resolves the list of databases to back up.
///
/// With an explicit database configured, that single name is returned and no
/// server connection is opened. Otherwise the administrative catalog is
/// queried for all non-template databases, in server order.
pub async fn databases_to_execute(config: &BackupConfig) -> Result<Vec<String>> {
    if let Some(database) = &config.database {
        return Ok(vec![database.clone()]);
    }

    let admin_url = config.admin_url()?;
    let mut conn = PgConnection::connect(&admin_url).await.with_context(|| {
        format!(
            "Failed to connect to 'postgres' database on {}:{} for listing databases",
            config.host, config.port
        )
    })?;

    let rows = sqlx::query("SELECT datname FROM pg_database WHERE datistemplate = false")
        .fetch_all(&mut conn)
        .await
        .context("Failed to fetch database list from pg_database")?;

    let db_names: Vec<String> = rows
        .iter()
        .map(|row| row.try_get("datname"))
        .collect::<Result<_, _>>()
        .context("Failed to get 'datname' from row when fetching database list")?;

    println!("Found databases: {:?}", db_names);
    Ok(db_names)
}
