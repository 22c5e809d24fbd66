use crate::storage::schema;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ParcelConfig {
    pub database: Option<String>,
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("parcelstore.toml")
}

pub fn default_database_path() -> PathBuf {
    PathBuf::from("parcels.db")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<ParcelConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: ParcelConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &ParcelConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

/// Pick the database path: explicit flag, then config, then default
pub fn resolve_database_path(flag: Option<PathBuf>, config: Option<&ParcelConfig>) -> PathBuf {
    flag.or_else(|| config.and_then(|c| c.database.as_ref()).map(PathBuf::from))
        .unwrap_or_else(default_database_path)
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Create the database file if needed and the parcel table in it
pub fn create_database(db_path: &Path) -> anyhow::Result<Connection> {
    ensure_db_dir(db_path)?;
    let conn = Connection::open(db_path)?;
    schema::initialize_schema(&conn)?;
    Ok(conn)
}

/// Open a database previously set up by [`create_database`]
pub fn open_database(db_path: &Path) -> anyhow::Result<Connection> {
    if !db_path.exists() {
        anyhow::bail!("database {} does not exist (run `parcelstore init` first)", db_path.display());
    }

    let conn = Connection::open(db_path)?;
    if !schema::has_parcel_table(&conn)? {
        anyhow::bail!("database {} has no parcel table (run `parcelstore init` first)", db_path.display());
    }
    Ok(conn)
}
