use crate::config::DatabaseConfig;
use std::path::PathBuf;

/// Returns the default path of the Oikonomos database
///
/// # Platform-specific paths
///
/// - **macOS**: `~/Library/Application Support/oikonomos/oikonomos.db`
/// - **Linux**: `~/.local/share/oikonomos/oikonomos.db`
/// - **Windows**: `%LOCALAPPDATA%\oikonomos\oikonomos.db`
pub fn get_db_path() -> anyhow::Result<PathBuf> {
    let data_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    let db_path = data_dir.join("oikonomos").join("oikonomos.db");

    Ok(db_path)
}

/// Open the database named by the config (or the default path) and run migrations
pub fn initialize_database(
    config: &DatabaseConfig,
) -> anyhow::Result<std::sync::Arc<crate::database::Database>> {
    let db_path = match &config.path {
        Some(path) => path.clone(),
        None => get_db_path()?,
    };

    let db = crate::database::Database::new(&db_path)?;
    tracing::info!("Database initialized at: {}", db_path.display());
    Ok(std::sync::Arc::new(db))
}
