use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Storage location shared by all services.
///
/// Parsed from the `[storage]` section of the server configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the database and any other local state.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Path to the redb database file.
    /// Defaults to `{data_dir}/promo.redb` if not specified.
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("/var/lib/promo")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            db_path: None,
        }
    }
}

impl StorageConfig {
    /// Resolve the redb database path, falling back to `{data_dir}/promo.redb`.
    pub fn resolve_db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join("promo.redb"))
    }
}
