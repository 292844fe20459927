//! Server configuration file.
//!
//! A context name resolves to `/etc/promo/<name>.toml`. A value containing
//! `/` or ending in `.toml` is taken as a path.

use std::path::{Path, PathBuf};

use promo::PromoSettings;
use promo::config::{LeaderboardSettings, ScoringSettings};
use promo_core::StorageConfig;
use serde::{Deserialize, Serialize};

const CONFIG_DIR: &str = "/etc/promo";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub scoring: ScoringSettings,

    #[serde(default)]
    pub leaderboard: LeaderboardSettings,
}

impl ServerConfig {
    pub fn resolve_path(name_or_path: &str) -> PathBuf {
        if name_or_path.contains('/') || name_or_path.ends_with(".toml") {
            PathBuf::from(name_or_path)
        } else {
            Path::new(CONFIG_DIR).join(format!("{name_or_path}.toml"))
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read {}: {}", path.display(), e))?;
        let config: ServerConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e))?;
        Ok(config)
    }

    /// The engine-facing sections.
    pub fn settings(&self) -> PromoSettings {
        PromoSettings {
            scoring: self.scoring.clone(),
            leaderboard: self.leaderboard,
        }
    }
}
