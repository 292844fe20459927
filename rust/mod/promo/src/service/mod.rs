pub mod interaction;
pub mod leaderboard;
pub mod promotion;
pub mod user;

use std::sync::Arc;

use promo_core::{Clock, ServiceError};
use tracing::{error, warn};

use crate::config::EngineConfig;
use crate::engine::{LedgerScan, ScoreWindow};
use crate::repository::PromoRepository;

/// The promo service. Holds the repository, the score window, the validated
/// engine configuration and the time source.
pub struct PromoService {
    pub(crate) repo: Arc<dyn PromoRepository>,
    pub(crate) window: Arc<dyn ScoreWindow>,
    pub(crate) config: EngineConfig,
    pub(crate) clock: Arc<dyn Clock>,
}

impl PromoService {
    /// Create a service that sums score windows by scanning the ledger.
    pub fn new(
        repo: Arc<dyn PromoRepository>,
        config: EngineConfig,
        clock: Arc<dyn Clock>,
    ) -> Arc<Self> {
        let window: Arc<dyn ScoreWindow> = Arc::new(LedgerScan::new(Arc::clone(&repo)));
        Self::with_window(repo, window, config, clock)
    }

    pub fn with_window(
        repo: Arc<dyn PromoRepository>,
        window: Arc<dyn ScoreWindow>,
        config: EngineConfig,
        clock: Arc<dyn Clock>,
    ) -> Arc<Self> {
        Arc::new(Self {
            repo,
            window,
            config,
            clock,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

/// Log a failed operation once, at the service boundary.
pub(crate) fn log_failure(op: &str, err: &ServiceError) {
    if err.is_client_error() {
        warn!(op, code = err.error_code(), "{}", err);
    } else {
        error!(op, code = err.error_code(), "{}", err);
    }
}

/// Reject an empty or whitespace-only field.
pub(crate) fn require(value: &str, field: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::Validation(format!("{field} is empty")));
    }
    Ok(())
}

/// Trimmed value, or `None` if blank.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
