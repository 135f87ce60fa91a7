//! Configuration for the Stage Transition Engine

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Engine configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Days before expiry at which a certificate reports `Expiring`.
    pub certificate_expiring_window_days: u32,
    /// Maximum length of free-form event notes.
    pub max_notes_len: usize,
    /// Prefix for generated batch ids.
    pub batch_id_prefix: String,
}

impl EngineConfig {
    /// The expiry warning window as a duration.
    pub fn expiring_window(&self) -> Duration {
        Duration::days(i64::from(self.certificate_expiring_window_days))
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            certificate_expiring_window_days: 3,
            max_notes_len: 512,
            batch_id_prefix: "HB".to_string(),
        }
    }
}
