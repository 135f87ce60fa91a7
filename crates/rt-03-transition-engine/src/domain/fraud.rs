//! Fraud alert ledger.
//!
//! Alerts are an audit trail orthogonal to the transaction log and to the
//! batch flag overlay: raising an alert does not freeze the pipeline, only
//! an admin `Flag` transition does.

use crate::domain::errors::EngineError;
use chrono::{DateTime, Utc};
use shared_types::{FraudAlert, FraudStatus};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory registry of fraud alerts keyed by alert id.
#[derive(Default)]
pub struct FraudLedger {
    alerts: RwLock<HashMap<String, FraudAlert>>,
}

impl FraudLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a freshly raised alert.
    pub fn raise(&self, alert: FraudAlert) -> FraudAlert {
        let mut alerts = self.alerts.write().unwrap_or_else(|e| e.into_inner());
        alerts.insert(alert.alert_id.clone(), alert.clone());
        alert
    }

    /// Advance an alert through its forward-only lifecycle.
    pub fn update_status(
        &self,
        alert_id: &str,
        status: FraudStatus,
        now: DateTime<Utc>,
    ) -> Result<FraudAlert, EngineError> {
        let mut alerts = self.alerts.write().unwrap_or_else(|e| e.into_inner());
        let alert = alerts
            .get_mut(alert_id)
            .ok_or_else(|| EngineError::AlertNotFound {
                alert_id: alert_id.to_string(),
            })?;

        if !alert.status.can_become(status) {
            return Err(EngineError::InvalidAlertStatus {
                from: alert.status,
                to: status,
            });
        }

        alert.status = status;
        alert.updated_at = now;
        Ok(alert.clone())
    }

    pub fn get(&self, alert_id: &str) -> Option<FraudAlert> {
        let alerts = self.alerts.read().unwrap_or_else(|e| e.into_inner());
        alerts.get(alert_id).cloned()
    }

    /// All alerts against a batch, oldest first.
    pub fn for_batch(&self, batch_id: &str) -> Vec<FraudAlert> {
        let alerts = self.alerts.read().unwrap_or_else(|e| e.into_inner());
        let mut matching: Vec<FraudAlert> = alerts
            .values()
            .filter(|alert| alert.batch_id == batch_id)
            .cloned()
            .collect();
        matching.sort_by_key(|alert| alert.raised_at);
        matching
    }

    /// Alerts still awaiting resolution, oldest first.
    pub fn open_alerts(&self) -> Vec<FraudAlert> {
        let alerts = self.alerts.read().unwrap_or_else(|e| e.into_inner());
        let mut open: Vec<FraudAlert> = alerts
            .values()
            .filter(|alert| !alert.status.is_terminal())
            .cloned()
            .collect();
        open.sort_by_key(|alert| alert.raised_at);
        open
    }
}
