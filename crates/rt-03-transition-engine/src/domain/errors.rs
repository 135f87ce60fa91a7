//! Error types for the stage transition engine.

use rt_02_batch_store::StoreError;
use shared_types::{FraudStatus, Role, Stage, TransitionType};
use thiserror::Error;

/// All errors that can occur while driving the state machine.
///
/// Every variant is recoverable at the caller; the engine never panics on
/// bad input and no transition is partially applied on error.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EngineError {
    /// Batch not found in the record store.
    #[error("Batch not found: {batch_id}")]
    NotFound { batch_id: String },

    /// Actor role is not authorized for this operation.
    #[error("Role {role} is not permitted to {action}")]
    Forbidden { role: Role, action: String },

    /// The requested transition is not a legal successor of the current
    /// stage, or the request raced with one that already advanced it.
    #[error("Invalid transition `{transition}` from stage `{from}`")]
    InvalidTransition {
        from: Stage,
        transition: TransitionType,
    },

    /// Completing processing requires an active quality certificate.
    #[error("Active quality certificate required to complete batch {batch_id}")]
    CertificateRequired { batch_id: String },

    /// Certificate expiry must lie after issue, and after now at attach time.
    #[error("Invalid certificate {certificate_id}: {reason}")]
    InvalidCertificate {
        certificate_id: String,
        reason: String,
    },

    /// Event notes exceed the configured limit.
    #[error("Notes exceed {max} characters (got {len})")]
    NotesTooLong { len: usize, max: usize },

    /// Fraud alert not found in the ledger.
    #[error("Fraud alert not found: {alert_id}")]
    AlertNotFound { alert_id: String },

    /// Fraud alert lifecycle is forward-only.
    #[error("Fraud alert cannot move from {from} to {to}")]
    InvalidAlertStatus { from: FraudStatus, to: FraudStatus },

    /// Storage-level failure surfaced unchanged.
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { batch_id } => EngineError::NotFound { batch_id },
            other => EngineError::Store(other),
        }
    }
}
