//! Inbound Ports (Driving Ports / API)
//!
//! The portal layer talks to the engine exclusively through this trait.
//! Scanned QR snapshots are advisory: every operation here re-reads
//! authoritative state from the record store by batch id before acting.

use crate::domain::errors::EngineError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared_types::{
    Batch, FraudAlert, FraudSeverity, FraudStatus, GeoLocation, Role, TransactionEvent,
    TransitionType,
};

/// Fields a farmer supplies when uploading a new batch.
#[derive(Debug, Clone)]
pub struct NewBatchRequest {
    /// Explicit id, or `None` to have one generated.
    pub batch_id: Option<String>,
    pub herb_name: String,
    pub quantity_kg: f64,
    pub farmer_contact: String,
    pub origin_location: GeoLocation,
    pub photos: Vec<String>,
}

/// One requested stage transition.
#[derive(Debug, Clone)]
pub struct TransitionRequest {
    pub batch_id: String,
    pub actor_id: String,
    pub actor_role: Role,
    pub transition: TransitionType,
    pub location: Option<GeoLocation>,
    pub notes: Option<String>,
}

impl TransitionRequest {
    pub fn new(
        batch_id: impl Into<String>,
        actor_id: impl Into<String>,
        actor_role: Role,
        transition: TransitionType,
    ) -> Self {
        Self {
            batch_id: batch_id.into(),
            actor_id: actor_id.into(),
            actor_role,
            transition,
            location: None,
            notes: None,
        }
    }

    pub fn with_location(mut self, location: GeoLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// A quality certificate to attach (re-issue replaces, never patches).
#[derive(Debug, Clone)]
pub struct CertificateRequest {
    pub certificate_id: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Primary Traceability API
#[async_trait]
pub trait TraceabilityApi: Send + Sync {
    /// Register a new batch (farmer only).
    ///
    /// The created batch starts at `uploaded` with an empty transaction log
    /// and the farmer as holder.
    async fn register_batch(
        &self,
        farmer_id: &str,
        actor_role: Role,
        request: NewBatchRequest,
    ) -> Result<Batch, EngineError>;

    /// Validate and apply one role-gated stage transition.
    ///
    /// On success the transaction event is appended and the batch's stage
    /// and holder are updated atomically; the returned event is exactly the
    /// appended one.
    async fn request_transition(
        &self,
        request: TransitionRequest,
    ) -> Result<TransactionEvent, EngineError>;

    /// Attach (or re-issue) a quality certificate (processor only).
    async fn attach_certificate(
        &self,
        batch_id: &str,
        actor_id: &str,
        actor_role: Role,
        request: CertificateRequest,
    ) -> Result<Batch, EngineError>;

    /// Raise a fraud alert against a batch (any actor).
    async fn raise_fraud_alert(
        &self,
        batch_id: &str,
        raised_by: &str,
        severity: FraudSeverity,
        description: String,
    ) -> Result<FraudAlert, EngineError>;

    /// Advance a fraud alert through its lifecycle (admin only).
    async fn update_fraud_alert(
        &self,
        alert_id: &str,
        actor_id: &str,
        actor_role: Role,
        status: FraudStatus,
    ) -> Result<FraudAlert, EngineError>;
}
