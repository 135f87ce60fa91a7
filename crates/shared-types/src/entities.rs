//! # Core Domain Entities
//!
//! Defines the entities tracked end-to-end by the traceability core.
//!
//! ## Clusters
//!
//! - **Batch**: `Batch`, `GeoLocation`, `QualityCertificate`
//! - **History**: `TransactionEvent`, `PaymentStatus`
//! - **Audit**: `FraudAlert`, `FraudSeverity`, `FraudStatus`

use crate::stage::{Stage, TransitionType};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Globally unique batch identifier (e.g. `HB-TUR001`).
///
/// Uniqueness is the only hard invariant; the `{PREFIX}-{HERB3}{SEQ}` format
/// is a display convention.
pub type BatchId = String;

/// Identity of an actor as vended by the identity provider.
pub type ActorId = String;

// =============================================================================
// CLUSTER A: BATCH
// =============================================================================

/// A geocoordinate with optional accuracy and reverse-geocoded address.
///
/// Captured by the geolocation collaborator at batch creation and,
/// optionally, at each custody transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub lat: f64,
    pub lng: f64,
    /// GPS accuracy in meters, when the capturing device reported one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy_m: Option<f64>,
    /// Reverse-geocoded address from the geocoding collaborator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl GeoLocation {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            accuracy_m: None,
            address: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Human-readable form: the address when known, else `"lat, lng"`.
    pub fn display_name(&self) -> String {
        match &self.address {
            Some(addr) => addr.clone(),
            None => format!("{:.5}, {:.5}", self.lat, self.lng),
        }
    }
}

/// Derived validity of a quality certificate at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CertificateStatus {
    /// Not within the expiry warning window.
    Active,
    /// Still valid, but expires within the configured warning window.
    Expiring,
    /// Past expiry.
    Expired,
}

/// Processor-issued quality attestation with an expiry.
///
/// Replaceable only by re-issuing a new certificate, never by editing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityCertificate {
    pub certificate_id: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl QualityCertificate {
    /// Whether the certificate has not yet expired.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// Status derived from expiry: active until expiry, `Expiring` within
    /// `expiring_window` before it, `Expired` after.
    pub fn status(&self, now: DateTime<Utc>, expiring_window: Duration) -> CertificateStatus {
        if now >= self.expires_at {
            CertificateStatus::Expired
        } else if now + expiring_window >= self.expires_at {
            CertificateStatus::Expiring
        } else {
            CertificateStatus::Active
        }
    }
}

/// One farmer-originated lot of a single herb, tracked end-to-end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    /// Globally unique, immutable once created.
    pub batch_id: BatchId,
    /// From a controlled vocabulary (open set).
    pub herb_name: String,
    /// Strictly positive; never altered by any transition.
    pub quantity_kg: f64,
    /// Owning producer identity at creation; immutable.
    pub farmer_id: ActorId,
    /// Farmer contact embedded in the consumer-facing QR payload.
    pub farmer_contact: String,
    /// Actor currently accountable for the batch.
    pub current_holder_id: ActorId,
    /// Position in the canonical pipeline.
    pub current_stage: Stage,
    /// Fraud overlay: the underlying stage is preserved while flagged and
    /// resumed once an admin resolves the flag.
    pub flagged: bool,
    /// Captured at creation; immutable.
    pub origin_location: GeoLocation,
    /// Ordered opaque photo references from the capture flow.
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_certificate: Option<QualityCertificate>,
    /// Timestamp of first upload; immutable.
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Monotonic counter bumped by every accepted mutation; the
    /// compare-and-swap field for concurrent writers.
    pub version: u64,
}

// =============================================================================
// CLUSTER B: HISTORY
// =============================================================================

/// Settlement marker for the financial leg of a custody transfer.
///
/// Settlement itself is the payment collaborator's responsibility; the core
/// only carries the marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

/// Append-only log entry recording one accepted state change.
///
/// The log is immutable: corrections are modeled as new compensating events,
/// never edits. Events for a given batch are totally ordered by timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionEvent {
    pub event_id: String,
    pub batch_id: BatchId,
    pub from_holder_id: ActorId,
    pub to_holder_id: ActorId,
    pub transition: TransitionType,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub payment_status: PaymentStatus,
}

// =============================================================================
// CLUSTER C: AUDIT
// =============================================================================

/// Severity of a fraud alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FraudSeverity {
    Low,
    Medium,
    High,
    Critical,
}

/// Lifecycle state of a fraud alert.
///
/// Forward-only: `Pending → Investigating → {Resolved | FalseAlarm}`, with
/// direct resolution from `Pending` allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FraudStatus {
    Pending,
    Investigating,
    Resolved,
    FalseAlarm,
}

impl FraudStatus {
    /// Whether the lifecycle permits moving from `self` to `next`.
    pub fn can_become(&self, next: FraudStatus) -> bool {
        use FraudStatus::*;
        matches!(
            (self, next),
            (Pending, Investigating)
                | (Pending, Resolved)
                | (Pending, FalseAlarm)
                | (Investigating, Resolved)
                | (Investigating, FalseAlarm)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, FraudStatus::Resolved | FraudStatus::FalseAlarm)
    }
}

impl fmt::Display for FraudStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FraudStatus::Pending => "pending",
            FraudStatus::Investigating => "investigating",
            FraudStatus::Resolved => "resolved",
            FraudStatus::FalseAlarm => "false_alarm",
        };
        f.write_str(s)
    }
}

/// Audit-trail entity raised against a batch by any actor or automated check.
///
/// Orthogonal to the transaction log and to the batch's flag overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudAlert {
    pub alert_id: String,
    pub batch_id: BatchId,
    pub raised_by: ActorId,
    pub description: String,
    pub severity: FraudSeverity,
    pub status: FraudStatus,
    pub raised_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
