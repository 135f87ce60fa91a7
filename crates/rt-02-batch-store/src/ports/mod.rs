//! Storage port for batch records.
//!
//! The transition engine drives this port; adapters implement it. The
//! in-memory adapter ships with this crate, a relational adapter would
//! implement the same trait.

use crate::domain::errors::StoreError;
use chrono::{DateTime, Utc};
use shared_types::{Batch, GeoLocation, QualityCertificate, Stage, TransactionEvent};

/// Fields for batch creation. Everything else on [`Batch`] is derived.
#[derive(Debug, Clone)]
pub struct NewBatch {
    pub batch_id: String,
    pub herb_name: String,
    pub quantity_kg: f64,
    pub farmer_id: String,
    pub farmer_contact: String,
    pub origin_location: GeoLocation,
    pub photos: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// The record change accompanying an appended event.
///
/// `expected_version` makes the application a compare-and-swap: it must
/// match the stored record's version or the application is rejected.
#[derive(Debug, Clone, Default)]
pub struct BatchMutation {
    pub expected_version: u64,
    pub stage: Option<Stage>,
    pub holder: Option<String>,
    pub certificate: Option<QualityCertificate>,
    pub flagged: Option<bool>,
}

impl BatchMutation {
    pub fn at_version(expected_version: u64) -> Self {
        Self {
            expected_version,
            ..Self::default()
        }
    }

    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.stage = Some(stage);
        self
    }

    pub fn with_holder(mut self, holder: impl Into<String>) -> Self {
        self.holder = Some(holder.into());
        self
    }

    pub fn with_certificate(mut self, certificate: QualityCertificate) -> Self {
        self.certificate = Some(certificate);
        self
    }

    pub fn with_flagged(mut self, flagged: bool) -> Self {
        self.flagged = Some(flagged);
        self
    }
}

/// Authoritative keyed storage for batch entities.
///
/// Reads may run concurrently with writes and observe either the pre- or
/// post-mutation record, never a partially updated one.
pub trait BatchRepository: Send + Sync {
    /// Create a new batch record with an empty transaction log.
    ///
    /// Fails with [`StoreError::DuplicateBatchId`] when the id is taken and
    /// [`StoreError::InvalidQuantity`] when `quantity_kg <= 0`.
    fn create(&self, new: NewBatch) -> Result<Batch, StoreError>;

    /// Fetch the current record.
    fn get(&self, batch_id: &str) -> Result<Batch, StoreError>;

    /// Fetch the batch's transaction log, ordered by timestamp.
    fn events(&self, batch_id: &str) -> Result<Vec<TransactionEvent>, StoreError>;

    /// Append an event and apply its record mutation atomically.
    ///
    /// Reserved for the stage transition engine. A successful application is
    /// immediately visible to `get` (read-your-writes). Fails with
    /// [`StoreError::VersionConflict`] when `mutation.expected_version` does
    /// not match the stored record, and with [`StoreError::OutOfOrderEvent`]
    /// when the event timestamp precedes the last appended event.
    fn apply_event(
        &self,
        event: TransactionEvent,
        mutation: BatchMutation,
    ) -> Result<Batch, StoreError>;

    /// Snapshot of all batches, for dashboard listings.
    fn list(&self) -> Vec<Batch>;
}
