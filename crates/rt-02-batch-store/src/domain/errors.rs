//! Error types for the batch record store.

use thiserror::Error;

/// All errors that can occur in the batch record store.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    /// Batch not found in storage.
    #[error("Batch not found: {batch_id}")]
    NotFound { batch_id: String },

    /// A batch with this id already exists.
    #[error("Duplicate batch id: {batch_id}")]
    DuplicateBatchId { batch_id: String },

    /// Batch quantity must be strictly positive.
    #[error("Invalid quantity: {quantity_kg} kg")]
    InvalidQuantity { quantity_kg: f64 },

    /// Writer raced on stale state (version field mismatch).
    #[error("Version conflict on {batch_id}: expected {expected}, found {actual}")]
    VersionConflict {
        batch_id: String,
        expected: u64,
        actual: u64,
    },

    /// Appending this event would break the per-batch timestamp order.
    #[error("Out-of-order event for {batch_id}")]
    OutOfOrderEvent { batch_id: String },
}
