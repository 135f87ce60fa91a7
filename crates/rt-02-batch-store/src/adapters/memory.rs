//! In-memory batch store for single-node operation and tests.

use crate::domain::errors::StoreError;
use crate::ports::{BatchMutation, BatchRepository, NewBatch};
use shared_types::{Batch, Stage, TransactionEvent};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

/// One stored record: the current batch state plus its append-only log.
#[derive(Debug, Clone)]
struct StoredBatch {
    batch: Batch,
    log: Vec<TransactionEvent>,
}

/// In-memory implementation of [`BatchRepository`].
///
/// The whole record is swapped under a single write lock, so concurrent
/// readers observe either the pre- or post-mutation record, never a torn
/// one. Different batches share the map lock but mutations are short and
/// never block on I/O.
#[derive(Default)]
pub struct InMemoryBatchStore {
    records: RwLock<HashMap<String, StoredBatch>>,
}

impl InMemoryBatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a batch id is already taken (for id generation).
    pub fn contains(&self, batch_id: &str) -> bool {
        self.records
            .read()
            .map(|records| records.contains_key(batch_id))
            .unwrap_or(false)
    }
}

impl BatchRepository for InMemoryBatchStore {
    fn create(&self, new: NewBatch) -> Result<Batch, StoreError> {
        if !new.quantity_kg.is_finite() || new.quantity_kg <= 0.0 {
            return Err(StoreError::InvalidQuantity {
                quantity_kg: new.quantity_kg,
            });
        }

        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        if records.contains_key(&new.batch_id) {
            return Err(StoreError::DuplicateBatchId {
                batch_id: new.batch_id,
            });
        }

        let batch = Batch {
            batch_id: new.batch_id.clone(),
            herb_name: new.herb_name,
            quantity_kg: new.quantity_kg,
            farmer_id: new.farmer_id.clone(),
            farmer_contact: new.farmer_contact,
            current_holder_id: new.farmer_id,
            current_stage: Stage::Uploaded,
            flagged: false,
            origin_location: new.origin_location,
            photos: new.photos,
            quality_certificate: None,
            created_at: new.created_at,
            updated_at: new.created_at,
            version: 0,
        };

        debug!(batch_id = %batch.batch_id, "Batch record created");

        records.insert(
            new.batch_id,
            StoredBatch {
                batch: batch.clone(),
                log: Vec::new(),
            },
        );
        Ok(batch)
    }

    fn get(&self, batch_id: &str) -> Result<Batch, StoreError> {
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());
        records
            .get(batch_id)
            .map(|record| record.batch.clone())
            .ok_or_else(|| StoreError::NotFound {
                batch_id: batch_id.to_string(),
            })
    }

    fn events(&self, batch_id: &str) -> Result<Vec<TransactionEvent>, StoreError> {
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());
        records
            .get(batch_id)
            .map(|record| record.log.clone())
            .ok_or_else(|| StoreError::NotFound {
                batch_id: batch_id.to_string(),
            })
    }

    fn apply_event(
        &self,
        event: TransactionEvent,
        mutation: BatchMutation,
    ) -> Result<Batch, StoreError> {
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        let record = records
            .get_mut(&event.batch_id)
            .ok_or_else(|| StoreError::NotFound {
                batch_id: event.batch_id.clone(),
            })?;

        if record.batch.version != mutation.expected_version {
            return Err(StoreError::VersionConflict {
                batch_id: event.batch_id.clone(),
                expected: mutation.expected_version,
                actual: record.batch.version,
            });
        }

        if let Some(last) = record.log.last() {
            if event.timestamp < last.timestamp {
                return Err(StoreError::OutOfOrderEvent {
                    batch_id: event.batch_id.clone(),
                });
            }
        }

        // Build the successor record before touching the stored one, then
        // swap wholesale: both the event append and the field updates become
        // visible together.
        let mut next = record.batch.clone();
        if let Some(stage) = mutation.stage {
            next.current_stage = stage;
        }
        if let Some(holder) = mutation.holder {
            next.current_holder_id = holder;
        }
        if let Some(certificate) = mutation.certificate {
            next.quality_certificate = Some(certificate);
        }
        if let Some(flagged) = mutation.flagged {
            next.flagged = flagged;
        }
        next.updated_at = event.timestamp;
        next.version += 1;

        debug!(
            batch_id = %event.batch_id,
            transition = %event.transition,
            version = next.version,
            "Applied event"
        );

        record.log.push(event);
        record.batch = next.clone();
        Ok(next)
    }

    fn list(&self) -> Vec<Batch> {
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());
        records.values().map(|record| record.batch.clone()).collect()
    }
}
