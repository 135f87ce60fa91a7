//! The public batch view carried by a QR label.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{Batch, Stage};

/// Read-only snapshot of a batch at QR-generation time.
///
/// Field names follow the wire format of the payload: camelCase keys,
/// `quantity` in kilograms, `timestamp` in RFC 3339, `stage` in canonical
/// string form. The snapshot is a cached view; authoritative state lives in
/// the batch record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSnapshot {
    pub batch_id: String,
    pub farmer_id: String,
    pub farmer_phone: String,
    pub herb_name: String,
    #[serde(rename = "quantity")]
    pub quantity_kg: f64,
    pub timestamp: DateTime<Utc>,
    pub stage: Stage,
    /// Free-form display location (address or region name).
    pub location: String,
}

impl BatchSnapshot {
    /// Snapshot the public view of a batch for label generation.
    pub fn from_batch(batch: &Batch) -> Self {
        Self {
            batch_id: batch.batch_id.clone(),
            farmer_id: batch.farmer_id.clone(),
            farmer_phone: batch.farmer_contact.clone(),
            herb_name: batch.herb_name.clone(),
            quantity_kg: batch.quantity_kg,
            timestamp: batch.updated_at,
            stage: batch.current_stage,
            location: batch.origin_location.display_name(),
        }
    }
}
