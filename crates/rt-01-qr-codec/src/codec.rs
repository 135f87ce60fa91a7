//! Pure payload encode/decode.
//!
//! The wire format is canonical JSON: object keys in sorted order, no
//! insignificant whitespace. serde_json's default `Map` is BTreeMap-backed,
//! so key ordering falls out of rendering a `Value`; decoding accepts any
//! whitespace. Same input bytes always decode to the same snapshot.

use crate::domain::errors::DecodeError;
use crate::domain::snapshot::BatchSnapshot;
use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};
use shared_types::Stage;

/// Serialize a snapshot into canonical payload bytes.
///
/// Output round-trips exactly through [`decode`].
pub fn encode(snapshot: &BatchSnapshot) -> Vec<u8> {
    canonical_value(snapshot).to_string().into_bytes()
}

/// Parse payload bytes back into a snapshot.
///
/// Fails with [`DecodeError::MalformedPayload`] when the structure cannot be
/// parsed, and with [`DecodeError::SchemaMismatch`] when a required field is
/// missing or of the wrong type. Never touches the batch record store.
pub fn decode(payload: &[u8]) -> Result<BatchSnapshot, DecodeError> {
    let value: Value =
        serde_json::from_slice(payload).map_err(|e| DecodeError::MalformedPayload {
            detail: e.to_string(),
        })?;

    let obj = value.as_object().ok_or_else(|| DecodeError::MalformedPayload {
        detail: "payload is not a JSON object".to_string(),
    })?;

    let quantity_kg = obj
        .get("quantity")
        .and_then(Value::as_f64)
        .filter(|q| q.is_finite() && *q >= 0.0)
        .ok_or(DecodeError::SchemaMismatch {
            field: "quantity",
            expected: "non-negative number",
        })?;

    let timestamp = required_str(obj, "timestamp")?;
    let timestamp = DateTime::parse_from_rfc3339(timestamp)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| DecodeError::SchemaMismatch {
            field: "timestamp",
            expected: "RFC 3339 timestamp",
        })?;

    let stage: Stage =
        required_str(obj, "stage")?
            .parse()
            .map_err(|_| DecodeError::SchemaMismatch {
                field: "stage",
                expected: "canonical stage string",
            })?;

    Ok(BatchSnapshot {
        batch_id: required_str(obj, "batchId")?.to_string(),
        farmer_id: required_str(obj, "farmerId")?.to_string(),
        farmer_phone: required_str(obj, "farmerPhone")?.to_string(),
        herb_name: required_str(obj, "herbName")?.to_string(),
        quantity_kg,
        timestamp,
        stage,
        location: required_str(obj, "location")?.to_string(),
    })
}

/// Pretty-printed payload for human display (clipboard copy, debugging).
///
/// Not part of the round-trip contract; [`decode`] accepts it anyway since
/// decoding is whitespace-insensitive.
pub fn display_json(snapshot: &BatchSnapshot) -> String {
    format!("{:#}", canonical_value(snapshot))
}

fn canonical_value(snapshot: &BatchSnapshot) -> Value {
    json!({
        "batchId": snapshot.batch_id,
        "farmerId": snapshot.farmer_id,
        "farmerPhone": snapshot.farmer_phone,
        "herbName": snapshot.herb_name,
        "location": snapshot.location,
        "quantity": snapshot.quantity_kg,
        "stage": snapshot.stage,
        "timestamp": snapshot.timestamp,
    })
}

fn required_str<'a>(
    obj: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a str, DecodeError> {
    obj.get(field)
        .and_then(Value::as_str)
        .ok_or(DecodeError::SchemaMismatch {
            field,
            expected: "string",
        })
}
