//! Error types for QR payload decoding.

use thiserror::Error;

/// All errors that can occur while decoding a scanned payload.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The payload structure cannot be parsed at all.
    #[error("Malformed payload: {detail}")]
    MalformedPayload { detail: String },

    /// The payload parses, but a required field is missing or wrongly typed.
    #[error("Schema mismatch: field `{field}` expected {expected}")]
    SchemaMismatch {
        field: &'static str,
        expected: &'static str,
    },
}
