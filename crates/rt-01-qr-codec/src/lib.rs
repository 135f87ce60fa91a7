//! # RT-01: QR Payload Codec
//!
//! Converts between a batch's public snapshot and the compact payload
//! embedded in a scannable QR label.
//!
//! ## Architecture
//!
//! - **Domain**: `BatchSnapshot` and the decode error taxonomy
//! - **Codec**: pure `encode`/`decode` over canonical JSON bytes
//! - **Config**: visual rendering parameters for the (external) image renderer
//!
//! ## Contract
//!
//! The embedded snapshot is advisory: a cached view at QR-generation time.
//! Any state-changing operation must re-fetch authoritative state from the
//! batch record store by batch id before acting. Decoding never touches the
//! store.

pub mod codec;
pub mod config;
pub mod domain;

pub use codec::{decode, display_json, encode};
pub use config::{EcLevel, QrRenderConfig};
pub use domain::errors::DecodeError;
pub use domain::snapshot::BatchSnapshot;
