//! # RT-02: Batch Record Store
//!
//! Authoritative keyed storage for batch entities and their append-only
//! transaction logs.
//!
//! ## Architecture
//!
//! - **Domain**: error taxonomy and batch id generation
//! - **Ports**: `BatchRepository`, the engine-facing storage port
//! - **Adapters**: `InMemoryBatchStore` for single-node operation
//!
//! ## Single-writer discipline
//!
//! `apply_event` is the only mutation entry point after creation and is
//! reserved for the stage transition engine; portal-layer code must never
//! call it directly. A version check on every application rejects writers
//! racing on stale state.

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::memory::InMemoryBatchStore;
pub use domain::errors::StoreError;
pub use domain::ids::BatchIdGenerator;
pub use ports::{BatchMutation, BatchRepository, NewBatch};
