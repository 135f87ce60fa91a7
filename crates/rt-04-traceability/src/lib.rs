//! # RT-04: Traceability Projector
//!
//! Read-only derivation of the consumer-facing journey from a batch and its
//! transaction log. Pure and idempotent: re-running with the same log
//! always yields the same projection, and nothing here mutates state.

pub mod domain;
pub mod projector;

pub use domain::journey::{Journey, MacroStage, StageStatus, TraceStage};
pub use projector::project;
