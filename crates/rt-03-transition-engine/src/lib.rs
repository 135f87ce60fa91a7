//! # RT-03: Stage Transition Engine
//!
//! The sole authority for moving a batch between stages. Encodes the
//! supply-chain state machine: which role may trigger which transition from
//! which stage, certificate gating before distribution, and the fraud flag
//! overlay.
//!
//! ## Architecture
//!
//! - **Domain**: transition table, error taxonomy, fraud alert ledger,
//!   log invariants
//! - **Ports**: inbound (`TraceabilityApi`) and outbound (`NotificationSink`,
//!   `TimeSource`)
//! - **Adapters**: event-bus notification sink, system clock
//! - **Application**: `TraceabilityService` orchestration with per-batch
//!   writer serialization

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use adapters::bus::BusNotificationSink;
pub use adapters::time::SystemTimeSource;
pub use application::service::TraceabilityService;
pub use config::EngineConfig;
pub use domain::errors::EngineError;
pub use domain::transitions::{required_role, successor};
pub use ports::inbound::{CertificateRequest, NewBatchRequest, TraceabilityApi, TransitionRequest};
pub use ports::outbound::{NotificationSink, TimeSource};
