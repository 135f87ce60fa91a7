//! Outbound Ports (Driven Ports / SPI)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared_bus::TraceabilityEvent;

/// Sink for domain events emitted on every successful mutation.
///
/// Delivery (push, poll, email) is entirely the collaborator's concern;
/// the engine fires and forgets.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, event: TraceabilityEvent);
}

/// Clock abstraction so tests can inject deterministic time.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
