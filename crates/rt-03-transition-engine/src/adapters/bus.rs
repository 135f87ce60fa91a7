//! Event-bus notification sink.

use crate::ports::outbound::NotificationSink;
use async_trait::async_trait;
use shared_bus::{EventPublisher, TraceabilityEvent};
use std::sync::Arc;
use tracing::debug;

/// Publishes engine notifications onto the shared event bus, where delivery
/// collaborators subscribe.
pub struct BusNotificationSink {
    bus: Arc<dyn EventPublisher>,
}

impl BusNotificationSink {
    pub fn new(bus: Arc<dyn EventPublisher>) -> Self {
        Self { bus }
    }
}

#[async_trait]
impl NotificationSink for BusNotificationSink {
    async fn notify(&self, event: TraceabilityEvent) {
        let receivers = self.bus.publish(event).await;
        debug!(receivers, "Notification published to bus");
    }
}
