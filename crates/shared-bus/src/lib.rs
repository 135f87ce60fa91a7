//! # Shared Bus - Notification Event Bus
//!
//! Transport for the domain events the transition engine emits on every
//! successful mutation. The core makes no assumption about delivery; push,
//! poll, and email delivery are external collaborators subscribing here.
//!
//! ```text
//! ┌──────────────────┐                    ┌──────────────────┐
//! │ Transition Engine│                    │ Notification     │
//! │                  │    publish()       │ Delivery         │
//! │                  │ ──────┐            │ (external)       │
//! └──────────────────┘       │            └──────────────────┘
//!                            ▼                    ↑
//!                      ┌──────────────┐          │
//!                      │  Event Bus   │          │
//!                      │              │ ─────────┘
//!                      └──────────────┘  subscribe()
//! ```
//!
//! Subscribers filter by topic and/or batch id; a slow subscriber that lags
//! behind the channel capacity drops the oldest events rather than blocking
//! publishers.

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{EventFilter, EventTopic, TraceabilityEvent};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventSubscriber, Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before backpressure.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
