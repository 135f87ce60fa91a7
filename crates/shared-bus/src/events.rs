//! # Traceability Events
//!
//! Defines all event types that flow through the shared bus. Every variant
//! carries the notification contract fields: an event type, the affected
//! batch, the user ids a delivery collaborator should notify, and a
//! human-readable summary.

use serde::{Deserialize, Serialize};
use shared_types::{
    ActorId, BatchId, FraudSeverity, FraudStatus, Stage, TransitionType,
};

/// All events that can be published to the event bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TraceabilityEvent {
    /// A farmer registered a new batch.
    BatchCreated {
        batch_id: BatchId,
        farmer_id: ActorId,
        herb_name: String,
        quantity_kg: f64,
        affected_user_ids: Vec<ActorId>,
        summary: String,
    },

    /// A role-gated transition was accepted and the batch advanced.
    StageAdvanced {
        batch_id: BatchId,
        actor_id: ActorId,
        transition: TransitionType,
        from_stage: Stage,
        to_stage: Stage,
        affected_user_ids: Vec<ActorId>,
        summary: String,
    },

    /// A processor attached (or re-issued) a quality certificate.
    CertificateAttached {
        batch_id: BatchId,
        certificate_id: String,
        affected_user_ids: Vec<ActorId>,
        summary: String,
    },

    /// An admin flagged the batch; the pipeline is frozen until resolution.
    BatchFlagged {
        batch_id: BatchId,
        admin_id: ActorId,
        affected_user_ids: Vec<ActorId>,
        summary: String,
    },

    /// An admin resolved or dismissed a flag; the prior stage resumes.
    FlagResolved {
        batch_id: BatchId,
        admin_id: ActorId,
        outcome: TransitionType,
        affected_user_ids: Vec<ActorId>,
        summary: String,
    },

    /// A fraud alert was raised against a batch.
    FraudAlertRaised {
        alert_id: String,
        batch_id: BatchId,
        severity: FraudSeverity,
        affected_user_ids: Vec<ActorId>,
        summary: String,
    },

    /// A fraud alert moved through its lifecycle.
    FraudAlertUpdated {
        alert_id: String,
        batch_id: BatchId,
        status: FraudStatus,
        affected_user_ids: Vec<ActorId>,
        summary: String,
    },
}

impl TraceabilityEvent {
    /// Stable string identifying the event kind, for delivery collaborators.
    pub fn event_type(&self) -> &'static str {
        match self {
            TraceabilityEvent::BatchCreated { .. } => "batch.created",
            TraceabilityEvent::StageAdvanced { .. } => "batch.stage_advanced",
            TraceabilityEvent::CertificateAttached { .. } => "batch.certificate_attached",
            TraceabilityEvent::BatchFlagged { .. } => "batch.flagged",
            TraceabilityEvent::FlagResolved { .. } => "batch.flag_resolved",
            TraceabilityEvent::FraudAlertRaised { .. } => "fraud.alert_raised",
            TraceabilityEvent::FraudAlertUpdated { .. } => "fraud.alert_updated",
        }
    }

    /// The batch this event concerns.
    pub fn batch_id(&self) -> &str {
        match self {
            TraceabilityEvent::BatchCreated { batch_id, .. }
            | TraceabilityEvent::StageAdvanced { batch_id, .. }
            | TraceabilityEvent::CertificateAttached { batch_id, .. }
            | TraceabilityEvent::BatchFlagged { batch_id, .. }
            | TraceabilityEvent::FlagResolved { batch_id, .. }
            | TraceabilityEvent::FraudAlertRaised { batch_id, .. }
            | TraceabilityEvent::FraudAlertUpdated { batch_id, .. } => batch_id,
        }
    }

    /// The user ids a delivery collaborator should notify.
    pub fn affected_user_ids(&self) -> &[ActorId] {
        match self {
            TraceabilityEvent::BatchCreated {
                affected_user_ids, ..
            }
            | TraceabilityEvent::StageAdvanced {
                affected_user_ids, ..
            }
            | TraceabilityEvent::CertificateAttached {
                affected_user_ids, ..
            }
            | TraceabilityEvent::BatchFlagged {
                affected_user_ids, ..
            }
            | TraceabilityEvent::FlagResolved {
                affected_user_ids, ..
            }
            | TraceabilityEvent::FraudAlertRaised {
                affected_user_ids, ..
            }
            | TraceabilityEvent::FraudAlertUpdated {
                affected_user_ids, ..
            } => affected_user_ids,
        }
    }

    /// Human-readable one-line summary.
    pub fn summary(&self) -> &str {
        match self {
            TraceabilityEvent::BatchCreated { summary, .. }
            | TraceabilityEvent::StageAdvanced { summary, .. }
            | TraceabilityEvent::CertificateAttached { summary, .. }
            | TraceabilityEvent::BatchFlagged { summary, .. }
            | TraceabilityEvent::FlagResolved { summary, .. }
            | TraceabilityEvent::FraudAlertRaised { summary, .. }
            | TraceabilityEvent::FraudAlertUpdated { summary, .. } => summary,
        }
    }

    /// The topic this event is published under.
    pub fn topic(&self) -> EventTopic {
        match self {
            TraceabilityEvent::BatchCreated { .. } => EventTopic::Batches,
            TraceabilityEvent::StageAdvanced { .. } => EventTopic::Transitions,
            TraceabilityEvent::CertificateAttached { .. } => EventTopic::Certificates,
            TraceabilityEvent::BatchFlagged { .. }
            | TraceabilityEvent::FlagResolved { .. }
            | TraceabilityEvent::FraudAlertRaised { .. }
            | TraceabilityEvent::FraudAlertUpdated { .. } => EventTopic::Fraud,
        }
    }
}

/// Coarse subscription topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    Batches,
    Transitions,
    Certificates,
    Fraud,
}

/// Subscription filter: match by topic set and/or a single batch id.
///
/// An empty filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub topics: Option<Vec<EventTopic>>,
    pub batch_id: Option<BatchId>,
}

impl EventFilter {
    /// Match all events.
    pub fn all() -> Self {
        Self::default()
    }

    /// Match only the given topics.
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics: Some(topics),
            batch_id: None,
        }
    }

    /// Match only events for one batch.
    pub fn batch(batch_id: impl Into<BatchId>) -> Self {
        Self {
            topics: None,
            batch_id: Some(batch_id.into()),
        }
    }

    pub fn matches(&self, event: &TraceabilityEvent) -> bool {
        if let Some(topics) = &self.topics {
            if !topics.contains(&event.topic()) {
                return false;
            }
        }
        if let Some(batch_id) = &self.batch_id {
            if event.batch_id() != batch_id {
                return false;
            }
        }
        true
    }
}
