//! Traceability Service
//!
//! Main service implementing `TraceabilityApi`. The sole writer for batch
//! records: every mutation funnels through here, serialized per batch.

use crate::adapters::time::SystemTimeSource;
use crate::config::EngineConfig;
use crate::domain::errors::EngineError;
use crate::domain::fraud::FraudLedger;
use crate::domain::transitions::{pipeline_row, required_role, successor};
use crate::ports::inbound::{
    CertificateRequest, NewBatchRequest, TraceabilityApi, TransitionRequest,
};
use crate::ports::outbound::{NotificationSink, TimeSource};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rt_02_batch_store::{BatchIdGenerator, BatchMutation, BatchRepository, NewBatch, StoreError};
use shared_bus::TraceabilityEvent;
use shared_types::{
    ActorId, Batch, CertificateStatus, FraudAlert, FraudSeverity, FraudStatus, PaymentStatus,
    QualityCertificate, Role, Stage, TransactionEvent, TransitionType,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};
use uuid::Uuid;

/// The outcome of validating one transition request: the record mutation to
/// apply alongside the appended event.
struct ValidatedTransition {
    next_stage: Option<Stage>,
    next_holder: Option<ActorId>,
    flag_overlay: Option<bool>,
}

/// Traceability Service
///
/// Orchestrates every mutation:
/// 1. Serialize writers per batch (keyed lock)
/// 2. Re-read authoritative state from the record store
/// 3. Validate role gate, successor legality, certificate gating
/// 4. Append the transaction event and apply the record mutation atomically
/// 5. Emit a notification to the injected sink
pub struct TraceabilityService {
    store: Arc<dyn BatchRepository>,
    notifier: Arc<dyn NotificationSink>,
    clock: Arc<dyn TimeSource>,
    config: EngineConfig,
    fraud: FraudLedger,
    id_gen: BatchIdGenerator,
    /// Per-batch writer locks. The registry itself is guarded by a std
    /// mutex held only long enough to clone the entry.
    batch_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl TraceabilityService {
    /// Create a new service with default config and the system clock.
    pub fn new(store: Arc<dyn BatchRepository>, notifier: Arc<dyn NotificationSink>) -> Self {
        Self::with_parts(
            store,
            notifier,
            Arc::new(SystemTimeSource),
            EngineConfig::default(),
        )
    }

    /// Create a new service with explicit clock and config.
    pub fn with_parts(
        store: Arc<dyn BatchRepository>,
        notifier: Arc<dyn NotificationSink>,
        clock: Arc<dyn TimeSource>,
        config: EngineConfig,
    ) -> Self {
        let id_gen = BatchIdGenerator::new(config.batch_id_prefix.clone());
        Self {
            store,
            notifier,
            clock,
            config,
            fraud: FraudLedger::new(),
            id_gen,
            batch_locks: Mutex::new(HashMap::new()),
        }
    }

    /// All fraud alerts raised against a batch, oldest first.
    pub fn fraud_alerts(&self, batch_id: &str) -> Vec<FraudAlert> {
        self.fraud.for_batch(batch_id)
    }

    /// Fraud alerts still awaiting resolution.
    pub fn open_fraud_alerts(&self) -> Vec<FraudAlert> {
        self.fraud.open_alerts()
    }

    /// Derived status of the batch's certificate under the configured
    /// expiry warning window, or `None` when no certificate is attached.
    pub fn certificate_status(
        &self,
        batch_id: &str,
    ) -> Result<Option<CertificateStatus>, EngineError> {
        let batch = self.store.get(batch_id)?;
        Ok(batch
            .quality_certificate
            .as_ref()
            .map(|cert| cert.status(self.clock.now(), self.config.expiring_window())))
    }

    fn lock_for(&self, batch_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.batch_locks.lock().unwrap_or_else(|e| e.into_inner());
        locks.entry(batch_id.to_string()).or_default().clone()
    }

    /// Event timestamps are kept strictly after the last appended event so
    /// the per-batch log stays totally ordered even if the clock regresses.
    fn next_timestamp(&self, events: &[TransactionEvent]) -> DateTime<Utc> {
        let now = self.clock.now();
        match events.last() {
            Some(last) if now <= last.timestamp => last.timestamp + Duration::milliseconds(1),
            _ => now,
        }
    }

    fn check_notes(&self, notes: Option<&String>) -> Result<(), EngineError> {
        if let Some(notes) = notes {
            if notes.len() > self.config.max_notes_len {
                return Err(EngineError::NotesTooLong {
                    len: notes.len(),
                    max: self.config.max_notes_len,
                });
            }
        }
        Ok(())
    }

    fn validate(
        &self,
        batch: &Batch,
        request: &TransitionRequest,
    ) -> Result<ValidatedTransition, EngineError> {
        use TransitionType as T;

        let from = batch.current_stage;
        let transition = request.transition;
        let invalid = || EngineError::InvalidTransition { from, transition };

        match transition {
            T::Flag => {
                if request.actor_role != Role::Admin {
                    return Err(EngineError::Forbidden {
                        role: request.actor_role,
                        action: format!("flag batch {}", batch.batch_id),
                    });
                }
                if batch.flagged {
                    return Err(invalid());
                }
                Ok(ValidatedTransition {
                    next_stage: None,
                    next_holder: None,
                    flag_overlay: Some(true),
                })
            }
            T::Resolve | T::FalseAlarm => {
                if request.actor_role != Role::Admin {
                    return Err(EngineError::Forbidden {
                        role: request.actor_role,
                        action: format!("resolve the flag on batch {}", batch.batch_id),
                    });
                }
                if !batch.flagged {
                    return Err(invalid());
                }
                Ok(ValidatedTransition {
                    next_stage: None,
                    next_holder: None,
                    flag_overlay: Some(false),
                })
            }
            // Certification goes through `attach_certificate`.
            T::Certify => Err(invalid()),
            _ => {
                // The pipeline is frozen while the batch is flagged; it
                // resumes its prior stage once an admin resolves the flag.
                if batch.flagged {
                    return Err(invalid());
                }

                // A request whose table row the pipeline already advanced
                // past is stale (the losing side of a race), not a role
                // violation.
                if let Some((row_role, last_origin)) = pipeline_row(transition) {
                    if request.actor_role == row_role && from.ordinal() > last_origin {
                        return Err(invalid());
                    }
                }

                match required_role(&from) {
                    None => return Err(invalid()),
                    Some(required) if required != request.actor_role => {
                        return Err(EngineError::Forbidden {
                            role: request.actor_role,
                            action: format!("perform `{transition}` at stage `{from}`"),
                        });
                    }
                    Some(_) => {}
                }

                let next = successor(&from, transition).ok_or_else(invalid)?;

                if transition == T::Complete {
                    let active = batch
                        .quality_certificate
                        .as_ref()
                        .is_some_and(|cert| cert.is_active(self.clock.now()));
                    if !active {
                        return Err(EngineError::CertificateRequired {
                            batch_id: batch.batch_id.clone(),
                        });
                    }
                }

                Ok(ValidatedTransition {
                    next_stage: Some(next),
                    next_holder: Some(request.actor_id.clone()),
                    flag_overlay: None,
                })
            }
        }
    }

    fn notification_for(
        batch: &Batch,
        event: &TransactionEvent,
        actor_id: &str,
        from_stage: Stage,
        to_stage: Stage,
    ) -> TraceabilityEvent {
        let affected = affected_users(&[
            batch.farmer_id.as_str(),
            event.from_holder_id.as_str(),
            event.to_holder_id.as_str(),
        ]);

        match event.transition {
            TransitionType::Flag => TraceabilityEvent::BatchFlagged {
                batch_id: batch.batch_id.clone(),
                admin_id: actor_id.to_string(),
                summary: format!("Batch {} flagged for investigation", batch.batch_id),
                affected_user_ids: affected,
            },
            TransitionType::Resolve | TransitionType::FalseAlarm => {
                TraceabilityEvent::FlagResolved {
                    batch_id: batch.batch_id.clone(),
                    admin_id: actor_id.to_string(),
                    outcome: event.transition,
                    summary: format!(
                        "Flag on batch {} cleared; stage {} resumed",
                        batch.batch_id, to_stage
                    ),
                    affected_user_ids: affected,
                }
            }
            transition => TraceabilityEvent::StageAdvanced {
                batch_id: batch.batch_id.clone(),
                actor_id: actor_id.to_string(),
                transition,
                from_stage,
                to_stage,
                summary: format!("Batch {} moved to {} stage", batch.batch_id, to_stage),
                affected_user_ids: affected,
            },
        }
    }
}

#[async_trait]
impl TraceabilityApi for TraceabilityService {
    async fn register_batch(
        &self,
        farmer_id: &str,
        actor_role: Role,
        request: NewBatchRequest,
    ) -> Result<Batch, EngineError> {
        if actor_role != Role::Farmer {
            return Err(EngineError::Forbidden {
                role: actor_role,
                action: "register a batch".to_string(),
            });
        }

        let batch_id = match request.batch_id {
            Some(batch_id) => batch_id,
            None => self
                .id_gen
                .next_id(&request.herb_name, |candidate| {
                    self.store.get(candidate).is_ok()
                }),
        };

        let batch = self.store.create(NewBatch {
            batch_id,
            herb_name: request.herb_name,
            quantity_kg: request.quantity_kg,
            farmer_id: farmer_id.to_string(),
            farmer_contact: request.farmer_contact,
            origin_location: request.origin_location,
            photos: request.photos,
            created_at: self.clock.now(),
        })?;

        info!(
            batch_id = %batch.batch_id,
            herb = %batch.herb_name,
            quantity_kg = batch.quantity_kg,
            farmer = %batch.farmer_id,
            "Batch registered"
        );

        self.notifier
            .notify(TraceabilityEvent::BatchCreated {
                batch_id: batch.batch_id.clone(),
                farmer_id: batch.farmer_id.clone(),
                herb_name: batch.herb_name.clone(),
                quantity_kg: batch.quantity_kg,
                summary: format!(
                    "Batch {} registered: {} kg of {}",
                    batch.batch_id, batch.quantity_kg, batch.herb_name
                ),
                affected_user_ids: vec![batch.farmer_id.clone()],
            })
            .await;

        Ok(batch)
    }

    async fn request_transition(
        &self,
        request: TransitionRequest,
    ) -> Result<TransactionEvent, EngineError> {
        // 1. Cheap input validation before taking the lock
        self.check_notes(request.notes.as_ref())?;

        // 2. Serialize writers for this batch
        let lock = self.lock_for(&request.batch_id);
        let _guard = lock.lock().await;

        // 3. Authoritative state; scanned QR snapshots are never trusted here
        let batch = self.store.get(&request.batch_id)?;
        let events = self.store.events(&request.batch_id)?;

        // 4. Role gate, successor legality, certificate gating
        let validated = self.validate(&batch, &request).map_err(|err| {
            warn!(
                batch_id = %request.batch_id,
                actor = %request.actor_id,
                role = %request.actor_role,
                transition = %request.transition,
                error = %err,
                "Transition rejected"
            );
            err
        })?;

        // 5. Build the event and apply atomically
        let to_holder = validated
            .next_holder
            .clone()
            .unwrap_or_else(|| batch.current_holder_id.clone());
        let event = TransactionEvent {
            event_id: Uuid::new_v4().to_string(),
            batch_id: batch.batch_id.clone(),
            from_holder_id: batch.current_holder_id.clone(),
            to_holder_id: to_holder,
            transition: request.transition,
            timestamp: self.next_timestamp(&events),
            location: request.location,
            notes: request.notes,
            payment_status: PaymentStatus::Pending,
        };

        let mut mutation = BatchMutation::at_version(batch.version);
        if let Some(stage) = validated.next_stage {
            mutation = mutation.with_stage(stage);
        }
        if let Some(holder) = &validated.next_holder {
            mutation = mutation.with_holder(holder.clone());
        }
        if let Some(flagged) = validated.flag_overlay {
            mutation = mutation.with_flagged(flagged);
        }

        let updated = self
            .store
            .apply_event(event.clone(), mutation)
            .map_err(|err| match err {
                // A writer slipped in between read and apply; to the caller
                // this is indistinguishable from requesting against the
                // already-advanced stage.
                StoreError::VersionConflict { .. } => EngineError::InvalidTransition {
                    from: batch.current_stage,
                    transition: request.transition,
                },
                other => other.into(),
            })?;

        info!(
            batch_id = %updated.batch_id,
            transition = %event.transition,
            from_stage = %batch.current_stage,
            to_stage = %updated.current_stage,
            actor = %request.actor_id,
            "Transition accepted"
        );

        // 6. Notify
        self.notifier
            .notify(Self::notification_for(
                &updated,
                &event,
                &request.actor_id,
                batch.current_stage,
                updated.current_stage,
            ))
            .await;

        Ok(event)
    }

    async fn attach_certificate(
        &self,
        batch_id: &str,
        actor_id: &str,
        actor_role: Role,
        request: CertificateRequest,
    ) -> Result<Batch, EngineError> {
        if actor_role != Role::Processor {
            return Err(EngineError::Forbidden {
                role: actor_role,
                action: format!("attach a certificate to batch {batch_id}"),
            });
        }

        let lock = self.lock_for(batch_id);
        let _guard = lock.lock().await;

        let batch = self.store.get(batch_id)?;
        let events = self.store.events(batch_id)?;
        let now = self.clock.now();

        if request.expires_at <= request.issued_at {
            return Err(EngineError::InvalidCertificate {
                certificate_id: request.certificate_id,
                reason: "expiry is not after issue".to_string(),
            });
        }
        if request.expires_at <= now {
            return Err(EngineError::InvalidCertificate {
                certificate_id: request.certificate_id,
                reason: "already expired".to_string(),
            });
        }

        let certificate = QualityCertificate {
            certificate_id: request.certificate_id,
            issued_at: request.issued_at,
            expires_at: request.expires_at,
        };

        let event = TransactionEvent {
            event_id: Uuid::new_v4().to_string(),
            batch_id: batch.batch_id.clone(),
            from_holder_id: batch.current_holder_id.clone(),
            to_holder_id: batch.current_holder_id.clone(),
            transition: TransitionType::Certify,
            timestamp: self.next_timestamp(&events),
            location: None,
            notes: None,
            payment_status: PaymentStatus::Pending,
        };

        let updated = self.store.apply_event(
            event,
            BatchMutation::at_version(batch.version).with_certificate(certificate.clone()),
        )?;

        info!(
            batch_id = %updated.batch_id,
            certificate_id = %certificate.certificate_id,
            actor = %actor_id,
            "Quality certificate attached"
        );

        self.notifier
            .notify(TraceabilityEvent::CertificateAttached {
                batch_id: updated.batch_id.clone(),
                certificate_id: certificate.certificate_id.clone(),
                summary: format!(
                    "Quality certificate {} attached to batch {}",
                    certificate.certificate_id, updated.batch_id
                ),
                affected_user_ids: affected_users(&[
                    updated.farmer_id.as_str(),
                    updated.current_holder_id.as_str(),
                ]),
            })
            .await;

        Ok(updated)
    }

    async fn raise_fraud_alert(
        &self,
        batch_id: &str,
        raised_by: &str,
        severity: FraudSeverity,
        description: String,
    ) -> Result<FraudAlert, EngineError> {
        // Alerts are orthogonal to the transaction log, but must target a
        // real batch.
        let batch = self.store.get(batch_id)?;
        let now = self.clock.now();

        let alert = self.fraud.raise(FraudAlert {
            alert_id: Uuid::new_v4().to_string(),
            batch_id: batch.batch_id.clone(),
            raised_by: raised_by.to_string(),
            description,
            severity,
            status: FraudStatus::Pending,
            raised_at: now,
            updated_at: now,
        });

        warn!(
            batch_id = %batch.batch_id,
            alert_id = %alert.alert_id,
            severity = ?alert.severity,
            raised_by = %alert.raised_by,
            "Fraud alert raised"
        );

        self.notifier
            .notify(TraceabilityEvent::FraudAlertRaised {
                alert_id: alert.alert_id.clone(),
                batch_id: batch.batch_id.clone(),
                severity: alert.severity,
                summary: format!("Fraud alert raised against batch {}", batch.batch_id),
                affected_user_ids: affected_users(&[
                    batch.farmer_id.as_str(),
                    batch.current_holder_id.as_str(),
                    raised_by,
                ]),
            })
            .await;

        Ok(alert)
    }

    async fn update_fraud_alert(
        &self,
        alert_id: &str,
        actor_id: &str,
        actor_role: Role,
        status: FraudStatus,
    ) -> Result<FraudAlert, EngineError> {
        if actor_role != Role::Admin {
            return Err(EngineError::Forbidden {
                role: actor_role,
                action: format!("update fraud alert {alert_id}"),
            });
        }

        let alert = self.fraud.update_status(alert_id, status, self.clock.now())?;

        info!(
            alert_id = %alert.alert_id,
            batch_id = %alert.batch_id,
            status = %alert.status,
            actor = %actor_id,
            "Fraud alert updated"
        );

        self.notifier
            .notify(TraceabilityEvent::FraudAlertUpdated {
                alert_id: alert.alert_id.clone(),
                batch_id: alert.batch_id.clone(),
                status: alert.status,
                summary: format!(
                    "Fraud alert on batch {} moved to {}",
                    alert.batch_id, alert.status
                ),
                affected_user_ids: vec![alert.raised_by.clone()],
            })
            .await;

        Ok(alert)
    }
}

/// First-seen-order deduplication of notification recipients.
fn affected_users(ids: &[&str]) -> Vec<ActorId> {
    let mut out: Vec<ActorId> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.iter().any(|seen| seen == id) {
            out.push((*id).to_string());
        }
    }
    out
}
