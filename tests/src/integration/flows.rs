//! # Integration Test Flows
//!
//! End-to-end journeys across the record store, the transition engine, and
//! the shared bus: the canonical farm-to-delivery path, the rejection
//! paths (wrong role, skipped stage, missing certificate), and the
//! notification choreography that accompanies every accepted mutation.

#[cfg(test)]
mod tests {
    use crate::harness::Harness;
    use chrono::Duration;
    use rt_03_transition_engine::domain::invariants::{
        invariant_holder_continuity, invariant_monotonic_timestamps, invariant_quantity_positive,
        invariant_stage_reachable,
    };
    use rt_02_batch_store::BatchRepository;
    use rt_03_transition_engine::ports::inbound::{CertificateRequest, TraceabilityApi};
    use rt_03_transition_engine::EngineError;
    use shared_bus::EventFilter;
    use shared_types::{DistributionStep, Role, Stage, TransitionType};

    /// The full canonical journey: upload → collect → four processing steps
    /// → certify → complete → pickup → transit → deliver.
    async fn drive_to_delivered(harness: &Harness, batch_id: &str) {
        harness
            .transition(batch_id, "AG001", Role::Aggregator, TransitionType::Collect)
            .await
            .unwrap();
        harness
            .transition(
                batch_id,
                "PR001",
                Role::Processor,
                TransitionType::BeginProcessing,
            )
            .await
            .unwrap();
        for _ in 0..3 {
            harness
                .transition(batch_id, "PR001", Role::Processor, TransitionType::Advance)
                .await
                .unwrap();
        }

        let now = harness.clock.now();
        harness
            .service
            .attach_certificate(
                batch_id,
                "PR001",
                Role::Processor,
                CertificateRequest {
                    certificate_id: "QC-TUR001".to_string(),
                    issued_at: now,
                    expires_at: now + Duration::days(30),
                },
            )
            .await
            .unwrap();

        harness
            .transition(batch_id, "PR001", Role::Processor, TransitionType::Complete)
            .await
            .unwrap();
        harness
            .transition(batch_id, "DT001", Role::Distributor, TransitionType::Pickup)
            .await
            .unwrap();
        harness
            .transition(batch_id, "DT001", Role::Distributor, TransitionType::Transit)
            .await
            .unwrap();
        harness
            .transition(batch_id, "DT001", Role::Distributor, TransitionType::Deliver)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_full_journey_ends_delivered() {
        let harness = Harness::new();
        let batch = harness.register_turmeric().await;
        assert_eq!(batch.batch_id, "HB-TUR001");

        drive_to_delivered(&harness, &batch.batch_id).await;

        let delivered = harness.store.get(&batch.batch_id).unwrap();
        assert_eq!(delivered.current_stage, Stage::Delivered);
        assert_eq!(delivered.current_holder_id, "DT001");
        // Quantity is never altered by any transition.
        assert_eq!(delivered.quantity_kg, 50.0);

        // One event per accepted transition: 9 pipeline moves + 1 certify.
        let events = harness.store.events(&batch.batch_id).unwrap();
        assert_eq!(events.len(), 10);
        assert!(invariant_monotonic_timestamps(&events));
        assert!(invariant_holder_continuity(&delivered, &events));
        assert!(invariant_stage_reachable(&delivered, &events));
        assert!(invariant_quantity_positive(&delivered));
    }

    #[tokio::test]
    async fn test_custody_chain_follows_actors() {
        let harness = Harness::new();
        let batch = harness.register_turmeric().await;

        let event = harness
            .transition(
                &batch.batch_id,
                "AG001",
                Role::Aggregator,
                TransitionType::Collect,
            )
            .await
            .unwrap();
        assert_eq!(event.from_holder_id, "F001");
        assert_eq!(event.to_holder_id, "AG001");

        let collected = harness.store.get(&batch.batch_id).unwrap();
        assert_eq!(collected.current_stage, Stage::Collected);
        assert_eq!(collected.current_holder_id, "AG001");
    }

    #[tokio::test]
    async fn test_wrong_role_rejected_without_side_effects() {
        let harness = Harness::new();
        let batch = harness.register_turmeric().await;

        // Distributor attempts pickup while the batch is still uploaded.
        let err = harness
            .transition(
                &batch.batch_id,
                "DT001",
                Role::Distributor,
                TransitionType::Pickup,
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Forbidden {
                role: Role::Distributor,
                ..
            }
        ));

        // No event appended, nothing changed.
        assert!(harness.store.events(&batch.batch_id).unwrap().is_empty());
        let unchanged = harness.store.get(&batch.batch_id).unwrap();
        assert_eq!(unchanged.current_stage, Stage::Uploaded);
        assert_eq!(unchanged.version, 0);
    }

    #[tokio::test]
    async fn test_stage_skip_rejected() {
        let harness = Harness::new();
        let batch = harness.register_turmeric().await;

        harness
            .transition(
                &batch.batch_id,
                "AG001",
                Role::Aggregator,
                TransitionType::Collect,
            )
            .await
            .unwrap();

        // Straight to an advance without begin-processing.
        let err = harness
            .transition(
                &batch.batch_id,
                "PR001",
                Role::Processor,
                TransitionType::Advance,
            )
            .await
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidTransition {
                from: Stage::Collected,
                transition: TransitionType::Advance,
            }
        );
        assert_eq!(harness.store.events(&batch.batch_id).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_certificate_gates_completion() {
        let harness = Harness::new();
        let batch = harness.register_turmeric().await;

        harness
            .transition(
                &batch.batch_id,
                "AG001",
                Role::Aggregator,
                TransitionType::Collect,
            )
            .await
            .unwrap();
        harness
            .transition(
                &batch.batch_id,
                "PR001",
                Role::Processor,
                TransitionType::BeginProcessing,
            )
            .await
            .unwrap();
        for _ in 0..3 {
            harness
                .transition(
                    &batch.batch_id,
                    "PR001",
                    Role::Processor,
                    TransitionType::Advance,
                )
                .await
                .unwrap();
        }

        // Packaging reached, no certificate yet.
        let err = harness
            .transition(
                &batch.batch_id,
                "PR001",
                Role::Processor,
                TransitionType::Complete,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::CertificateRequired { .. }));

        let now = harness.clock.now();
        harness
            .service
            .attach_certificate(
                &batch.batch_id,
                "PR001",
                Role::Processor,
                CertificateRequest {
                    certificate_id: "QC-TUR001".to_string(),
                    issued_at: now,
                    expires_at: now + Duration::days(30),
                },
            )
            .await
            .unwrap();

        // Succeeds immediately after a valid attach.
        harness
            .transition(
                &batch.batch_id,
                "PR001",
                Role::Processor,
                TransitionType::Complete,
            )
            .await
            .unwrap();

        let assigned = harness.store.get(&batch.batch_id).unwrap();
        assert_eq!(
            assigned.current_stage,
            Stage::Distribution(DistributionStep::Assigned)
        );
    }

    #[tokio::test]
    async fn test_notifications_accompany_every_mutation() {
        let harness = Harness::new();
        let mut sub = harness.bus.subscribe(EventFilter::all());

        let batch = harness.register_turmeric().await;
        drive_to_delivered(&harness, &batch.batch_id).await;

        let notifications = sub.drain();
        // 1 created + 9 stage advances + 1 certificate.
        assert_eq!(notifications.len(), 11);
        assert_eq!(notifications[0].event_type(), "batch.created");
        assert!(notifications
            .iter()
            .all(|n| n.batch_id() == batch.batch_id));
        // Every notification names someone to deliver to.
        assert!(notifications
            .iter()
            .all(|n| !n.affected_user_ids().is_empty()));
    }

    #[tokio::test]
    async fn test_scanned_snapshot_is_advisory_only() {
        let harness = Harness::new();
        let batch = harness.register_turmeric().await;

        // A label printed at upload time...
        let snapshot = rt_01_qr_codec::BatchSnapshot::from_batch(&batch);
        let payload = rt_01_qr_codec::encode(&snapshot);

        // ...still decodes after the batch moved on, but the decoded stage
        // is stale next to authoritative store state.
        harness
            .transition(
                &batch.batch_id,
                "AG001",
                Role::Aggregator,
                TransitionType::Collect,
            )
            .await
            .unwrap();

        let decoded = rt_01_qr_codec::decode(&payload).unwrap();
        assert_eq!(decoded.stage, Stage::Uploaded);

        let authoritative = harness.store.get(&decoded.batch_id).unwrap();
        assert_eq!(authoritative.current_stage, Stage::Collected);
    }
}
