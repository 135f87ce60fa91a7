//! # Projection Tests
//!
//! The consumer timeline derived from real engine state, end to end.

#[cfg(test)]
mod tests {
    use crate::harness::Harness;
    use chrono::Duration;
    use rt_02_batch_store::BatchRepository;
    use rt_03_transition_engine::ports::inbound::{CertificateRequest, TraceabilityApi};
    use rt_04_traceability::{project, MacroStage, StageStatus};
    use shared_types::{Role, TransitionType};

    #[tokio::test]
    async fn test_fresh_batch_projects_farming_only() {
        let harness = Harness::new();
        let batch = harness.register_turmeric().await;

        let journey = project(
            &harness.store.get(&batch.batch_id).unwrap(),
            &harness.store.events(&batch.batch_id).unwrap(),
        );

        assert_eq!(journey.stages.len(), 5);
        assert_eq!(journey.current().unwrap().stage, MacroStage::Farming);
        assert_eq!(journey.stages[0].actor.as_deref(), Some("F001"));
        assert_eq!(
            journey.stages[0].location.as_deref(),
            Some("Karnataka, India")
        );
        assert!(journey.stages[1..]
            .iter()
            .all(|stage| stage.status == StageStatus::Pending));
    }

    #[tokio::test]
    async fn test_full_journey_projects_all_completed() {
        let harness = Harness::new();
        let batch = harness.register_turmeric().await;

        for (actor, role, transition) in [
            ("AG001", Role::Aggregator, TransitionType::Collect),
            ("PR001", Role::Processor, TransitionType::BeginProcessing),
            ("PR001", Role::Processor, TransitionType::Advance),
            ("PR001", Role::Processor, TransitionType::Advance),
            ("PR001", Role::Processor, TransitionType::Advance),
        ] {
            harness
                .transition(&batch.batch_id, actor, role, transition)
                .await
                .unwrap();
        }

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

        for (actor, role, transition) in [
            ("PR001", Role::Processor, TransitionType::Complete),
            ("DT001", Role::Distributor, TransitionType::Pickup),
            ("DT001", Role::Distributor, TransitionType::Transit),
            ("DT001", Role::Distributor, TransitionType::Deliver),
        ] {
            harness
                .transition(&batch.batch_id, actor, role, transition)
                .await
                .unwrap();
        }

        let journey = project(
            &harness.store.get(&batch.batch_id).unwrap(),
            &harness.store.events(&batch.batch_id).unwrap(),
        );

        assert!(journey.is_complete());
        assert!(journey.current().is_none());
        assert_eq!(journey.stages[1].actor.as_deref(), Some("AG001"));
        assert_eq!(journey.stages[2].actor.as_deref(), Some("PR001"));
        assert_eq!(journey.stages[4].actor.as_deref(), Some("DT001"));

        // Stage entry timestamps follow the pipeline order.
        let timestamps: Vec<_> = journey
            .stages
            .iter()
            .map(|stage| stage.timestamp.unwrap())
            .collect();
        assert!(timestamps.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[tokio::test]
    async fn test_mid_journey_statuses() {
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

        let journey = project(
            &harness.store.get(&batch.batch_id).unwrap(),
            &harness.store.events(&batch.batch_id).unwrap(),
        );

        let statuses: Vec<StageStatus> = journey.stages.iter().map(|s| s.status).collect();
        assert_eq!(
            statuses,
            [
                StageStatus::Completed,
                StageStatus::Completed,
                StageStatus::Current,
                StageStatus::Pending,
                StageStatus::Pending,
            ]
        );
    }
}
