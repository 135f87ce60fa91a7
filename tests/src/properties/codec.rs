//! # Codec Properties
//!
//! The QR payload round-trip holds for arbitrary well-formed snapshots,
//! including empty optional-ish fields (blank phone, blank location).

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;
    use rt_01_qr_codec::{decode, encode, BatchSnapshot};
    use shared_types::{DistributionStep, ProcessingStep, Stage};

    const ALL_STAGES: [Stage; 10] = [
        Stage::Uploaded,
        Stage::Collected,
        Stage::Processing(ProcessingStep::Cleaning),
        Stage::Processing(ProcessingStep::Drying),
        Stage::Processing(ProcessingStep::Grinding),
        Stage::Processing(ProcessingStep::Packaging),
        Stage::Distribution(DistributionStep::Assigned),
        Stage::Distribution(DistributionStep::PickedUp),
        Stage::Distribution(DistributionStep::InTransit),
        Stage::Delivered,
    ];

    fn snapshot_strategy() -> impl Strategy<Value = BatchSnapshot> {
        (
            "[A-Z]{2}-[A-Z]{3}[0-9]{3}",
            "[A-Z0-9]{1,8}",
            // Phone and location may be blank.
            "[0-9+\\- ]{0,15}",
            "[A-Za-z][A-Za-z ]{0,19}",
            0.0f64..10_000.0,
            0i64..2_000_000_000i64,
            0u32..1_000_000_000u32,
            0usize..ALL_STAGES.len(),
            "[A-Za-z0-9 ,.\\-]{0,40}",
        )
            .prop_map(
                |(batch_id, farmer_id, phone, herb, quantity, secs, nanos, stage_idx, location)| {
                    BatchSnapshot {
                        batch_id,
                        farmer_id,
                        farmer_phone: phone,
                        herb_name: herb,
                        quantity_kg: quantity,
                        timestamp: Utc.timestamp_opt(secs, nanos).unwrap(),
                        stage: ALL_STAGES[stage_idx],
                        location,
                    }
                },
            )
    }

    proptest! {
        #[test]
        fn prop_round_trip(snapshot in snapshot_strategy()) {
            let decoded = decode(&encode(&snapshot)).expect("well-formed snapshot must decode");
            prop_assert_eq!(decoded, snapshot);
        }

        #[test]
        fn prop_encoding_deterministic(snapshot in snapshot_strategy()) {
            prop_assert_eq!(encode(&snapshot), encode(&snapshot));
        }

        #[test]
        fn prop_truncated_payload_never_panics(
            snapshot in snapshot_strategy(),
            cut in 0usize..64,
        ) {
            let payload = encode(&snapshot);
            let cut = cut.min(payload.len());
            // Truncation yields a typed error, never a panic.
            let _ = decode(&payload[..payload.len() - cut]);
        }
    }
}
