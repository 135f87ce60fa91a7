//! Checkable invariants over a batch and its transaction log.
//!
//! Pure predicates used by the test suite to validate that the engine only
//! ever produces well-formed histories.

use crate::domain::transitions::successor;
use shared_types::{Batch, Stage, TransactionEvent, TransitionType};

/// Events for a batch are totally ordered by timestamp.
pub fn invariant_monotonic_timestamps(events: &[TransactionEvent]) -> bool {
    events
        .windows(2)
        .all(|pair| pair[0].timestamp <= pair[1].timestamp)
}

/// Custody forms an unbroken chain: the first custody transfer starts at the
/// farmer, each next one starts where the previous ended, and the last one
/// ends at the batch's current holder.
pub fn invariant_holder_continuity(batch: &Batch, events: &[TransactionEvent]) -> bool {
    let mut holder = batch.farmer_id.as_str();

    for event in events {
        if !event.transition.transfers_custody() {
            continue;
        }
        if event.from_holder_id != holder {
            return false;
        }
        holder = event.to_holder_id.as_str();
    }

    holder == batch.current_holder_id
}

/// Replaying the pipeline transitions from `uploaded` must be legal at every
/// step and must land on the batch's current stage. Bookkeeping events
/// (`Certify`, flag overlay changes) do not move the stage.
pub fn invariant_stage_reachable(batch: &Batch, events: &[TransactionEvent]) -> bool {
    let mut stage = Stage::Uploaded;

    for event in events {
        match event.transition {
            TransitionType::Certify
            | TransitionType::Flag
            | TransitionType::Resolve
            | TransitionType::FalseAlarm => continue,
            transition => match successor(&stage, transition) {
                Some(next) => stage = next,
                None => return false,
            },
        }
    }

    stage == batch.current_stage
}

/// Quantity is never altered by any transition; the log carries no quantity
/// at all, so it suffices that the record's quantity stays positive.
pub fn invariant_quantity_positive(batch: &Batch) -> bool {
    batch.quantity_kg > 0.0
}
