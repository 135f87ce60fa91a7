//! Journey derivation from the transaction log.

use crate::domain::journey::{Journey, MacroStage, StageStatus, TraceStage};
use chrono::{DateTime, Utc};
use shared_types::{Batch, Stage, TransactionEvent, TransitionType};

/// Per-macro-stage accumulator while walking the log: the timestamp of the
/// event that entered the stage, and the most recent actor/location/notes
/// within it.
#[derive(Default, Clone)]
struct StageFacts {
    entered_at: Option<DateTime<Utc>>,
    actor: Option<String>,
    location: Option<String>,
    details: Option<String>,
}

/// Derive the ordered consumer timeline for a batch.
///
/// Always yields the five macro stages in canonical order. Stages strictly
/// before the batch's position are `Completed`, the matching one `Current`,
/// the rest `Pending`; a delivered batch has all five `Completed`. The
/// projection is a pure function of its inputs and tolerates an empty log
/// (a freshly created batch shows only Farming, as current). The fraud flag
/// overlay never alters the projection.
pub fn project(batch: &Batch, events: &[TransactionEvent]) -> Journey {
    let mut facts: [StageFacts; 5] = Default::default();

    // Farming is derived from the batch itself; it has no log event.
    facts[0] = StageFacts {
        entered_at: Some(batch.created_at),
        actor: Some(batch.farmer_id.clone()),
        location: Some(batch.origin_location.display_name()),
        details: Some(format!(
            "Harvested {} kg of {}",
            batch.quantity_kg, batch.herb_name
        )),
    };

    for event in events {
        let Some(idx) = macro_of_transition(event.transition) else {
            continue;
        };
        let slot = &mut facts[idx];
        if slot.entered_at.is_none() {
            slot.entered_at = Some(event.timestamp);
        }
        slot.actor = Some(event.to_holder_id.clone());
        if let Some(location) = &event.location {
            slot.location = Some(location.display_name());
        }
        if let Some(notes) = &event.notes {
            slot.details = Some(notes.clone());
        }
    }

    let position = macro_position(&batch.current_stage);

    let stages = MacroStage::ALL
        .iter()
        .enumerate()
        .map(|(idx, &stage)| {
            let status = if idx < position {
                StageStatus::Completed
            } else if idx == position {
                StageStatus::Current
            } else {
                StageStatus::Pending
            };

            let slot = &facts[idx];
            TraceStage {
                stage,
                status,
                actor: slot.actor.clone(),
                location: slot.location.clone(),
                timestamp: slot.entered_at,
                details: slot.details.clone(),
            }
        })
        .collect();

    Journey {
        batch_id: batch.batch_id.clone(),
        stages,
    }
}

/// The macro stage a batch's pipeline position falls into. `Delivered` sits
/// past Retail, so every macro stage reads as completed.
fn macro_position(stage: &Stage) -> usize {
    match stage {
        Stage::Uploaded => 0,
        Stage::Collected => 1,
        Stage::Processing(_) => 2,
        Stage::Distribution(_) => 3,
        Stage::Delivered => MacroStage::ALL.len(),
    }
}

/// The macro stage an accepted transition lands in, or `None` for
/// bookkeeping entries that never move the timeline.
fn macro_of_transition(transition: TransitionType) -> Option<usize> {
    match transition {
        TransitionType::Collect => Some(1),
        TransitionType::BeginProcessing | TransitionType::Advance => Some(2),
        TransitionType::Complete | TransitionType::Pickup | TransitionType::Transit => Some(3),
        TransitionType::Deliver => Some(4),
        TransitionType::Certify
        | TransitionType::Flag
        | TransitionType::Resolve
        | TransitionType::FalseAlarm => None,
    }
}
