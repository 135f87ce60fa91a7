//! The role-gated transition table.
//!
//! One function answers "who may act at this stage", the other "where does
//! this transition lead". Flag bookkeeping (`Flag`, `Resolve`, `FalseAlarm`)
//! is admin-only and handled as an overlay by the service, not as rows of
//! the pipeline table; `Certify` goes through `attach_certificate` and is
//! never a requestable pipeline transition.

use shared_types::{DistributionStep, ProcessingStep, Role, Stage, TransitionType};

/// The role authorized to move a batch out of `stage`.
///
/// `None` for the terminal stage: nothing moves a delivered batch.
pub fn required_role(stage: &Stage) -> Option<Role> {
    match stage {
        Stage::Uploaded => Some(Role::Aggregator),
        Stage::Collected => Some(Role::Processor),
        Stage::Processing(_) => Some(Role::Processor),
        Stage::Distribution(_) => Some(Role::Distributor),
        Stage::Delivered => None,
    }
}

/// The stage `transition` leads to from `from`, or `None` when the move is
/// not a legal successor (out-of-order advancement is never legal; no stage
/// may be skipped).
pub fn successor(from: &Stage, transition: TransitionType) -> Option<Stage> {
    use DistributionStep as D;
    use ProcessingStep as P;
    use TransitionType as T;

    match (from, transition) {
        (Stage::Uploaded, T::Collect) => Some(Stage::Collected),
        (Stage::Collected, T::BeginProcessing) => Some(Stage::Processing(P::Cleaning)),
        (Stage::Processing(step), T::Advance) => step.next().map(Stage::Processing),
        (Stage::Processing(P::Packaging), T::Complete) => Some(Stage::Distribution(D::Assigned)),
        (Stage::Distribution(D::Assigned), T::Pickup) => Some(Stage::Distribution(D::PickedUp)),
        (Stage::Distribution(D::PickedUp), T::Transit) => Some(Stage::Distribution(D::InTransit)),
        (Stage::Distribution(D::InTransit), T::Deliver) => Some(Stage::Delivered),
        _ => None,
    }
}

/// The role that may ever perform a pipeline transition, and the highest
/// stage ordinal the transition can originate from.
///
/// Used to tell a *stale* request from an unauthorized one: when the right
/// kind of actor asks for a transition whose table rows the pipeline has
/// already advanced past (the losing side of two concurrent collects, a
/// double-submitted pickup), the request is rejected as an invalid
/// transition rather than as a role violation. `None` for bookkeeping
/// transitions, which have no pipeline row.
pub fn pipeline_row(transition: TransitionType) -> Option<(Role, u8)> {
    use TransitionType as T;

    match transition {
        T::Collect => Some((Role::Aggregator, Stage::Uploaded.ordinal())),
        T::BeginProcessing => Some((Role::Processor, Stage::Collected.ordinal())),
        T::Advance => Some((
            Role::Processor,
            Stage::Processing(ProcessingStep::Grinding).ordinal(),
        )),
        T::Complete => Some((
            Role::Processor,
            Stage::Processing(ProcessingStep::Packaging).ordinal(),
        )),
        T::Pickup => Some((
            Role::Distributor,
            Stage::Distribution(DistributionStep::Assigned).ordinal(),
        )),
        T::Transit => Some((
            Role::Distributor,
            Stage::Distribution(DistributionStep::PickedUp).ordinal(),
        )),
        T::Deliver => Some((
            Role::Distributor,
            Stage::Distribution(DistributionStep::InTransit).ordinal(),
        )),
        T::Certify | T::Flag | T::Resolve | T::FalseAlarm => None,
    }
}
