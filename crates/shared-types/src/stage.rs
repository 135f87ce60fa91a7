//! # Roles, Stages, and Transitions
//!
//! The closed vocabularies of the supply-chain pipeline. The canonical stage
//! order is:
//!
//! ```text
//! uploaded → collected → processing:{cleaning,drying,grinding,packaging}
//!          → distribution:{assigned,picked-up,in-transit} → delivered
//! ```
//!
//! The fraud flag is an *overlay* on a batch, never a stage value: a flagged
//! batch keeps its underlying stage and resumes it once the flag is resolved.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// An actor role as vended by the identity provider.
///
/// Consumers hold no write authority anywhere in the pipeline; they only
/// read (`get`, `project`, QR decode).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Farmer,
    Aggregator,
    Processor,
    Distributor,
    Admin,
    Consumer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Farmer => "farmer",
            Role::Aggregator => "aggregator",
            Role::Processor => "processor",
            Role::Distributor => "distributor",
            Role::Admin => "admin",
            Role::Consumer => "consumer",
        };
        f.write_str(s)
    }
}

impl FromStr for Role {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "farmer" => Ok(Role::Farmer),
            "aggregator" => Ok(Role::Aggregator),
            "processor" => Ok(Role::Processor),
            "distributor" => Ok(Role::Distributor),
            "admin" => Ok(Role::Admin),
            "consumer" => Ok(Role::Consumer),
            other => Err(ParseError::UnknownRole {
                value: other.to_string(),
            }),
        }
    }
}

/// Sub-step of the processing stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStep {
    Cleaning,
    Drying,
    Grinding,
    Packaging,
}

impl ProcessingStep {
    /// The next processing step, or `None` after packaging.
    pub fn next(&self) -> Option<ProcessingStep> {
        match self {
            ProcessingStep::Cleaning => Some(ProcessingStep::Drying),
            ProcessingStep::Drying => Some(ProcessingStep::Grinding),
            ProcessingStep::Grinding => Some(ProcessingStep::Packaging),
            ProcessingStep::Packaging => None,
        }
    }
}

/// Sub-step of the distribution stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DistributionStep {
    Assigned,
    PickedUp,
    InTransit,
}

/// A batch's position in the canonical pipeline.
///
/// Serialized as its canonical string form (`"uploaded"`,
/// `"processing:drying"`, `"distribution:in-transit"`, ...) both in QR
/// payloads and in persisted records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Uploaded,
    Collected,
    Processing(ProcessingStep),
    Distribution(DistributionStep),
    Delivered,
}

impl Stage {
    /// Position in the canonical order, for strictly-before comparisons.
    pub fn ordinal(&self) -> u8 {
        match self {
            Stage::Uploaded => 0,
            Stage::Collected => 1,
            Stage::Processing(ProcessingStep::Cleaning) => 2,
            Stage::Processing(ProcessingStep::Drying) => 3,
            Stage::Processing(ProcessingStep::Grinding) => 4,
            Stage::Processing(ProcessingStep::Packaging) => 5,
            Stage::Distribution(DistributionStep::Assigned) => 6,
            Stage::Distribution(DistributionStep::PickedUp) => 7,
            Stage::Distribution(DistributionStep::InTransit) => 8,
            Stage::Delivered => 9,
        }
    }

    /// Whether this stage ends the pipeline.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Delivered)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Uploaded => "uploaded",
            Stage::Collected => "collected",
            Stage::Processing(ProcessingStep::Cleaning) => "processing:cleaning",
            Stage::Processing(ProcessingStep::Drying) => "processing:drying",
            Stage::Processing(ProcessingStep::Grinding) => "processing:grinding",
            Stage::Processing(ProcessingStep::Packaging) => "processing:packaging",
            Stage::Distribution(DistributionStep::Assigned) => "distribution:assigned",
            Stage::Distribution(DistributionStep::PickedUp) => "distribution:picked-up",
            Stage::Distribution(DistributionStep::InTransit) => "distribution:in-transit",
            Stage::Delivered => "delivered",
        };
        f.write_str(s)
    }
}

impl FromStr for Stage {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uploaded" => Ok(Stage::Uploaded),
            "collected" => Ok(Stage::Collected),
            "processing:cleaning" => Ok(Stage::Processing(ProcessingStep::Cleaning)),
            "processing:drying" => Ok(Stage::Processing(ProcessingStep::Drying)),
            "processing:grinding" => Ok(Stage::Processing(ProcessingStep::Grinding)),
            "processing:packaging" => Ok(Stage::Processing(ProcessingStep::Packaging)),
            "distribution:assigned" => Ok(Stage::Distribution(DistributionStep::Assigned)),
            "distribution:picked-up" => Ok(Stage::Distribution(DistributionStep::PickedUp)),
            "distribution:in-transit" => Ok(Stage::Distribution(DistributionStep::InTransit)),
            "delivered" => Ok(Stage::Delivered),
            other => Err(ParseError::UnknownStage {
                value: other.to_string(),
            }),
        }
    }
}

impl Serialize for Stage {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Stage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Stage::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// A role-gated move between stages, or a record-keeping entry
/// (`Certify`, `Flag`, `Resolve`, `FalseAlarm`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionType {
    /// Aggregator takes custody of an uploaded batch.
    Collect,
    /// Processor starts the processing pipeline (cleaning).
    BeginProcessing,
    /// Processor advances to the next processing step.
    Advance,
    /// Processor finishes packaging and hands the batch to distribution.
    Complete,
    /// Distributor picks up an assigned shipment.
    Pickup,
    /// Distributor marks the shipment in transit.
    Transit,
    /// Distributor delivers the shipment.
    Deliver,
    /// Processor attaches a quality certificate (no stage change).
    Certify,
    /// Admin flags the batch for fraud investigation (overlay, no stage change).
    Flag,
    /// Admin resolves a fraud flag, restoring the prior stage.
    Resolve,
    /// Admin dismisses a fraud flag as a false alarm.
    FalseAlarm,
}

impl TransitionType {
    /// Whether this transition transfers accountability to the acting actor.
    ///
    /// Certification and flag bookkeeping leave the current holder unchanged.
    pub fn transfers_custody(&self) -> bool {
        !matches!(
            self,
            TransitionType::Certify
                | TransitionType::Flag
                | TransitionType::Resolve
                | TransitionType::FalseAlarm
        )
    }
}

impl fmt::Display for TransitionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransitionType::Collect => "collect",
            TransitionType::BeginProcessing => "begin-processing",
            TransitionType::Advance => "advance",
            TransitionType::Complete => "complete",
            TransitionType::Pickup => "pickup",
            TransitionType::Transit => "transit",
            TransitionType::Deliver => "deliver",
            TransitionType::Certify => "certify",
            TransitionType::Flag => "flag",
            TransitionType::Resolve => "resolve",
            TransitionType::FalseAlarm => "false-alarm",
        };
        f.write_str(s)
    }
}

/// Errors parsing role or stage string forms.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown role: {value}")]
    UnknownRole { value: String },

    #[error("Unknown stage: {value}")]
    UnknownStage { value: String },
}
