//! The consumer-facing journey vocabulary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The five canonical macro stages a consumer sees on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MacroStage {
    Farming,
    Collection,
    Processing,
    Distribution,
    Retail,
}

impl MacroStage {
    /// All macro stages in canonical order.
    pub const ALL: [MacroStage; 5] = [
        MacroStage::Farming,
        MacroStage::Collection,
        MacroStage::Processing,
        MacroStage::Distribution,
        MacroStage::Retail,
    ];
}

impl fmt::Display for MacroStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MacroStage::Farming => "Farming",
            MacroStage::Collection => "Collection",
            MacroStage::Processing => "Processing",
            MacroStage::Distribution => "Distribution",
            MacroStage::Retail => "Retail",
        };
        f.write_str(s)
    }
}

/// Where a macro stage sits relative to the batch's current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    Completed,
    Current,
    Pending,
}

/// One row of the consumer timeline.
///
/// Pending stages carry no actor, location, or timestamp yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceStage {
    pub stage: MacroStage,
    pub status: StageStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// The full derived timeline for one batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Journey {
    pub batch_id: String,
    /// Always the five macro stages, in canonical order.
    pub stages: Vec<TraceStage>,
}

impl Journey {
    /// The stage currently in progress, if the journey is not complete.
    pub fn current(&self) -> Option<&TraceStage> {
        self.stages
            .iter()
            .find(|stage| stage.status == StageStatus::Current)
    }

    /// Whether every macro stage has completed (the batch was delivered).
    pub fn is_complete(&self) -> bool {
        self.stages
            .iter()
            .all(|stage| stage.status == StageStatus::Completed)
    }
}
