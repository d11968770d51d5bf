//! Point-in-time JSON exports of a scenario and its outputs.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::report::ExportError;
use crate::scenario::{Scenario, ScenarioOutput};

/// A captured scenario run: the document as provided, the outputs it
/// produced, and when it was evaluated.
///
/// The `inputs` field is the full tagged document, so a snapshot can be
/// re-run by feeding it back through [`Scenario`] deserialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsSnapshot {
    /// Capture time, RFC 3339 UTC.
    pub timestamp: DateTime<Utc>,
    pub scenario: String,
    pub inputs: serde_json::Value,
    pub outputs: serde_json::Value,
}

impl ResultsSnapshot {
    /// Captures a snapshot stamped with the current time.
    pub fn capture(
        scenario: &Scenario,
        output: &ScenarioOutput,
    ) -> Result<Self, ExportError> {
        Self::with_timestamp(scenario, output, Utc::now())
    }

    /// Captures a snapshot with a caller-supplied timestamp, for reproducible
    /// output.
    pub fn with_timestamp(
        scenario: &Scenario,
        output: &ScenarioOutput,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, ExportError> {
        Ok(Self {
            timestamp,
            scenario: scenario.label().to_string(),
            inputs: serde_json::to_value(scenario)?,
            outputs: serde_json::to_value(output)?,
        })
    }

    /// Renders the snapshot as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
