//! CSV reports: a scenario run flattened into `section,key,value` rows.

use std::io::Write;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scenario::{Scenario, ScenarioOutput};

/// Errors from rendering an export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write error: {0}")]
    Csv(String),

    #[error("JSON serialize error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::Csv(err.to_string())
    }
}

/// One row of the flattened report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvRow {
    pub section: String,
    pub key: String,
    pub value: String,
}

/// A scenario run flattened for spreadsheet import: a `Meta` section with the
/// timestamp and scenario tag, an `Inputs` section, and one section per
/// engine result. Nested keys join with `.`; array elements index as
/// `key[i]`. Quoting is handled by the `csv` writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvReport {
    rows: Vec<CsvRow>,
}

impl CsvReport {
    /// Builds the report rows stamped with the current time.
    pub fn capture(
        scenario: &Scenario,
        output: &ScenarioOutput,
    ) -> Result<Self, ExportError> {
        Self::with_timestamp(scenario, output, Utc::now())
    }

    /// Builds the report rows with a caller-supplied timestamp, for
    /// reproducible output.
    pub fn with_timestamp(
        scenario: &Scenario,
        output: &ScenarioOutput,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, ExportError> {
        let mut rows = Vec::new();
        push_row(
            &mut rows,
            "Meta",
            "timestamp",
            timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
        );
        push_row(&mut rows, "Meta", "scenario", scenario.label().to_string());

        let mut inputs = serde_json::to_value(scenario)?;
        if let Some(map) = inputs.as_object_mut() {
            // The tag already sits in the Meta section.
            map.remove("scenario");
        }
        flatten_into("Inputs", "", &inputs, &mut rows);

        for (section, value) in engine_sections(output)? {
            flatten_into(section, "", &value, &mut rows);
        }

        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[CsvRow] {
        &self.rows
    }

    /// Writes the report, header row included, to `writer`.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), ExportError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for row in &self.rows {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Renders the report to a string.
    pub fn render(&self) -> Result<String, ExportError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        String::from_utf8(buffer).map_err(|err| ExportError::Csv(err.to_string()))
    }
}

/// Result values labelled with their report section, one per engine the
/// scenario ran.
fn engine_sections(
    output: &ScenarioOutput,
) -> Result<Vec<(&'static str, serde_json::Value)>, ExportError> {
    match output {
        ScenarioOutput::IndiaEsop(result) => {
            Ok(vec![("India ESOP", serde_json::to_value(result)?)])
        }
        ScenarioOutput::UsEsop { household, esop } => {
            let mut sections = Vec::new();
            if let Some(household) = household {
                sections.push(("Income Tax", serde_json::to_value(household)?));
            }
            sections.push(("US ESOP", serde_json::to_value(esop)?));
            Ok(sections)
        }
        ScenarioOutput::IncomeTax(result) => {
            Ok(vec![("Income Tax", serde_json::to_value(result)?)])
        }
    }
}

fn push_row(
    rows: &mut Vec<CsvRow>,
    section: &str,
    key: &str,
    value: String,
) {
    rows.push(CsvRow {
        section: section.to_string(),
        key: key.to_string(),
        value,
    });
}

fn flatten_into(
    section: &str,
    prefix: &str,
    value: &serde_json::Value,
    rows: &mut Vec<CsvRow>,
) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_into(section, &path, child, rows);
            }
        }
        serde_json::Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten_into(section, &format!("{prefix}[{index}]"), child, rows);
            }
        }
        serde_json::Value::Null => push_row(rows, section, prefix, String::new()),
        serde_json::Value::Bool(flag) => push_row(rows, section, prefix, flag.to_string()),
        serde_json::Value::Number(number) => push_row(rows, section, prefix, number.to_string()),
        serde_json::Value::String(text) => push_row(rows, section, prefix, text.clone()),
    }
}
