pub mod report;
pub mod scenario;
pub mod snapshot;

pub use report::{CsvReport, CsvRow, ExportError};
pub use scenario::{Scenario, ScenarioError, ScenarioOutput, UsEsopCompensation};
pub use snapshot::ResultsSnapshot;
