//! Scenario documents: tagged JSON inputs naming an engine, evaluated against
//! the bundled tax tables.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use esop_core::calculations::{
    CompensationSource, IncomeTaxCalculator, IncomeTaxError, IncomeTaxInput, IncomeTaxResult,
    IndiaEsopCalculator, IndiaEsopError, IndiaEsopInput, IndiaEsopResult, UsEsopCalculator,
    UsEsopError, UsEsopInput, UsEsopResult,
};
use esop_core::{CompensationProfile, IndiaTaxTables, UsTaxTables};

/// Errors from evaluating a scenario.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScenarioError {
    #[error(transparent)]
    IndiaEsop(#[from] IndiaEsopError),

    #[error(transparent)]
    UsEsop(#[from] UsEsopError),

    #[error(transparent)]
    IncomeTax(#[from] IncomeTaxError),
}

/// Compensation feeding a US ESOP scenario: a full household income-tax input
/// evaluated first and reused, or a profile entered directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsEsopCompensation {
    IncomeTax(IncomeTaxInput),
    Manual(CompensationProfile),
}

/// A self-contained scenario document, as read from a JSON file.
///
/// The document is tagged with a `scenario` field:
/// - `"india-esop"`: an `input` for the India ESOP engine
/// - `"us-esop"`: an `input` for the US ESOP engine plus a `compensation`
///   source (`income_tax` or `manual`)
/// - `"income-tax"`: an `input` for the US/CA household engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scenario", rename_all = "kebab-case")]
pub enum Scenario {
    IndiaEsop {
        input: IndiaEsopInput,
    },
    UsEsop {
        input: UsEsopInput,
        compensation: UsEsopCompensation,
    },
    IncomeTax {
        input: IncomeTaxInput,
    },
}

/// The outputs a scenario produced, one variant per engine combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioOutput {
    IndiaEsop(IndiaEsopResult),
    UsEsop {
        /// Present when the compensation source was a household input.
        household: Option<IncomeTaxResult>,
        esop: UsEsopResult,
    },
    IncomeTax(IncomeTaxResult),
}

impl Scenario {
    /// The tag this scenario carries in its JSON form.
    pub fn label(&self) -> &'static str {
        match self {
            Scenario::IndiaEsop { .. } => "india-esop",
            Scenario::UsEsop { .. } => "us-esop",
            Scenario::IncomeTax { .. } => "income-tax",
        }
    }

    /// Runs the scenario against the bundled 2025 tables.
    ///
    /// A `us-esop` scenario with an `income_tax` compensation source runs the
    /// household engine first and feeds its result to the ESOP engine, so the
    /// output carries both results.
    pub fn evaluate(&self) -> Result<ScenarioOutput, ScenarioError> {
        match self {
            Scenario::IndiaEsop { input } => {
                let tables = IndiaTaxTables::year_2025();
                let result = IndiaEsopCalculator::new(&tables).calculate(input)?;
                Ok(ScenarioOutput::IndiaEsop(result))
            }
            Scenario::UsEsop {
                input,
                compensation,
            } => {
                let tables = UsTaxTables::year_2025();
                let calculator = UsEsopCalculator::new(&tables);
                match compensation {
                    UsEsopCompensation::IncomeTax(household_input) => {
                        let household =
                            IncomeTaxCalculator::new(&tables).calculate(household_input)?;
                        let esop = calculator
                            .calculate(input, CompensationSource::IncomeTax(&household))?;
                        Ok(ScenarioOutput::UsEsop {
                            household: Some(household),
                            esop,
                        })
                    }
                    UsEsopCompensation::Manual(profile) => {
                        let esop =
                            calculator.calculate(input, CompensationSource::Manual(profile))?;
                        Ok(ScenarioOutput::UsEsop {
                            household: None,
                            esop,
                        })
                    }
                }
            }
            Scenario::IncomeTax { input } => {
                let tables = UsTaxTables::year_2025();
                let result = IncomeTaxCalculator::new(&tables).calculate(input)?;
                Ok(ScenarioOutput::IncomeTax(result))
            }
        }
    }
}
