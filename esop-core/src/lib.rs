pub mod calculations;
pub mod config;
pub mod models;

pub use calculations::{IncomeTaxCalculator, IndiaEsopCalculator, UsEsopCalculator};
pub use config::{FicaRates, FyPolicy, IndiaTaxTables, PerFilingStatus, TableError, UsTaxTables};
pub use models::*;
