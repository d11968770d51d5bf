//! US federal and California tax tables for 2025, plus FICA/SDI rates and the
//! 401(k) and NIIT constants the engines share.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{TableError, check_amount, check_brackets, check_rate};
use crate::models::{FilingStatus, TaxBracket};

/// A pair of values keyed by filing status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerFilingStatus<T> {
    pub single: T,
    pub mfj: T,
}

impl<T> PerFilingStatus<T> {
    pub fn for_status(&self, filing_status: FilingStatus) -> &T {
        match filing_status {
            FilingStatus::Single => &self.single,
            FilingStatus::MarriedFilingJointly => &self.mfj,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FicaRates {
    pub ss_wage_base: Decimal,
    pub ss_rate: Decimal,
    pub medicare_rate: Decimal,
    pub additional_medicare_rate: Decimal,
    pub additional_medicare_threshold: PerFilingStatus<Decimal>,
    pub sdi_rate: Decimal,
    /// SDI wage cap; `None` means SDI applies to all wages (CA since 2024).
    pub sdi_wage_cap: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsTaxTables {
    pub tax_year: i32,
    pub fed_brackets: PerFilingStatus<Vec<TaxBracket>>,
    pub ca_brackets: PerFilingStatus<Vec<TaxBracket>>,
    pub fed_standard_deduction: PerFilingStatus<Decimal>,
    pub ca_standard_deduction: PerFilingStatus<Decimal>,
    pub fica: FicaRates,
    pub k401_employee_limit: Decimal,
    pub niit_rate: Decimal,
    pub niit_threshold: PerFilingStatus<Decimal>,
    /// Holding period above which a sale is long-term.
    pub long_term_holding_months: u32,
}

impl UsTaxTables {
    pub fn year_2025() -> Self {
        Self {
            tax_year: 2025,
            fed_brackets: PerFilingStatus {
                single: vec![
                    TaxBracket::up_to(dec!(11925), dec!(0.10)),
                    TaxBracket::up_to(dec!(48475), dec!(0.12)),
                    TaxBracket::up_to(dec!(103350), dec!(0.22)),
                    TaxBracket::up_to(dec!(197300), dec!(0.24)),
                    TaxBracket::up_to(dec!(250525), dec!(0.32)),
                    TaxBracket::up_to(dec!(626350), dec!(0.35)),
                    TaxBracket::top(dec!(0.37)),
                ],
                mfj: vec![
                    TaxBracket::up_to(dec!(23850), dec!(0.10)),
                    TaxBracket::up_to(dec!(96950), dec!(0.12)),
                    TaxBracket::up_to(dec!(206700), dec!(0.22)),
                    TaxBracket::up_to(dec!(394600), dec!(0.24)),
                    TaxBracket::up_to(dec!(501050), dec!(0.32)),
                    TaxBracket::up_to(dec!(751600), dec!(0.35)),
                    TaxBracket::top(dec!(0.37)),
                ],
            },
            ca_brackets: PerFilingStatus {
                single: vec![
                    TaxBracket::up_to(dec!(10412), dec!(0.01)),
                    TaxBracket::up_to(dec!(24684), dec!(0.02)),
                    TaxBracket::up_to(dec!(38959), dec!(0.04)),
                    TaxBracket::up_to(dec!(54081), dec!(0.06)),
                    TaxBracket::up_to(dec!(68350), dec!(0.08)),
                    TaxBracket::up_to(dec!(349137), dec!(0.093)),
                    TaxBracket::up_to(dec!(418961), dec!(0.103)),
                    TaxBracket::up_to(dec!(698271), dec!(0.113)),
                    TaxBracket::top(dec!(0.123)),
                ],
                mfj: vec![
                    TaxBracket::up_to(dec!(20824), dec!(0.01)),
                    TaxBracket::up_to(dec!(49368), dec!(0.02)),
                    TaxBracket::up_to(dec!(77918), dec!(0.04)),
                    TaxBracket::up_to(dec!(108162), dec!(0.06)),
                    TaxBracket::up_to(dec!(136700), dec!(0.08)),
                    TaxBracket::up_to(dec!(698274), dec!(0.093)),
                    TaxBracket::up_to(dec!(837922), dec!(0.103)),
                    TaxBracket::up_to(dec!(1396542), dec!(0.113)),
                    TaxBracket::top(dec!(0.123)),
                ],
            },
            fed_standard_deduction: PerFilingStatus {
                single: dec!(15750),
                mfj: dec!(31500),
            },
            ca_standard_deduction: PerFilingStatus {
                single: dec!(5540),
                mfj: dec!(11080),
            },
            fica: FicaRates {
                ss_wage_base: dec!(176100),
                ss_rate: dec!(0.062),
                medicare_rate: dec!(0.0145),
                additional_medicare_rate: dec!(0.009),
                additional_medicare_threshold: PerFilingStatus {
                    single: dec!(200000),
                    mfj: dec!(250000),
                },
                sdi_rate: dec!(0.012),
                sdi_wage_cap: None,
            },
            k401_employee_limit: dec!(23500),
            niit_rate: dec!(0.038),
            niit_threshold: PerFilingStatus {
                single: dec!(200000),
                mfj: dec!(250000),
            },
            long_term_holding_months: 12,
        }
    }

    pub fn validate(&self) -> Result<(), TableError> {
        check_brackets("federal Single", &self.fed_brackets.single)?;
        check_brackets("federal MFJ", &self.fed_brackets.mfj)?;
        check_brackets("CA Single", &self.ca_brackets.single)?;
        check_brackets("CA MFJ", &self.ca_brackets.mfj)?;

        check_amount("federal standard deduction", self.fed_standard_deduction.single)?;
        check_amount("federal standard deduction", self.fed_standard_deduction.mfj)?;
        check_amount("CA standard deduction", self.ca_standard_deduction.single)?;
        check_amount("CA standard deduction", self.ca_standard_deduction.mfj)?;

        check_amount("SS wage base", self.fica.ss_wage_base)?;
        check_rate("SS rate", self.fica.ss_rate)?;
        check_rate("Medicare rate", self.fica.medicare_rate)?;
        check_rate("Additional Medicare rate", self.fica.additional_medicare_rate)?;
        check_amount(
            "Additional Medicare threshold",
            self.fica.additional_medicare_threshold.single,
        )?;
        check_amount(
            "Additional Medicare threshold",
            self.fica.additional_medicare_threshold.mfj,
        )?;
        check_rate("SDI rate", self.fica.sdi_rate)?;
        if let Some(cap) = self.fica.sdi_wage_cap {
            check_amount("SDI wage cap", cap)?;
        }

        check_amount("401(k) employee limit", self.k401_employee_limit)?;
        check_rate("NIIT rate", self.niit_rate)?;
        check_amount("NIIT threshold", self.niit_threshold.single)?;
        check_amount("NIIT threshold", self.niit_threshold.mfj)?;

        Ok(())
    }
}

impl Default for UsTaxTables {
    fn default() -> Self {
        Self::year_2025()
    }
}
