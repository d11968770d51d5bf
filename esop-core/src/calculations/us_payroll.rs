//! Annual federal + California + payroll tax on one household's wage income.
//!
//! Factored out because the household engine needs it once per view (full and
//! base-only) and the ESOP engine needs it twice per calculation (with and
//! without the perquisite).

use rust_decimal::Decimal;

use crate::calculations::common::round_half_up;
use crate::calculations::progressive::progressive_tax;
use crate::config::UsTaxTables;
use crate::models::FilingStatus;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AnnualLiability {
    pub adjusted_income: Decimal,
    pub fed_taxable: Decimal,
    pub fed_tax: Decimal,
    pub ca_taxable: Decimal,
    pub ca_tax: Decimal,
    /// FICA wage base: gross minus cafeteria deductions, 401(k) included.
    pub fica_base: Decimal,
    /// Wages actually subject to Social Security after the wage-base cap.
    pub ss_taxable_wages: Decimal,
    pub social_security: Decimal,
    pub medicare: Decimal,
    pub additional_medicare: Decimal,
    pub sdi: Decimal,
}

impl AnnualLiability {
    pub fn total(&self) -> Decimal {
        self.fed_tax
            + self.ca_tax
            + self.social_security
            + self.medicare
            + self.additional_medicare
            + self.sdi
    }
}

/// Computes the full annual liability for a gross wage figure.
///
/// `pretax_income_deductions` reduces federal/CA taxable income (401(k) plus
/// cafeteria items); `pretax_fica_deductions` reduces FICA wages (cafeteria
/// items only). SDI applies to gross wages without either deduction.
pub(crate) fn annual_liability(
    tables: &UsTaxTables,
    filing_status: FilingStatus,
    gross: Decimal,
    pretax_income_deductions: Decimal,
    pretax_fica_deductions: Decimal,
) -> AnnualLiability {
    let adjusted_income = round_half_up(gross - pretax_income_deductions).max(Decimal::ZERO);

    let fed_taxable = (adjusted_income - tables.fed_standard_deduction.for_status(filing_status))
        .max(Decimal::ZERO);
    let fed_tax = round_half_up(progressive_tax(
        fed_taxable,
        tables.fed_brackets.for_status(filing_status),
    ));

    let ca_taxable = (adjusted_income - tables.ca_standard_deduction.for_status(filing_status))
        .max(Decimal::ZERO);
    let ca_tax = round_half_up(progressive_tax(
        ca_taxable,
        tables.ca_brackets.for_status(filing_status),
    ));

    let fica_base = round_half_up(gross - pretax_fica_deductions).max(Decimal::ZERO);
    let ss_taxable_wages = fica_base.min(tables.fica.ss_wage_base);
    let social_security = round_half_up(ss_taxable_wages * tables.fica.ss_rate);
    let medicare = round_half_up(fica_base * tables.fica.medicare_rate);

    let threshold = *tables
        .fica
        .additional_medicare_threshold
        .for_status(filing_status);
    let additional_medicare = round_half_up(
        (fica_base - threshold).max(Decimal::ZERO) * tables.fica.additional_medicare_rate,
    );

    let sdi_base = match tables.fica.sdi_wage_cap {
        Some(cap) => gross.min(cap),
        None => gross,
    };
    let sdi = round_half_up(sdi_base.max(Decimal::ZERO) * tables.fica.sdi_rate);

    AnnualLiability {
        adjusted_income,
        fed_taxable,
        fed_tax,
        ca_taxable,
        ca_tax,
        fica_base,
        ss_taxable_wages,
        social_security,
        medicare,
        additional_medicare,
        sdi,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn tables() -> UsTaxTables {
        UsTaxTables::year_2025()
    }

    #[test]
    fn single_earner_at_one_hundred_thousand() {
        let result = annual_liability(
            &tables(),
            FilingStatus::Single,
            dec!(100000),
            dec!(0),
            dec!(0),
        );

        assert_eq!(result.adjusted_income, dec!(100000.00));
        assert_eq!(result.fed_taxable, dec!(84250.00));
        assert_eq!(result.fed_tax, dec!(13449.00));
        assert_eq!(result.ca_taxable, dec!(94460.00));
        assert_eq!(result.ca_tax, dec!(5437.63));
        assert_eq!(result.social_security, dec!(6200.00));
        assert_eq!(result.medicare, dec!(1450.00));
        assert_eq!(result.additional_medicare, dec!(0.00));
        assert_eq!(result.sdi, dec!(1200.00));
        assert_eq!(result.total(), dec!(27736.63));
    }

    #[test]
    fn mfj_household_at_two_hundred_thousand() {
        let result = annual_liability(
            &tables(),
            FilingStatus::MarriedFilingJointly,
            dec!(200000),
            dec!(0),
            dec!(0),
        );

        assert_eq!(result.fed_taxable, dec!(168500.00));
        assert_eq!(result.fed_tax, dec!(26898.00));
        assert_eq!(result.ca_taxable, dec!(188920.00));
        assert_eq!(result.ca_tax, dec!(10875.26));
        // Above the SS wage base, so the cap binds.
        assert_eq!(result.social_security, dec!(10918.20));
        assert_eq!(result.medicare, dec!(2900.00));
        assert_eq!(result.additional_medicare, dec!(0.00));
        assert_eq!(result.sdi, dec!(2400.00));
        assert_eq!(result.total(), dec!(53991.46));
    }

    #[test]
    fn additional_medicare_applies_above_single_threshold() {
        let result = annual_liability(
            &tables(),
            FilingStatus::Single,
            dec!(250000),
            dec!(0),
            dec!(0),
        );

        assert_eq!(result.additional_medicare, dec!(450.00));
        assert_eq!(result.social_security, dec!(10918.20));
    }

    #[test]
    fn income_deductions_reduce_taxable_but_not_fica_wages() {
        let with_k401 = annual_liability(
            &tables(),
            FilingStatus::Single,
            dec!(100000),
            dec!(23500),
            dec!(0),
        );

        assert_eq!(with_k401.adjusted_income, dec!(76500.00));
        assert_eq!(with_k401.fed_taxable, dec!(60750.00));
        assert_eq!(with_k401.fica_base, dec!(100000.00));
        assert_eq!(with_k401.social_security, dec!(6200.00));
    }

    #[test]
    fn cafeteria_deductions_reduce_fica_wages_but_not_sdi() {
        let result = annual_liability(
            &tables(),
            FilingStatus::Single,
            dec!(100000),
            dec!(12000),
            dec!(12000),
        );

        assert_eq!(result.fica_base, dec!(88000.00));
        assert_eq!(result.medicare, dec!(1276.00));
        // SDI stays on gross wages.
        assert_eq!(result.sdi, dec!(1200.00));
    }

    #[test]
    fn deductions_larger_than_gross_clamp_to_zero() {
        let result = annual_liability(
            &tables(),
            FilingStatus::Single,
            dec!(10000),
            dec!(50000),
            dec!(50000),
        );

        assert_eq!(result.adjusted_income, dec!(0.00));
        assert_eq!(result.fed_tax, dec!(0.00));
        assert_eq!(result.fica_base, dec!(0.00));
        assert_eq!(result.social_security, dec!(0.00));
        assert_eq!(result.sdi, dec!(120.00));
    }

    #[test]
    fn sdi_wage_cap_binds_when_configured() {
        let mut tables = tables();
        tables.fica.sdi_wage_cap = Some(dec!(50000));

        let result = annual_liability(
            &tables,
            FilingStatus::Single,
            dec!(100000),
            dec!(0),
            dec!(0),
        );

        assert_eq!(result.sdi, dec!(600.00));
    }

    #[test]
    fn zero_gross_produces_all_zero_liability() {
        let result = annual_liability(
            &tables(),
            FilingStatus::Single,
            dec!(0),
            dec!(0),
            dec!(0),
        );

        assert_eq!(result.total(), dec!(0.00));
    }
}
