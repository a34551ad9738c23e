//! Income and deduction inputs for the personal tax calculator.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A taxpayer's annual income by source.
///
/// All fields default to zero and are in the jurisdiction's base currency
/// unit.
///
/// # Example
///
/// ```
/// use tax_engine::models::IncomeProfile;
/// use rust_decimal::Decimal;
///
/// let income = IncomeProfile {
///     salary: Decimal::from(800_000),
///     other_income: Decimal::from(20_000),
///     ..Default::default()
/// };
/// assert_eq!(income.gross_income(), Decimal::from(820_000));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncomeProfile {
    /// Salary income.
    pub salary: Decimal,
    /// Business or professional income.
    pub business_income: Decimal,
    /// Capital gains.
    pub capital_gains: Decimal,
    /// Income from other sources.
    pub other_income: Decimal,
}

impl IncomeProfile {
    /// Returns the sum of all income fields.
    pub fn gross_income(&self) -> Decimal {
        self.salary + self.business_income + self.capital_gains + self.other_income
    }

    /// Rejects any negative or oversized field.
    pub fn validate(&self) -> EngineResult<()> {
        ensure_amount("salary", self.salary)?;
        ensure_amount("business_income", self.business_income)?;
        ensure_amount("capital_gains", self.capital_gains)?;
        ensure_amount("other_income", self.other_income)
    }
}

/// Itemized deductions claimed by a taxpayer.
///
/// Only regimes that permit itemized deductions use these, and the capped
/// sections are clamped to the rule table's ceilings before use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeductionProfile {
    /// Section 80C investments (PPF, ELSS, life insurance, ...).
    pub section_80c: Decimal,
    /// Section 80D health insurance premiums.
    pub section_80d: Decimal,
    /// House rent allowance exemption.
    pub hra: Decimal,
    /// Any other deductions.
    pub other_deductions: Decimal,
}

impl DeductionProfile {
    /// Rejects any negative or oversized field.
    pub fn validate(&self) -> EngineResult<()> {
        ensure_amount("section_80c", self.section_80c)?;
        ensure_amount("section_80d", self.section_80d)?;
        ensure_amount("hra", self.hra)?;
        ensure_amount("other_deductions", self.other_deductions)
    }

    /// Returns a copy with the capped sections clamped to their ceilings.
    ///
    /// A `None` cap leaves the section unclamped.
    pub fn clamped(&self, cap_80c: Option<Decimal>, cap_80d: Option<Decimal>) -> Self {
        Self {
            section_80c: clamp(self.section_80c, cap_80c),
            section_80d: clamp(self.section_80d, cap_80d),
            hra: self.hra,
            other_deductions: self.other_deductions,
        }
    }

    /// Returns the sum of all deduction fields.
    pub fn total(&self) -> Decimal {
        self.section_80c + self.section_80d + self.hra + self.other_deductions
    }
}

fn clamp(value: Decimal, cap: Option<Decimal>) -> Decimal {
    match cap {
        Some(cap) => value.min(cap),
        None => value,
    }
}

/// Largest accepted monetary input: one quadrillion currency units.
///
/// Below this ceiling no intermediate result of any calculator can exceed
/// [`Decimal::MAX`].
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Fails with [`EngineError::InvalidInput`] when `value` is negative or
/// above [`MAX_AMOUNT`].
pub(crate) fn ensure_amount(field: &str, value: Decimal) -> EngineResult<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(EngineError::invalid_input(field, "must not be negative"));
    }
    if value > MAX_AMOUNT {
        return Err(EngineError::invalid_input(
            field,
            format!("must not exceed {}", MAX_AMOUNT),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_income_defaults_to_zero() {
        let income = IncomeProfile::default();
        assert_eq!(income.gross_income(), Decimal::ZERO);
    }

    #[test]
    fn test_gross_income_sums_all_fields() {
        let income = IncomeProfile {
            salary: dec("800000"),
            business_income: dec("150000"),
            capital_gains: dec("25000.50"),
            other_income: dec("4999.50"),
        };
        assert_eq!(income.gross_income(), dec("980000"));
    }

    #[test]
    fn test_negative_income_field_is_rejected() {
        let income = IncomeProfile {
            capital_gains: dec("-1"),
            ..Default::default()
        };
        match income.validate() {
            Err(EngineError::InvalidInput { field, .. }) => assert_eq!(field, "capital_gains"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_deductions_are_clamped_to_caps() {
        let deductions = DeductionProfile {
            section_80c: dec("200000"),
            section_80d: dec("40000"),
            hra: dec("120000"),
            other_deductions: dec("10000"),
        };
        let clamped = deductions.clamped(Some(dec("150000")), Some(dec("25000")));
        assert_eq!(clamped.section_80c, dec("150000"));
        assert_eq!(clamped.section_80d, dec("25000"));
        assert_eq!(clamped.hra, dec("120000"));
        assert_eq!(clamped.total(), dec("305000"));
    }

    #[test]
    fn test_uncapped_sections_pass_through() {
        let deductions = DeductionProfile {
            section_80c: dec("200000"),
            ..Default::default()
        };
        assert_eq!(deductions.clamped(None, None).section_80c, dec("200000"));
    }

    #[test]
    fn test_negative_deduction_is_rejected() {
        let deductions = DeductionProfile {
            hra: dec("-500"),
            ..Default::default()
        };
        assert!(deductions.validate().is_err());
    }

    #[test]
    fn test_max_amount_is_one_quadrillion() {
        assert_eq!(MAX_AMOUNT, Decimal::from(1_000_000_000_000_000u64));
    }

    #[test]
    fn test_amount_above_ceiling_is_rejected() {
        let income = IncomeProfile {
            salary: dec("50000000000000000000000000000"),
            business_income: dec("50000000000000000000000000000"),
            ..Default::default()
        };
        match income.validate() {
            Err(EngineError::InvalidInput { field, message }) => {
                assert_eq!(field, "salary");
                assert!(message.contains("must not exceed"));
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }

        let at_ceiling = IncomeProfile {
            other_income: MAX_AMOUNT,
            ..Default::default()
        };
        assert!(at_ceiling.validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial_profile() {
        let json = r#"{ "salary": "800000" }"#;
        let income: IncomeProfile = serde_json::from_str(json).unwrap();
        assert_eq!(income.salary, dec("800000"));
        assert_eq!(income.business_income, Decimal::ZERO);

        let json = r#"{ "section_80c": "150000", "hra": "60000" }"#;
        let deductions: DeductionProfile = serde_json::from_str(json).unwrap();
        assert_eq!(deductions.section_80c, dec("150000"));
        assert_eq!(deductions.hra, dec("60000"));
    }
}
