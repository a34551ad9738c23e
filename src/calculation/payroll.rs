//! Indian payroll statutory deductions.
//!
//! Splits an annual CTC into monthly components and applies provident fund
//! (on basic, up to the wage ceiling) and state insurance (on gross, only at
//! or below the wage threshold).

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::{PercentRange, RuleTables};
use crate::error::{EngineError, EngineResult};
use crate::models::{PayrollBreakdown, SalaryComponents, StatutoryAmounts, ensure_amount};

use super::slabs::percent_of;

const MONTHS: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Decomposes an annual CTC into monthly pay and statutory amounts.
///
/// `basic_percent` is a percentage of CTC and `hra_percent` a percentage of
/// basic; `other_allowances` is annual. Amounts keep full precision.
///
/// # Errors
///
/// - [`EngineError::InvalidInput`] if CTC is not positive, CTC or other
///   allowances exceed [`MAX_AMOUNT`](crate::models::MAX_AMOUNT), a
///   percentage is outside its permitted range, or other allowances are
///   negative.
/// - [`EngineError::ComputationInvariant`] if the components exceed CTC,
///   leaving a negative special allowance.
///
/// # Examples
///
/// ```
/// use tax_engine::calculation::compute_payroll;
/// use tax_engine::config::ConfigLoader;
/// use rust_decimal::Decimal;
///
/// let config = ConfigLoader::builtin().unwrap();
/// let payroll = compute_payroll(
///     Decimal::from(1_200_000),
///     Decimal::from(50),
///     Decimal::from(40),
///     Decimal::ZERO,
///     config.tables(),
/// )
/// .unwrap();
///
/// assert_eq!(payroll.gross_monthly, Decimal::from(100_000));
/// assert_eq!(payroll.employee_deductions.provident_fund, Decimal::from(1_800));
/// assert!(!payroll.esi_applicable);
/// ```
pub fn compute_payroll(
    ctc: Decimal,
    basic_percent: Decimal,
    hra_percent: Decimal,
    other_allowances: Decimal,
    tables: &RuleTables,
) -> EngineResult<PayrollBreakdown> {
    let rules = tables.payroll();

    if ctc <= Decimal::ZERO {
        return Err(EngineError::invalid_input("ctc", "must be greater than zero"));
    }
    ensure_amount("ctc", ctc)?;
    ensure_within("basic_percent", basic_percent, &rules.basic_percent)?;
    ensure_within("hra_percent", hra_percent, &rules.hra_percent)?;
    ensure_amount("other_allowances", other_allowances)?;

    let annual_basic = percent_of(ctc, basic_percent);
    let annual_hra = percent_of(annual_basic, hra_percent);
    let special_allowance = ctc - annual_basic - annual_hra - other_allowances;
    if special_allowance.is_sign_negative() && !special_allowance.is_zero() {
        return Err(EngineError::ComputationInvariant {
            message: format!(
                "special allowance would be negative ({}): basic, HRA and other allowances exceed CTC {}",
                special_allowance, ctc
            ),
        });
    }

    let monthly = SalaryComponents {
        basic: annual_basic / MONTHS,
        hra: annual_hra / MONTHS,
        special_allowance: special_allowance / MONTHS,
        other_allowances: other_allowances / MONTHS,
    };
    let gross_monthly = (annual_basic + annual_hra + special_allowance + other_allowances) / MONTHS;

    let pf = &rules.provident_fund;
    let pf_wages = annual_basic.min(pf.wage_ceiling_monthly * MONTHS);
    let pf_employee = percent_of(pf_wages, pf.employee_rate) / MONTHS;
    let pf_employer = percent_of(pf_wages, pf.employer_rate) / MONTHS;

    let esi = &rules.state_insurance;
    let esi_applicable = gross_monthly <= esi.wage_threshold_monthly;
    let (esi_employee, esi_employer) = if esi_applicable {
        (
            percent_of(gross_monthly, esi.employee_rate),
            percent_of(gross_monthly, esi.employer_rate),
        )
    } else {
        (Decimal::ZERO, Decimal::ZERO)
    };

    let employee_deductions = StatutoryAmounts {
        provident_fund: pf_employee,
        state_insurance: esi_employee,
    };
    let employer_contributions = StatutoryAmounts {
        provident_fund: pf_employer,
        state_insurance: esi_employer,
    };
    let total_deductions = employee_deductions.total();

    debug!(
        ctc = %ctc,
        gross_monthly = %gross_monthly,
        esi_applicable,
        "Computed payroll"
    );

    Ok(PayrollBreakdown {
        ctc,
        basic_percent,
        hra_percent,
        monthly,
        esi_applicable,
        net_salary: gross_monthly - total_deductions,
        employer_cost: gross_monthly + employer_contributions.total(),
        employee_deductions,
        employer_contributions,
        gross_monthly,
        total_deductions,
    })
}

fn ensure_within(field: &str, value: Decimal, range: &PercentRange) -> EngineResult<()> {
    if range.contains(value) {
        Ok(())
    } else {
        Err(EngineError::invalid_input(
            field,
            format!("must be between {} and {}", range.min, range.max),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn tables() -> RuleTables {
        ConfigLoader::builtin().unwrap().tables().clone()
    }

    #[test]
    fn test_high_salary_above_esi_threshold() {
        let payroll =
            compute_payroll(dec("1200000"), dec("50"), dec("40"), Decimal::ZERO, &tables())
                .unwrap();

        assert_eq!(payroll.monthly.basic, dec("50000"));
        assert_eq!(payroll.monthly.hra, dec("20000"));
        assert_eq!(payroll.monthly.special_allowance, dec("30000"));
        assert_eq!(payroll.gross_monthly, dec("100000"));

        // PF on the 15,000 ceiling
        assert_eq!(payroll.employee_deductions.provident_fund, dec("1800"));
        assert_eq!(payroll.employer_contributions.provident_fund, dec("1800"));
        assert!(!payroll.esi_applicable);
        assert_eq!(payroll.employee_deductions.state_insurance, Decimal::ZERO);

        assert_eq!(payroll.net_salary, dec("98200"));
        assert_eq!(payroll.employer_cost, dec("101800"));
    }

    #[test]
    fn test_low_salary_with_esi() {
        let payroll =
            compute_payroll(dec("240000"), dec("40"), dec("50"), dec("12000"), &tables())
                .unwrap();

        assert_eq!(payroll.monthly.special_allowance, dec("7000"));
        assert_eq!(payroll.monthly.other_allowances, dec("1000"));
        assert_eq!(payroll.gross_monthly, dec("20000"));

        // PF on actual basic, below the ceiling
        assert_eq!(payroll.employee_deductions.provident_fund, dec("960"));
        assert!(payroll.esi_applicable);
        assert_eq!(payroll.employee_deductions.state_insurance, dec("150"));
        assert_eq!(payroll.employer_contributions.state_insurance, dec("650"));

        assert_eq!(payroll.total_deductions, dec("1110"));
        assert_eq!(payroll.net_salary, dec("18890"));
        assert_eq!(payroll.employer_cost, dec("21610"));
    }

    #[test]
    fn test_esi_threshold_is_inclusive() {
        let payroll =
            compute_payroll(dec("252000"), dec("50"), dec("50"), Decimal::ZERO, &tables())
                .unwrap();
        assert_eq!(payroll.gross_monthly, dec("21000"));
        assert!(payroll.esi_applicable);
    }

    #[test]
    fn test_components_sum_to_monthly_ctc() {
        let payroll =
            compute_payroll(dec("987654"), dec("45"), dec("35"), dec("24000"), &tables())
                .unwrap();
        let diff = (payroll.monthly.total() - dec("987654") / dec("12")).abs();
        assert!(diff < dec("0.0000000001"), "diff: {}", diff);
    }

    #[test]
    fn test_negative_special_allowance_fails() {
        let result =
            compute_payroll(dec("100000"), dec("60"), dec("100"), Decimal::ZERO, &tables());
        match result {
            Err(EngineError::ComputationInvariant { message }) => {
                assert!(message.contains("special allowance"));
            }
            other => panic!("Expected ComputationInvariant, got {:?}", other),
        }
    }

    #[test]
    fn test_other_allowances_can_exhaust_special_allowance() {
        let result =
            compute_payroll(dec("100000"), dec("30"), dec("0"), dec("80000"), &tables());
        match result {
            Err(EngineError::ComputationInvariant { .. }) => {}
            other => panic!("Expected ComputationInvariant, got {:?}", other),
        }

        let payroll =
            compute_payroll(dec("100000"), dec("30"), dec("0"), dec("70000"), &tables()).unwrap();
        assert_eq!(payroll.monthly.special_allowance, Decimal::ZERO);
    }

    #[test]
    fn test_non_positive_ctc_rejected() {
        for ctc in ["0", "-100"] {
            let result = compute_payroll(dec(ctc), dec("50"), dec("40"), Decimal::ZERO, &tables());
            match result {
                Err(EngineError::InvalidInput { field, .. }) => assert_eq!(field, "ctc"),
                other => panic!("Expected InvalidInput, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_percentages_out_of_bounds() {
        let result =
            compute_payroll(dec("600000"), dec("25"), dec("40"), Decimal::ZERO, &tables());
        match result {
            Err(EngineError::InvalidInput { field, message }) => {
                assert_eq!(field, "basic_percent");
                assert_eq!(message, "must be between 30 and 60");
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }

        let result =
            compute_payroll(dec("600000"), dec("40"), dec("101"), Decimal::ZERO, &tables());
        match result {
            Err(EngineError::InvalidInput { field, .. }) => assert_eq!(field, "hra_percent"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_other_allowances_rejected() {
        let result =
            compute_payroll(dec("600000"), dec("40"), dec("40"), dec("-1"), &tables());
        match result {
            Err(EngineError::InvalidInput { field, .. }) => assert_eq!(field, "other_allowances"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_oversized_ctc_is_rejected() {
        let result = compute_payroll(
            dec("50000000000000000000000000000"),
            dec("50"),
            dec("40"),
            Decimal::ZERO,
            &tables(),
        );
        match result {
            Err(EngineError::InvalidInput { field, .. }) => assert_eq!(field, "ctc"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }
}
