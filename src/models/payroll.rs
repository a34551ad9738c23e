//! Payroll breakdown model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Monthly earning components of a salary structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryComponents {
    /// Basic salary.
    pub basic: Decimal,
    /// House rent allowance.
    pub hra: Decimal,
    /// Residual allowance balancing the structure to CTC.
    pub special_allowance: Decimal,
    /// Other fixed allowances.
    pub other_allowances: Decimal,
}

impl SalaryComponents {
    /// Returns the sum of all components.
    pub fn total(&self) -> Decimal {
        self.basic + self.hra + self.special_allowance + self.other_allowances
    }
}

/// Monthly statutory amounts: provident fund and state insurance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatutoryAmounts {
    /// Employees' Provident Fund.
    pub provident_fund: Decimal,
    /// Employees' State Insurance.
    pub state_insurance: Decimal,
}

impl StatutoryAmounts {
    /// Returns the sum of both amounts.
    pub fn total(&self) -> Decimal {
        self.provident_fund + self.state_insurance
    }
}

/// The decomposition of an annual CTC into monthly pay.
///
/// Invariant: `monthly.total()`, `gross_monthly` and `ctc / 12` agree to
/// within decimal division precision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollBreakdown {
    /// Annual cost to company.
    pub ctc: Decimal,
    /// Basic salary as a percentage of CTC.
    pub basic_percent: Decimal,
    /// HRA as a percentage of basic.
    pub hra_percent: Decimal,
    /// Monthly earning components.
    pub monthly: SalaryComponents,
    /// Whether gross monthly pay is within the state-insurance threshold.
    pub esi_applicable: bool,
    /// Monthly deductions from the employee's pay.
    pub employee_deductions: StatutoryAmounts,
    /// Monthly contributions paid by the employer.
    pub employer_contributions: StatutoryAmounts,
    /// Gross monthly pay.
    pub gross_monthly: Decimal,
    /// Total monthly employee deductions.
    pub total_deductions: Decimal,
    /// Take-home pay per month.
    pub net_salary: Decimal,
    /// Gross monthly pay plus employer contributions.
    pub employer_cost: Decimal,
}
