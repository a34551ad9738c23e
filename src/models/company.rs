//! Company inputs and portfolio results.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ComparativeTaxReport, Currency, Jurisdiction, ensure_amount};
use crate::error::EngineResult;

/// A company's annual figures for corporate tax.
///
/// `passive_income` only matters where a concession depends on it (the
/// Australian base rate entity test) and defaults to zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyFinancials {
    /// Annual revenue (turnover).
    pub revenue: Decimal,
    /// Taxable profit.
    pub profit: Decimal,
    /// Passive income included in revenue.
    #[serde(default)]
    pub passive_income: Decimal,
}

impl CompanyFinancials {
    /// Creates financials with no passive income.
    pub fn new(revenue: Decimal, profit: Decimal) -> Self {
        Self {
            revenue,
            profit,
            passive_income: Decimal::ZERO,
        }
    }

    /// Rejects any negative or oversized figure.
    pub fn validate(&self) -> EngineResult<()> {
        ensure_amount("revenue", self.revenue)?;
        ensure_amount("profit", self.profit)?;
        ensure_amount("passive_income", self.passive_income)
    }

    /// Passive income as a percentage of revenue.
    ///
    /// With zero revenue, any passive income counts as 100%.
    pub fn passive_income_percent(&self) -> Decimal {
        if self.revenue > Decimal::ZERO {
            self.passive_income / self.revenue * Decimal::ONE_HUNDRED
        } else if self.passive_income > Decimal::ZERO {
            Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        }
    }
}

/// One client company in a portfolio batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    /// Caller-assigned identifier, echoed in the outcome.
    pub company_id: String,
    /// Where the company is taxed.
    pub jurisdiction: Jurisdiction,
    /// The company's figures.
    pub financials: CompanyFinancials,
}

/// The corporate report for one portfolio company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyTaxOutcome {
    /// The company's identifier.
    pub company_id: String,
    /// The company's revenue, carried for aggregation.
    pub revenue: Decimal,
    /// The corporate tax report.
    pub report: ComparativeTaxReport,
}

/// Portfolio figures for all companies in one jurisdiction.
///
/// Totals are kept per jurisdiction so amounts in different currencies are
/// never added together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JurisdictionTotal {
    /// The jurisdiction.
    pub jurisdiction: Jurisdiction,
    /// Currency of the totals.
    pub currency: Currency,
    /// Number of companies.
    pub companies: usize,
    /// Sum of revenue.
    pub total_revenue: Decimal,
    /// Sum of tax payable.
    pub total_tax_payable: Decimal,
}

/// The result of a portfolio batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    /// One outcome per company, in input order.
    pub companies: Vec<CompanyTaxOutcome>,
    /// Totals per jurisdiction, ordered by jurisdiction.
    pub totals: Vec<JurisdictionTotal>,
}
