//! Corporate tax across a portfolio of client companies.
//!
//! Each company is independent, so reports are computed in parallel with
//! [`rayon`] and joined once all have finished.

use std::collections::BTreeMap;

use rayon::prelude::*;
use rust_decimal::Decimal;
use tracing::debug;

use crate::config::RuleTables;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    CompanyProfile, CompanyTaxOutcome, Jurisdiction, JurisdictionTotal, PortfolioSummary,
};

use super::corporate_tax::compute_company_tax;

/// Computes a corporate report for every company and totals them per
/// jurisdiction.
///
/// Outcomes keep the input order. If any company fails, the whole batch
/// fails with the error of the earliest failing company.
///
/// # Examples
///
/// ```
/// use tax_engine::calculation::compute_portfolio;
/// use tax_engine::config::ConfigLoader;
/// use tax_engine::models::{CompanyFinancials, CompanyProfile, Jurisdiction};
/// use rust_decimal::Decimal;
///
/// let config = ConfigLoader::builtin().unwrap();
/// let companies = vec![CompanyProfile {
///     company_id: "acme".to_string(),
///     jurisdiction: Jurisdiction::Usa,
///     financials: CompanyFinancials::new(Decimal::from(1_000_000), Decimal::from(100_000)),
/// }];
///
/// let summary = compute_portfolio(&companies, config.tables()).unwrap();
/// assert_eq!(summary.totals[0].total_tax_payable, Decimal::from(21_000));
/// ```
pub fn compute_portfolio(
    companies: &[CompanyProfile],
    tables: &RuleTables,
) -> EngineResult<PortfolioSummary> {
    let outcomes: Vec<EngineResult<CompanyTaxOutcome>> = companies
        .par_iter()
        .map(|company| {
            compute_company_tax(&company.financials, company.jurisdiction, tables).map(|report| {
                CompanyTaxOutcome {
                    company_id: company.company_id.clone(),
                    revenue: company.financials.revenue,
                    report,
                }
            })
        })
        .collect();

    let outcomes = outcomes.into_iter().collect::<EngineResult<Vec<_>>>()?;
    let totals = totals_by_jurisdiction(&outcomes)?;

    debug!(
        companies = outcomes.len(),
        jurisdictions = totals.len(),
        "Computed portfolio"
    );

    Ok(PortfolioSummary {
        companies: outcomes,
        totals,
    })
}

fn totals_by_jurisdiction(
    outcomes: &[CompanyTaxOutcome],
) -> EngineResult<Vec<JurisdictionTotal>> {
    let mut totals: BTreeMap<Jurisdiction, JurisdictionTotal> = BTreeMap::new();
    for outcome in outcomes {
        let jurisdiction = outcome.report.jurisdiction;
        let entry = totals
            .entry(jurisdiction)
            .or_insert_with(|| JurisdictionTotal {
                jurisdiction,
                currency: jurisdiction.currency(),
                companies: 0,
                total_revenue: Decimal::ZERO,
                total_tax_payable: Decimal::ZERO,
            });
        entry.companies += 1;
        entry.total_revenue =
            checked_total(jurisdiction, "revenue", entry.total_revenue, outcome.revenue)?;
        entry.total_tax_payable = checked_total(
            jurisdiction,
            "tax payable",
            entry.total_tax_payable,
            outcome.report.recommended().tax_payable,
        )?;
    }
    Ok(totals.into_values().collect())
}

fn checked_total(
    jurisdiction: Jurisdiction,
    what: &str,
    total: Decimal,
    amount: Decimal,
) -> EngineResult<Decimal> {
    total
        .checked_add(amount)
        .ok_or_else(|| EngineError::ComputationInvariant {
            message: format!("{} total for {} overflowed", what, jurisdiction),
        })
}
