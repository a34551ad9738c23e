//! Corporate tax.
//!
//! Corporate tax has a single regime everywhere, so the report's two halves
//! are always identical and no regime is recommended. The rate comes from
//! the revenue tiers, optionally replaced by a base rate entity concession
//! (Australia) or adjusted by small profits marginal relief (UK). Surcharge
//! is selected by profit, and the effective rate is measured against
//! revenue.

use rust_decimal::Decimal;
use serde_json::json;
use tracing::debug;

use crate::config::{CorporateRates, RuleTables, SmallProfitsRelief};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    CompanyFinancials, ComparativeTaxReport, EntityType, Jurisdiction, Regime,
    TaxCalculationResult,
};

use super::audit::AuditLog;
use super::levies::{Levies, apply_levies};
use super::recommender::recommend;
use super::slabs::{effective_rate, percent_of};

/// Computes corporate tax from revenue and profit.
///
/// Equivalent to [`compute_company_tax`] with no passive income.
///
/// # Examples
///
/// ```
/// use tax_engine::calculation::compute_corporate_tax;
/// use tax_engine::config::ConfigLoader;
/// use tax_engine::models::{Jurisdiction, RecommendedRegime};
/// use rust_decimal::Decimal;
///
/// let config = ConfigLoader::builtin().unwrap();
/// let report = compute_corporate_tax(
///     Decimal::from(3_000_000_000u64),
///     Decimal::from(120_000_000u64),
///     Jurisdiction::India,
///     config.tables(),
/// )
/// .unwrap();
///
/// assert_eq!(report.new_regime.tax_payable, Decimal::from(34_944_000u64));
/// assert_eq!(report.recommended_regime, RecommendedRegime::NotApplicable);
/// ```
pub fn compute_corporate_tax(
    revenue: Decimal,
    profit: Decimal,
    jurisdiction: Jurisdiction,
    tables: &RuleTables,
) -> EngineResult<ComparativeTaxReport> {
    compute_company_tax(
        &CompanyFinancials::new(revenue, profit),
        jurisdiction,
        tables,
    )
}

/// Computes corporate tax for a company's full set of figures.
///
/// # Errors
///
/// - [`EngineError::InvalidInput`] if any figure is negative or above
///   [`MAX_AMOUNT`](crate::models::MAX_AMOUNT).
/// - [`EngineError::UnsupportedJurisdiction`] if the jurisdiction has no
///   company rule table.
/// - [`EngineError::ComputationInvariant`] if the company table carries no
///   corporate rates.
pub fn compute_company_tax(
    financials: &CompanyFinancials,
    jurisdiction: Jurisdiction,
    tables: &RuleTables,
) -> EngineResult<ComparativeTaxReport> {
    financials.validate()?;

    let rules = tables.rules_for(jurisdiction, EntityType::Company, Regime::Standard)?;
    let corporate = rules
        .corporate
        .as_ref()
        .ok_or_else(|| EngineError::ComputationInvariant {
            message: format!("company rule table for {} has no corporate rates", jurisdiction),
        })?;

    let mut audit = AuditLog::new(&rules.label);
    let profit = financials.profit;

    let base_tax = base_tax(corporate, financials, &mut audit)?;
    let Levies { surcharge, cess } = apply_levies(rules, "profit", profit, base_tax, &mut audit);
    let tax_payable = base_tax + surcharge + cess;

    let result = TaxCalculationResult {
        regime: Regime::Standard,
        gross_income: profit,
        total_deductions: Decimal::ZERO,
        taxable_income: profit,
        base_tax,
        surcharge,
        cess,
        tax_payable,
        effective_rate: effective_rate(tax_payable, financials.revenue),
        steps: audit.into_steps(),
    };

    debug!(
        jurisdiction = %jurisdiction,
        revenue = %financials.revenue,
        profit = %profit,
        tax_payable = %tax_payable,
        "Computed corporate tax"
    );

    let recommendation = recommend(tax_payable, tax_payable, false);
    Ok(ComparativeTaxReport {
        jurisdiction,
        entity_type: EntityType::Company,
        old_regime: result.clone(),
        new_regime: result,
        recommended_regime: recommendation.regime,
        reason: recommendation.reason,
        optimization_tips: tables.table(jurisdiction)?.corporate_tips.clone(),
    })
}

fn base_tax(
    corporate: &CorporateRates,
    financials: &CompanyFinancials,
    audit: &mut AuditLog,
) -> EngineResult<Decimal> {
    let profit = financials.profit;

    if let Some(entity) = &corporate.base_rate_entity {
        let passive_percent = financials.passive_income_percent();
        let qualifies = financials.revenue < entity.turnover_limit
            && passive_percent <= entity.max_passive_income_percent;
        audit.record(
            "base_rate_entity",
            "Base rate entity test",
            json!({
                "revenue": financials.revenue,
                "turnover_limit": entity.turnover_limit,
                "passive_income_percent": passive_percent,
                "max_passive_income_percent": entity.max_passive_income_percent,
            }),
            json!({ "qualifies": qualifies }),
            if qualifies {
                format!(
                    "Turnover below {} with passive income within {}%, so the {}% rate applies",
                    entity.turnover_limit, entity.max_passive_income_percent, entity.rate
                )
            } else {
                "Not a base rate entity, so the standard rate applies".to_string()
            },
        );
        if qualifies {
            return Ok(percent_of(profit, entity.rate));
        }
    }

    let tier = corporate
        .rate_tiers
        .iter()
        .find(|tier| tier.max_revenue.is_none_or(|max| financials.revenue <= max))
        .ok_or_else(|| EngineError::ComputationInvariant {
            message: format!("no corporate rate tier covers revenue {}", financials.revenue),
        })?;
    let main_tax = percent_of(profit, tier.rate);
    audit.record(
        "corporate_rate",
        "Corporate rate",
        json!({ "revenue": financials.revenue, "max_revenue": tier.max_revenue, "profit": profit }),
        json!({ "rate": tier.rate, "tax": main_tax }),
        match tier.max_revenue {
            Some(max) => format!("Revenue within {}, so the {}% rate applies", max, tier.rate),
            None => format!("{}% rate applies", tier.rate),
        },
    );

    Ok(match &corporate.small_profits {
        Some(relief) => small_profits_tax(relief, profit, tier.rate, main_tax, audit),
        None => main_tax,
    })
}

/// Small profits rate up to the lower limit, main rate from the upper limit,
/// and main-rate tax less marginal relief in between.
fn small_profits_tax(
    relief: &SmallProfitsRelief,
    profit: Decimal,
    main_rate: Decimal,
    main_tax: Decimal,
    audit: &mut AuditLog,
) -> Decimal {
    let (tax, reasoning) = if profit <= relief.lower_limit {
        (
            percent_of(profit, relief.small_profits_rate),
            format!(
                "Profit within {}, so the {}% small profits rate applies",
                relief.lower_limit, relief.small_profits_rate
            ),
        )
    } else if profit < relief.upper_limit {
        let marginal_relief = relief.relief_fraction * (relief.upper_limit - profit);
        (
            main_tax - marginal_relief,
            format!(
                "Profit between {} and {}: {}% main rate less marginal relief of {}",
                relief.lower_limit, relief.upper_limit, main_rate, marginal_relief
            ),
        )
    } else {
        (
            main_tax,
            format!(
                "Profit of at least {}, so no marginal relief applies",
                relief.upper_limit
            ),
        )
    };

    audit.record(
        "small_profits",
        "Small profits and marginal relief",
        json!({
            "profit": profit,
            "lower_limit": relief.lower_limit,
            "upper_limit": relief.upper_limit,
        }),
        json!({ "tax": tax }),
        reasoning,
    );
    tax
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use crate::models::{MAX_AMOUNT, RecommendedRegime};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn tables() -> RuleTables {
        ConfigLoader::builtin().unwrap().tables().clone()
    }

    #[test]
    fn test_india_company_with_surcharge() {
        // Revenue 300 crore, profit 12 crore
        let report = compute_corporate_tax(
            dec("3000000000"),
            dec("120000000"),
            Jurisdiction::India,
            &tables(),
        )
        .unwrap();

        let result = &report.new_regime;
        assert_eq!(result.base_tax, dec("30000000"));
        assert_eq!(result.surcharge, dec("3600000"));
        assert_eq!(result.cess, dec("1344000"));
        assert_eq!(result.tax_payable, dec("34944000"));
        assert_eq!(result.effective_rate, dec("1.16"));
        assert_eq!(result.gross_income, dec("120000000"));
        assert_eq!(result.total_deductions, Decimal::ZERO);

        assert_eq!(report.old_regime, report.new_regime);
        assert_eq!(report.recommended_regime, RecommendedRegime::NotApplicable);
        assert_eq!(report.entity_type, EntityType::Company);
        assert!(!report.optimization_tips.is_empty());
    }

    #[test]
    fn test_india_company_above_revenue_tier() {
        // Revenue 500 crore, profit 5 crore
        let report = compute_corporate_tax(
            dec("5000000000"),
            dec("50000000"),
            Jurisdiction::India,
            &tables(),
        )
        .unwrap();

        let result = &report.new_regime;
        assert_eq!(result.base_tax, dec("15000000"));
        assert_eq!(result.surcharge, dec("1050000"));
        // 4% of 16,050,000
        assert_eq!(result.cess, dec("642000"));
    }

    #[test]
    fn test_india_company_revenue_tier_is_inclusive() {
        let report = compute_corporate_tax(
            dec("4000000000"),
            dec("1000000"),
            Jurisdiction::India,
            &tables(),
        )
        .unwrap();
        assert_eq!(report.new_regime.base_tax, dec("250000"));
    }

    #[test]
    fn test_usa_flat_rate() {
        let report =
            compute_corporate_tax(dec("2000000"), dec("500000"), Jurisdiction::Usa, &tables())
                .unwrap();
        assert_eq!(report.new_regime.tax_payable, dec("105000"));
        assert_eq!(report.new_regime.effective_rate, dec("5.25"));
    }

    #[test]
    fn test_uk_small_profits_rate() {
        let report =
            compute_corporate_tax(dec("400000"), dec("50000"), Jurisdiction::Uk, &tables())
                .unwrap();
        assert_eq!(report.new_regime.tax_payable, dec("9500"));
    }

    #[test]
    fn test_uk_marginal_relief() {
        let report =
            compute_corporate_tax(dec("800000"), dec("100000"), Jurisdiction::Uk, &tables())
                .unwrap();
        // 25,000 less 3/200 of 150,000
        assert_eq!(report.new_regime.tax_payable, dec("22750"));
        assert!(
            report
                .new_regime
                .steps
                .iter()
                .any(|s| s.rule_id == "small_profits")
        );
    }

    #[test]
    fn test_uk_main_rate() {
        let report =
            compute_corporate_tax(dec("2000000"), dec("250000"), Jurisdiction::Uk, &tables())
                .unwrap();
        assert_eq!(report.new_regime.tax_payable, dec("62500"));
    }

    #[test]
    fn test_australia_base_rate_entity() {
        let report = compute_corporate_tax(
            dec("10000000"),
            dec("1000000"),
            Jurisdiction::Australia,
            &tables(),
        )
        .unwrap();
        assert_eq!(report.new_regime.tax_payable, dec("250000"));
    }

    #[test]
    fn test_australia_large_company() {
        let report = compute_corporate_tax(
            dec("50000000"),
            dec("1000000"),
            Jurisdiction::Australia,
            &tables(),
        )
        .unwrap();
        assert_eq!(report.new_regime.tax_payable, dec("300000"));
    }

    #[test]
    fn test_australia_passive_income_disqualifies() {
        let financials = CompanyFinancials {
            revenue: dec("10000000"),
            profit: dec("1000000"),
            passive_income: dec("8500000"),
        };
        let report = compute_company_tax(&financials, Jurisdiction::Australia, &tables()).unwrap();
        assert_eq!(report.new_regime.tax_payable, dec("300000"));
    }

    #[test]
    fn test_zero_revenue_with_profit_is_valid() {
        let report =
            compute_corporate_tax(Decimal::ZERO, dec("100000"), Jurisdiction::Usa, &tables())
                .unwrap();
        assert_eq!(report.new_regime.tax_payable, dec("21000"));
        assert_eq!(report.new_regime.effective_rate, Decimal::ZERO);
    }

    #[test]
    fn test_zero_profit_owes_nothing() {
        let report = compute_corporate_tax(
            dec("1000000"),
            Decimal::ZERO,
            Jurisdiction::India,
            &tables(),
        )
        .unwrap();
        assert_eq!(report.new_regime.tax_payable, Decimal::ZERO);
        assert_eq!(report.new_regime.cess, Decimal::ZERO);
    }

    #[test]
    fn test_negative_revenue_rejected() {
        let result =
            compute_corporate_tax(dec("-5"), dec("100"), Jurisdiction::Usa, &tables());
        match result {
            Err(EngineError::InvalidInput { field, .. }) => assert_eq!(field, "revenue"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_oversized_profit_is_rejected() {
        let result = compute_corporate_tax(
            dec("1000000"),
            dec("50000000000000000000000000000"),
            Jurisdiction::India,
            &tables(),
        );
        match result {
            Err(EngineError::InvalidInput { field, .. }) => assert_eq!(field, "profit"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_ceiling_figures_compute_everywhere() {
        for jurisdiction in Jurisdiction::ALL {
            let report =
                compute_corporate_tax(MAX_AMOUNT, MAX_AMOUNT, jurisdiction, &tables()).unwrap();
            assert!(report.new_regime.tax_payable > Decimal::ZERO);
            assert!(report.new_regime.tax_payable <= MAX_AMOUNT);
        }
    }
}
