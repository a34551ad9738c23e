//! Personal income tax.
//!
//! Computes each regime an individual can be assessed under in a
//! jurisdiction and pairs them in a [`ComparativeTaxReport`].

use rust_decimal::Decimal;
use serde_json::json;
use tracing::debug;

use crate::config::{JurisdictionRuleSet, RuleTables};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    ComparativeTaxReport, DeductionProfile, EntityType, IncomeProfile, Jurisdiction, Regime,
    TaxCalculationResult,
};

use super::audit::AuditLog;
use super::recommender::recommend;
use super::levies::{Levies, apply_levies};
use super::slabs::{effective_rate, progressive_tax};

/// Computes personal tax for every regime available in `jurisdiction`.
///
/// India yields a New/Old comparison with a recommendation. Single-regime
/// jurisdictions yield the same result in both halves with
/// [`RecommendedRegime::NotApplicable`](crate::models::RecommendedRegime).
///
/// # Errors
///
/// - [`EngineError::InvalidInput`] if any income or deduction is negative
///   or above [`MAX_AMOUNT`](crate::models::MAX_AMOUNT).
/// - [`EngineError::UnsupportedJurisdiction`] if no individual rule table
///   exists for the jurisdiction.
///
/// # Examples
///
/// ```
/// use tax_engine::calculation::compute_personal_tax;
/// use tax_engine::config::ConfigLoader;
/// use tax_engine::models::{DeductionProfile, IncomeProfile, Jurisdiction, RecommendedRegime};
/// use rust_decimal::Decimal;
///
/// let config = ConfigLoader::builtin().unwrap();
/// let income = IncomeProfile { salary: Decimal::from(800_000), ..Default::default() };
/// let report = compute_personal_tax(
///     &income,
///     &DeductionProfile::default(),
///     Jurisdiction::India,
///     config.tables(),
/// )
/// .unwrap();
///
/// assert_eq!(report.new_regime.tax_payable, Decimal::from(31_200));
/// assert_eq!(report.recommended_regime, RecommendedRegime::New);
/// ```
pub fn compute_personal_tax(
    income: &IncomeProfile,
    deductions: &DeductionProfile,
    jurisdiction: Jurisdiction,
    tables: &RuleTables,
) -> EngineResult<ComparativeTaxReport> {
    income.validate()?;
    deductions.validate()?;

    let optimization_tips = tables.table(jurisdiction)?.personal_tips.clone();
    let regimes = tables.personal_regimes(jurisdiction)?;

    let report = match regimes.as_slice() {
        [Regime::New, Regime::Old] => {
            let new_rules = tables.rules_for(jurisdiction, EntityType::Individual, Regime::New)?;
            let old_rules = tables.rules_for(jurisdiction, EntityType::Individual, Regime::Old)?;
            let new_regime = compute_regime(new_rules, income, deductions);
            let old_regime = compute_regime(old_rules, income, deductions);
            let recommendation = recommend(old_regime.tax_payable, new_regime.tax_payable, true);

            ComparativeTaxReport {
                jurisdiction,
                entity_type: EntityType::Individual,
                old_regime,
                new_regime,
                recommended_regime: recommendation.regime,
                reason: recommendation.reason,
                optimization_tips,
            }
        }
        [single] => {
            let rules = tables.rules_for(jurisdiction, EntityType::Individual, *single)?;
            let result = compute_regime(rules, income, deductions);
            let recommendation = recommend(result.tax_payable, result.tax_payable, false);

            ComparativeTaxReport {
                jurisdiction,
                entity_type: EntityType::Individual,
                old_regime: result.clone(),
                new_regime: result,
                recommended_regime: recommendation.regime,
                reason: recommendation.reason,
                optimization_tips,
            }
        }
        other => {
            return Err(EngineError::ComputationInvariant {
                message: format!(
                    "unexpected individual regime set for {}: {:?}",
                    jurisdiction, other
                ),
            });
        }
    };

    debug!(
        jurisdiction = %jurisdiction,
        recommended = ?report.recommended_regime,
        tax_payable = %report.recommended().tax_payable,
        "Computed personal tax"
    );

    Ok(report)
}

/// Computes the figures for a single regime's rule set.
pub(crate) fn compute_regime(
    rules: &JurisdictionRuleSet,
    income: &IncomeProfile,
    deductions: &DeductionProfile,
) -> TaxCalculationResult {
    let mut audit = AuditLog::new(&rules.label);
    let gross_income = income.gross_income();

    let standard = standard_deduction(rules, income, &mut audit);
    let itemized = itemized_deductions(rules, deductions, &mut audit);
    let total_deductions = standard + itemized;
    let taxable_income = (gross_income - total_deductions).max(Decimal::ZERO);

    let base_tax = match rules.rebate_threshold {
        Some(threshold) if taxable_income <= threshold => {
            audit.record(
                "rebate",
                "Full rebate",
                json!({ "taxable_income": taxable_income, "rebate_threshold": threshold }),
                json!({ "base_tax": Decimal::ZERO }),
                format!(
                    "Taxable income {} does not exceed the rebate threshold {}, so no tax is due",
                    taxable_income, threshold
                ),
            );
            Decimal::ZERO
        }
        _ => {
            let slab_tax = progressive_tax(&rules.slabs, taxable_income);
            audit.record(
                "progressive_slabs",
                "Progressive slab tax",
                json!({ "taxable_income": taxable_income }),
                json!({ "slabs": slab_tax.charges, "base_tax": slab_tax.tax }),
                format!(
                    "Applied {} slab(s) to taxable income {} giving {}",
                    slab_tax.charges.len(),
                    taxable_income,
                    slab_tax.tax
                ),
            );
            slab_tax.tax
        }
    };

    let Levies { surcharge, cess } =
        apply_levies(rules, "taxable_income", taxable_income, base_tax, &mut audit);

    let tax_payable = base_tax + surcharge + cess;

    debug!(
        regime = %rules.regime,
        taxable_income = %taxable_income,
        tax_payable = %tax_payable,
        "Computed regime"
    );

    TaxCalculationResult {
        regime: rules.regime,
        gross_income,
        total_deductions,
        taxable_income,
        base_tax,
        surcharge,
        cess,
        tax_payable,
        effective_rate: effective_rate(tax_payable, gross_income),
        steps: audit.into_steps(),
    }
}

/// A salary-gated standard deduction is the lesser of the configured amount
/// and the salary itself, not the full amount for any positive salary, so a
/// small salary can never deduct more than it earns.
fn standard_deduction(
    rules: &JurisdictionRuleSet,
    income: &IncomeProfile,
    audit: &mut AuditLog,
) -> Decimal {
    let Some(standard) = &rules.standard_deduction else {
        return Decimal::ZERO;
    };

    let (amount, reasoning) = if standard.requires_salary {
        let amount = standard.amount.min(income.salary);
        let reasoning = if income.salary.is_zero() {
            "No salary income, so the standard deduction does not apply".to_string()
        } else {
            format!(
                "Lesser of the standard deduction {} and salary {}",
                standard.amount, income.salary
            )
        };
        (amount, reasoning)
    } else {
        (
            standard.amount,
            format!("Standard deduction of {} applies to all filers", standard.amount),
        )
    };

    audit.record(
        "standard_deduction",
        "Standard deduction",
        json!({ "salary": income.salary, "standard_deduction": standard.amount }),
        json!({ "deduction": amount }),
        reasoning,
    );
    amount
}

fn itemized_deductions(
    rules: &JurisdictionRuleSet,
    deductions: &DeductionProfile,
    audit: &mut AuditLog,
) -> Decimal {
    match &rules.itemized_deductions {
        Some(caps) => {
            let clamped = deductions.clamped(caps.section_80c_cap, caps.section_80d_cap);
            audit.record(
                "itemized_deductions",
                "Itemized deductions",
                json!({ "claimed": deductions, "section_80c_cap": caps.section_80c_cap, "section_80d_cap": caps.section_80d_cap }),
                json!({ "allowed": clamped, "total": clamped.total() }),
                if clamped == *deductions {
                    format!("All claimed deductions allowed, totalling {}", clamped.total())
                } else {
                    format!(
                        "Claims clamped to their statutory caps, allowing {}",
                        clamped.total()
                    )
                },
            );
            clamped.total()
        }
        None => {
            if deductions.total() > Decimal::ZERO {
                audit.record(
                    "itemized_deductions",
                    "Itemized deductions",
                    json!({ "claimed": deductions }),
                    json!({ "total": Decimal::ZERO }),
                    format!("{} does not permit itemized deductions", rules.label),
                );
            }
            Decimal::ZERO
        }
    }
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

    fn salary(amount: &str) -> IncomeProfile {
        IncomeProfile {
            salary: dec(amount),
            ..Default::default()
        }
    }

    #[test]
    fn test_india_salary_800k() {
        let report = compute_personal_tax(
            &salary("800000"),
            &DeductionProfile::default(),
            Jurisdiction::India,
            &tables(),
        )
        .unwrap();

        let new = &report.new_regime;
        assert_eq!(new.regime, Regime::New);
        assert_eq!(new.total_deductions, dec("50000"));
        assert_eq!(new.taxable_income, dec("750000"));
        assert_eq!(new.base_tax, dec("30000"));
        assert_eq!(new.cess, dec("1200"));
        assert_eq!(new.tax_payable, dec("31200"));
        assert_eq!(new.effective_rate, dec("3.90"));

        let old = &report.old_regime;
        assert_eq!(old.regime, Regime::Old);
        assert_eq!(old.total_deductions, dec("50000"));
        assert_eq!(old.taxable_income, dec("750000"));
        assert_eq!(old.base_tax, dec("62500"));
        assert_eq!(old.tax_payable, dec("65000"));

        assert_eq!(report.recommended_regime, RecommendedRegime::New);
        assert_eq!(report.entity_type, EntityType::Individual);
        assert!((3..=5).contains(&report.optimization_tips.len()));
    }

    #[test]
    fn test_rebate_yields_zero_tax_without_cess() {
        let report = compute_personal_tax(
            &salary("750000"),
            &DeductionProfile::default(),
            Jurisdiction::India,
            &tables(),
        )
        .unwrap();

        // 700,000 taxable sits exactly on the New Regime rebate threshold
        assert_eq!(report.new_regime.taxable_income, dec("700000"));
        assert_eq!(report.new_regime.tax_payable, Decimal::ZERO);
        assert_eq!(report.new_regime.cess, Decimal::ZERO);
        assert!(report.new_regime.steps.iter().any(|s| s.rule_id == "rebate"));
    }

    #[test]
    fn test_standard_deduction_requires_salary() {
        let income = IncomeProfile {
            business_income: dec("1000000"),
            ..Default::default()
        };
        let report = compute_personal_tax(
            &income,
            &DeductionProfile::default(),
            Jurisdiction::India,
            &tables(),
        )
        .unwrap();

        assert_eq!(report.new_regime.total_deductions, Decimal::ZERO);
        assert_eq!(report.new_regime.taxable_income, dec("1000000"));
        // 15,000 + 30,000 + 15,000 on slabs, plus 4% cess
        assert_eq!(report.new_regime.tax_payable, dec("62400"));
    }

    #[test]
    fn test_standard_deduction_limited_to_salary() {
        let income = IncomeProfile {
            salary: dec("20000"),
            business_income: dec("900000"),
            ..Default::default()
        };
        let report = compute_personal_tax(
            &income,
            &DeductionProfile::default(),
            Jurisdiction::India,
            &tables(),
        )
        .unwrap();

        assert_eq!(report.new_regime.total_deductions, dec("20000"));
    }

    #[test]
    fn test_old_regime_clamps_80c_and_80d() {
        let deductions = DeductionProfile {
            section_80c: dec("200000"),
            section_80d: dec("40000"),
            hra: dec("60000"),
            other_deductions: Decimal::ZERO,
        };
        let report = compute_personal_tax(
            &salary("1500000"),
            &deductions,
            Jurisdiction::India,
            &tables(),
        )
        .unwrap();

        // 50,000 standard + 150,000 + 25,000 + 60,000
        assert_eq!(report.old_regime.total_deductions, dec("285000"));
        assert_eq!(report.old_regime.taxable_income, dec("1215000"));
        // 112,500 + 30% of 215,000 = 177,000, plus 4% cess
        assert_eq!(report.old_regime.tax_payable, dec("184080"));

        // New Regime ignores itemized deductions
        assert_eq!(report.new_regime.total_deductions, dec("50000"));
        // 15k + 30k + 45k + 20% of 250k = 140,000, plus cess
        assert_eq!(report.new_regime.tax_payable, dec("145600"));
        assert_eq!(report.recommended_regime, RecommendedRegime::New);
    }

    #[test]
    fn test_old_regime_recommended_with_large_deductions() {
        let deductions = DeductionProfile {
            section_80c: dec("150000"),
            section_80d: dec("25000"),
            hra: dec("300000"),
            other_deductions: dec("100000"),
        };
        let report = compute_personal_tax(
            &salary("1100000"),
            &deductions,
            Jurisdiction::India,
            &tables(),
        )
        .unwrap();

        // Old: 1,100,000 - 625,000 = 475,000, within the rebate
        assert_eq!(report.old_regime.tax_payable, Decimal::ZERO);
        assert!(report.new_regime.tax_payable > Decimal::ZERO);
        assert_eq!(report.recommended_regime, RecommendedRegime::Old);
    }

    #[test]
    fn test_zero_income_ties_to_new_regime() {
        let report = compute_personal_tax(
            &IncomeProfile::default(),
            &DeductionProfile::default(),
            Jurisdiction::India,
            &tables(),
        )
        .unwrap();

        assert_eq!(report.old_regime.tax_payable, Decimal::ZERO);
        assert_eq!(report.new_regime.tax_payable, Decimal::ZERO);
        assert_eq!(report.new_regime.effective_rate, Decimal::ZERO);
        assert_eq!(report.recommended_regime, RecommendedRegime::New);
    }

    #[test]
    fn test_usa_single_regime_twin() {
        let report = compute_personal_tax(
            &salary("100000"),
            &DeductionProfile::default(),
            Jurisdiction::Usa,
            &tables(),
        )
        .unwrap();

        assert_eq!(report.old_regime, report.new_regime);
        assert_eq!(report.recommended_regime, RecommendedRegime::NotApplicable);
        assert_eq!(report.reason, super::super::recommender::SINGLE_REGIME_REASON);

        let result = &report.new_regime;
        assert_eq!(result.regime, Regime::Standard);
        assert_eq!(result.taxable_income, dec("86150"));
        // 1,100 + 4,047 + 22% of (86,150 - 44,725)
        assert_eq!(result.tax_payable, dec("14260.50"));
        assert_eq!(result.cess, Decimal::ZERO);
    }

    #[test]
    fn test_uk_bands() {
        let report = compute_personal_tax(
            &salary("60000"),
            &DeductionProfile::default(),
            Jurisdiction::Uk,
            &tables(),
        )
        .unwrap();

        // 20% of 37,700 + 40% of 9,730
        assert_eq!(report.new_regime.tax_payable, dec("11432"));
        assert_eq!(report.recommended_regime, RecommendedRegime::NotApplicable);
    }

    #[test]
    fn test_australia_slabs() {
        let report = compute_personal_tax(
            &salary("100000"),
            &DeductionProfile::default(),
            Jurisdiction::Australia,
            &tables(),
        )
        .unwrap();

        // 19% of 26,800 + 32.5% of 55,000
        assert_eq!(report.new_regime.tax_payable, dec("22967"));
    }

    #[test]
    fn test_negative_income_rejected() {
        let result = compute_personal_tax(
            &salary("-1"),
            &DeductionProfile::default(),
            Jurisdiction::India,
            &tables(),
        );

        match result {
            Err(EngineError::InvalidInput { field, .. }) => assert_eq!(field, "salary"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_deduction_rejected() {
        let deductions = DeductionProfile {
            hra: dec("-500"),
            ..Default::default()
        };
        let result = compute_personal_tax(
            &salary("500000"),
            &deductions,
            Jurisdiction::India,
            &tables(),
        );

        match result {
            Err(EngineError::InvalidInput { field, .. }) => assert_eq!(field, "hra"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_audit_trace_records_each_rule() {
        let report = compute_personal_tax(
            &salary("800000"),
            &DeductionProfile::default(),
            Jurisdiction::India,
            &tables(),
        )
        .unwrap();

        let rule_ids: Vec<&str> = report
            .new_regime
            .steps
            .iter()
            .map(|s| s.rule_id.as_str())
            .collect();
        assert_eq!(rule_ids, vec!["standard_deduction", "progressive_slabs", "cess"]);
        assert!(report.new_regime.steps.iter().all(|s| s.reference.is_some()));
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let tables = tables();
        let income = salary("1234567");
        let deductions = DeductionProfile {
            section_80c: dec("100000"),
            ..Default::default()
        };
        let first = compute_personal_tax(&income, &deductions, Jurisdiction::India, &tables);
        let second = compute_personal_tax(&income, &deductions, Jurisdiction::India, &tables);
        assert_eq!(first.unwrap(), second.unwrap());
    }

    #[test]
    fn test_oversized_income_is_rejected() {
        let income = IncomeProfile {
            salary: dec("50000000000000000000000000000"),
            business_income: dec("50000000000000000000000000000"),
            ..Default::default()
        };
        let result = compute_personal_tax(
            &income,
            &DeductionProfile::default(),
            Jurisdiction::India,
            &tables(),
        );
        match result {
            Err(EngineError::InvalidInput { field, .. }) => assert_eq!(field, "salary"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_income_at_ceiling_in_every_field() {
        let income = IncomeProfile {
            salary: MAX_AMOUNT,
            business_income: MAX_AMOUNT,
            capital_gains: MAX_AMOUNT,
            other_income: MAX_AMOUNT,
        };
        for jurisdiction in Jurisdiction::ALL {
            let report =
                compute_personal_tax(&income, &DeductionProfile::default(), jurisdiction, &tables())
                    .unwrap();
            assert!(report.new_regime.tax_payable > Decimal::ZERO);
            assert!(report.new_regime.tax_payable < report.new_regime.gross_income);
        }
    }
}
