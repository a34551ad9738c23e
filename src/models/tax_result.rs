//! Tax calculation result models.
//!
//! This module contains [`TaxCalculationResult`], the per-regime figures,
//! and [`ComparativeTaxReport`], which pairs two results with a regime
//! recommendation. Each result carries an ordered audit trace of the rules
//! applied.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{EntityType, Jurisdiction, RecommendedRegime, Regime};

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// Statutory reference for this rule, when one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// The computed figures for one regime.
///
/// Invariants: `taxable_income = max(0, gross_income - total_deductions)`,
/// `tax_payable = base_tax + surcharge + cess` and `tax_payable >= 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxCalculationResult {
    /// The regime these figures were computed under.
    pub regime: Regime,
    /// Total income before deductions (profit, for companies).
    pub gross_income: Decimal,
    /// Standard plus permitted itemized deductions.
    pub total_deductions: Decimal,
    /// Income the slabs or corporate rate are applied to.
    pub taxable_income: Decimal,
    /// Tax from slabs or the corporate rate, after any rebate.
    pub base_tax: Decimal,
    /// Surcharge on the base tax.
    pub surcharge: Decimal,
    /// Cess on base tax plus surcharge.
    pub cess: Decimal,
    /// Final liability.
    pub tax_payable: Decimal,
    /// `tax_payable` as a percentage of gross income (revenue for
    /// companies), two decimal places; zero when the denominator is zero.
    pub effective_rate: Decimal,
    /// The rules applied, in order.
    pub steps: Vec<AuditStep>,
}

/// Two regime results side by side with a recommendation.
///
/// When only one regime applies, `old_regime` and `new_regime` are identical
/// and `recommended_regime` is [`RecommendedRegime::NotApplicable`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparativeTaxReport {
    /// The jurisdiction the report was computed for.
    pub jurisdiction: Jurisdiction,
    /// Individual or company.
    pub entity_type: EntityType,
    /// Old Regime figures (or the single regime).
    pub old_regime: TaxCalculationResult,
    /// New Regime figures (or the single regime).
    pub new_regime: TaxCalculationResult,
    /// Which regime to elect.
    pub recommended_regime: RecommendedRegime,
    /// Why that regime was recommended.
    pub reason: String,
    /// Advisory suggestions for reducing liability.
    pub optimization_tips: Vec<String>,
}

impl ComparativeTaxReport {
    /// Returns the result for the recommended regime.
    ///
    /// For single-regime reports both halves are the same, so either is
    /// returned.
    pub fn recommended(&self) -> &TaxCalculationResult {
        match self.recommended_regime {
            RecommendedRegime::Old => &self.old_regime,
            RecommendedRegime::New | RecommendedRegime::NotApplicable => &self.new_regime,
        }
    }

    /// Returns true when the two halves describe different regimes.
    pub fn is_dual_regime(&self) -> bool {
        self.recommended_regime != RecommendedRegime::NotApplicable
    }
}
