//! Rule-table types.
//!
//! This module contains the strongly-typed structures deserialized from the
//! YAML rule tables, and [`RuleTables`], the validated set the calculators
//! look rules up in. Rates are percentages (`30` means 30%).

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{EngineError, EngineResult};
use crate::models::{EntityType, Jurisdiction, Regime};

/// Metadata about the rule-table version.
#[derive(Debug, Clone, Deserialize)]
pub struct FiscalYearMetadata {
    /// The fiscal year label (e.g., "2023-24").
    pub fiscal_year: String,
    /// A description of the rule-table set.
    pub description: String,
    /// First day the tables apply to.
    pub effective_from: NaiveDate,
    /// Last day the tables apply to.
    pub effective_to: NaiveDate,
}

/// One bracket of a progressive table.
///
/// `upper` is `None` for the final, unbounded slab.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Slab {
    /// Inclusive lower bound of the bracket.
    pub lower: Decimal,
    /// Upper bound of the bracket, if any.
    #[serde(default)]
    pub upper: Option<Decimal>,
    /// Marginal rate for income within the bracket.
    pub rate: Decimal,
}

/// A standard deduction available under a regime.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StandardDeduction {
    /// Maximum deduction amount.
    pub amount: Decimal,
    /// Whether the deduction is available only against salary income.
    ///
    /// Salary-gated deductions are limited to the salary itself.
    #[serde(default)]
    pub requires_salary: bool,
}

/// Ceilings on itemized deductions for regimes that allow them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ItemizedDeductionCaps {
    /// Ceiling on Section 80C.
    #[serde(default)]
    pub section_80c_cap: Option<Decimal>,
    /// Ceiling on Section 80D.
    #[serde(default)]
    pub section_80d_cap: Option<Decimal>,
}

/// An additional percentage of base tax above an income/profit threshold.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SurchargeTier {
    /// The tier applies when the basis strictly exceeds this amount.
    pub threshold: Decimal,
    /// Surcharge as a percentage of base tax.
    pub rate: Decimal,
}

/// A corporate rate applying up to a revenue ceiling.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RevenueRateTier {
    /// Highest revenue (inclusive) the tier covers; `None` for the last tier.
    #[serde(default)]
    pub max_revenue: Option<Decimal>,
    /// Corporate rate for the tier.
    pub rate: Decimal,
}

/// Small profits rate with marginal relief (UK).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SmallProfitsRelief {
    /// Profits up to this amount pay the small profits rate.
    pub lower_limit: Decimal,
    /// Profits from this amount pay the main rate without relief.
    pub upper_limit: Decimal,
    /// The small profits rate.
    pub small_profits_rate: Decimal,
    /// Marginal relief fraction applied to `upper_limit - profit`.
    pub relief_fraction: Decimal,
}

/// Lower rate for base rate entities (Australia).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BaseRateEntity {
    /// Turnover must be strictly below this amount.
    pub turnover_limit: Decimal,
    /// Passive income may be at most this percentage of turnover.
    pub max_passive_income_percent: Decimal,
    /// The base rate entity rate.
    pub rate: Decimal,
}

/// Corporate rate structure for a jurisdiction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CorporateRates {
    /// Rate tiers by revenue, ascending.
    pub rate_tiers: Vec<RevenueRateTier>,
    /// Small profits rate and marginal relief, where applicable.
    #[serde(default)]
    pub small_profits: Option<SmallProfitsRelief>,
    /// Base rate entity concession, where applicable.
    #[serde(default)]
    pub base_rate_entity: Option<BaseRateEntity>,
}

/// The rules for one entity type and regime within a jurisdiction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JurisdictionRuleSet {
    /// Individual or company.
    pub entity_type: EntityType,
    /// The regime these rules describe.
    pub regime: Regime,
    /// Display label (e.g., "New Regime (Section 115BAC)").
    pub label: String,
    /// Progressive slabs (individuals only).
    #[serde(default)]
    pub slabs: Vec<Slab>,
    /// Taxable income at or below this amount pays no tax.
    #[serde(default)]
    pub rebate_threshold: Option<Decimal>,
    /// Standard deduction, if any.
    #[serde(default)]
    pub standard_deduction: Option<StandardDeduction>,
    /// Itemized deduction ceilings; `None` means itemized deductions are
    /// not permitted under this regime.
    #[serde(default)]
    pub itemized_deductions: Option<ItemizedDeductionCaps>,
    /// Cess as a percentage of base tax plus surcharge.
    #[serde(default)]
    pub cess_rate: Decimal,
    /// Surcharge tiers, ascending by threshold.
    #[serde(default)]
    pub surcharge_tiers: Vec<SurchargeTier>,
    /// Corporate rates (companies only).
    #[serde(default)]
    pub corporate: Option<CorporateRates>,
}

/// All rule sets and advisory text for one jurisdiction.
#[derive(Debug, Clone, Deserialize)]
pub struct JurisdictionTable {
    /// The jurisdiction this file describes.
    pub jurisdiction: Jurisdiction,
    /// Advisory tips shown with personal tax reports.
    #[serde(default)]
    pub personal_tips: Vec<String>,
    /// Advisory tips shown with corporate tax reports.
    #[serde(default)]
    pub corporate_tips: Vec<String>,
    /// Rule sets by entity type and regime.
    pub rule_sets: Vec<JurisdictionRuleSet>,
}

/// Provident fund contribution rules.
#[derive(Debug, Clone, Deserialize)]
pub struct ProvidentFundRules {
    /// Employee contribution as a percentage of basic.
    pub employee_rate: Decimal,
    /// Employer contribution as a percentage of basic.
    pub employer_rate: Decimal,
    /// Monthly basic salary above which contributions are capped.
    pub wage_ceiling_monthly: Decimal,
}

/// State insurance contribution rules.
#[derive(Debug, Clone, Deserialize)]
pub struct StateInsuranceRules {
    /// Employee contribution as a percentage of gross monthly pay.
    pub employee_rate: Decimal,
    /// Employer contribution as a percentage of gross monthly pay.
    pub employer_rate: Decimal,
    /// Gross monthly pay above which no contributions apply.
    pub wage_threshold_monthly: Decimal,
}

/// An inclusive percentage range.
#[derive(Debug, Clone, Deserialize)]
pub struct PercentRange {
    /// Lowest accepted value.
    pub min: Decimal,
    /// Highest accepted value.
    pub max: Decimal,
}

impl PercentRange {
    /// Returns true when `value` lies within the range.
    pub fn contains(&self, value: Decimal) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Statutory payroll rules from payroll.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct PayrollRules {
    /// Provident fund rules.
    pub provident_fund: ProvidentFundRules,
    /// State insurance rules.
    pub state_insurance: StateInsuranceRules,
    /// Accepted basic-salary percentage of CTC.
    pub basic_percent: PercentRange,
    /// Accepted HRA percentage of basic.
    pub hra_percent: PercentRange,
}

/// GST rules from gst.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct GstRules {
    /// The rates the calculator accepts.
    pub supported_rates: Vec<Decimal>,
}

/// The complete, validated rule tables.
///
/// Constructed through [`RuleTables::new`], which rejects structurally
/// invalid tables, so calculators can rely on contiguous slabs and
/// non-empty corporate rate tiers.
#[derive(Debug, Clone)]
pub struct RuleTables {
    metadata: FiscalYearMetadata,
    jurisdictions: BTreeMap<Jurisdiction, JurisdictionTable>,
    payroll: PayrollRules,
    gst: GstRules,
}

impl RuleTables {
    /// Validates and assembles rule tables from their component parts.
    pub fn new(
        metadata: FiscalYearMetadata,
        tables: Vec<JurisdictionTable>,
        payroll: PayrollRules,
        gst: GstRules,
    ) -> EngineResult<Self> {
        let mut jurisdictions = BTreeMap::new();
        for table in tables {
            validate_table(&table)?;
            let key = table.jurisdiction;
            if jurisdictions.insert(key, table).is_some() {
                return Err(EngineError::InvalidRuleTable {
                    jurisdiction: key.to_string(),
                    message: "jurisdiction is defined more than once".to_string(),
                });
            }
        }

        Ok(Self {
            metadata,
            jurisdictions,
            payroll,
            gst,
        })
    }

    /// Returns the fiscal-year metadata.
    pub fn metadata(&self) -> &FiscalYearMetadata {
        &self.metadata
    }

    /// Returns the statutory payroll rules.
    pub fn payroll(&self) -> &PayrollRules {
        &self.payroll
    }

    /// Returns the GST rules.
    pub fn gst(&self) -> &GstRules {
        &self.gst
    }

    /// Returns the table for a jurisdiction.
    pub fn table(&self, jurisdiction: Jurisdiction) -> EngineResult<&JurisdictionTable> {
        self.jurisdictions
            .get(&jurisdiction)
            .ok_or_else(|| EngineError::UnsupportedJurisdiction {
                jurisdiction: jurisdiction.to_string(),
                detail: "no rule tables are loaded for this jurisdiction".to_string(),
            })
    }

    /// Looks up the rule set for a jurisdiction, entity type and regime.
    ///
    /// Never falls back to another jurisdiction's rules: a missing entry is
    /// an [`EngineError::UnsupportedJurisdiction`].
    pub fn rules_for(
        &self,
        jurisdiction: Jurisdiction,
        entity_type: EntityType,
        regime: Regime,
    ) -> EngineResult<&JurisdictionRuleSet> {
        self.table(jurisdiction)?
            .rule_sets
            .iter()
            .find(|rs| rs.entity_type == entity_type && rs.regime == regime)
            .ok_or_else(|| EngineError::UnsupportedJurisdiction {
                jurisdiction: jurisdiction.to_string(),
                detail: format!("no rule table for {} under the {} regime", entity_type, regime),
            })
    }

    /// Returns the regimes available to individuals, in priority order
    /// (New before Old).
    pub fn personal_regimes(&self, jurisdiction: Jurisdiction) -> EngineResult<Vec<Regime>> {
        let mut regimes: Vec<Regime> = self
            .table(jurisdiction)?
            .rule_sets
            .iter()
            .filter(|rs| rs.entity_type == EntityType::Individual)
            .map(|rs| rs.regime)
            .collect();
        regimes.sort();

        if regimes.is_empty() {
            return Err(EngineError::UnsupportedJurisdiction {
                jurisdiction: jurisdiction.to_string(),
                detail: "no rule table for individuals".to_string(),
            });
        }
        Ok(regimes)
    }
}

fn invalid(jurisdiction: Jurisdiction, message: impl Into<String>) -> EngineError {
    EngineError::InvalidRuleTable {
        jurisdiction: jurisdiction.to_string(),
        message: message.into(),
    }
}

/// Checks the structural invariants of one jurisdiction's tables.
fn validate_table(table: &JurisdictionTable) -> EngineResult<()> {
    let jurisdiction = table.jurisdiction;

    let mut seen = Vec::new();
    for rule_set in &table.rule_sets {
        let key = (rule_set.entity_type, rule_set.regime);
        if seen.contains(&key) {
            return Err(invalid(
                jurisdiction,
                format!(
                    "duplicate rule set for {} under the {} regime",
                    rule_set.entity_type, rule_set.regime
                ),
            ));
        }
        seen.push(key);

        match rule_set.entity_type {
            EntityType::Individual => validate_slabs(jurisdiction, rule_set)?,
            EntityType::Company => validate_corporate(jurisdiction, rule_set)?,
        }
        validate_surcharge_tiers(jurisdiction, rule_set)?;
    }

    let mut personal: Vec<Regime> = seen
        .iter()
        .filter(|(entity, _)| *entity == EntityType::Individual)
        .map(|(_, regime)| *regime)
        .collect();
    personal.sort();
    let valid_combination = personal.is_empty()
        || personal == [Regime::Standard]
        || personal == [Regime::New, Regime::Old];
    if !valid_combination {
        return Err(invalid(
            jurisdiction,
            "individual regimes must be either 'standard' alone or the 'new' and 'old' pair",
        ));
    }

    Ok(())
}

fn validate_slabs(jurisdiction: Jurisdiction, rule_set: &JurisdictionRuleSet) -> EngineResult<()> {
    let slabs = &rule_set.slabs;
    let first = slabs
        .first()
        .ok_or_else(|| invalid(jurisdiction, format!("{} has no slabs", rule_set.label)))?;
    if !first.lower.is_zero() {
        return Err(invalid(
            jurisdiction,
            format!("{}: first slab must start at 0", rule_set.label),
        ));
    }

    let mut previous: Option<&Slab> = None;
    for (index, slab) in slabs.iter().enumerate() {
        let is_last = index == slabs.len() - 1;
        if slab.rate < Decimal::ZERO || slab.rate > Decimal::ONE_HUNDRED {
            return Err(invalid(
                jurisdiction,
                format!("{}: slab rate {} is out of range", rule_set.label, slab.rate),
            ));
        }
        match slab.upper {
            Some(upper) if upper <= slab.lower => {
                return Err(invalid(
                    jurisdiction,
                    format!("{}: slab upper bound {} is not above its lower bound", rule_set.label, upper),
                ));
            }
            Some(_) if is_last => {
                return Err(invalid(
                    jurisdiction,
                    format!("{}: last slab must be unbounded", rule_set.label),
                ));
            }
            None if !is_last => {
                return Err(invalid(
                    jurisdiction,
                    format!("{}: only the last slab may be unbounded", rule_set.label),
                ));
            }
            _ => {}
        }
        if let Some(prev) = previous {
            if prev.upper != Some(slab.lower) {
                return Err(invalid(
                    jurisdiction,
                    format!("{}: slabs are not contiguous at {}", rule_set.label, slab.lower),
                ));
            }
            if slab.rate < prev.rate {
                return Err(invalid(
                    jurisdiction,
                    format!("{}: slab rates must be non-decreasing", rule_set.label),
                ));
            }
        }
        previous = Some(slab);
    }
    Ok(())
}

fn validate_corporate(
    jurisdiction: Jurisdiction,
    rule_set: &JurisdictionRuleSet,
) -> EngineResult<()> {
    if rule_set.regime != Regime::Standard {
        return Err(invalid(
            jurisdiction,
            "company rule sets must use the 'standard' regime",
        ));
    }
    let corporate = rule_set
        .corporate
        .as_ref()
        .ok_or_else(|| invalid(jurisdiction, format!("{} has no corporate rates", rule_set.label)))?;

    match corporate.rate_tiers.last() {
        None => {
            return Err(invalid(
                jurisdiction,
                format!("{} has no corporate rate tiers", rule_set.label),
            ));
        }
        Some(last) if last.max_revenue.is_some() => {
            return Err(invalid(
                jurisdiction,
                format!("{}: last rate tier must have no revenue ceiling", rule_set.label),
            ));
        }
        Some(_) => {}
    }
    let ceilings: Vec<Decimal> = corporate
        .rate_tiers
        .iter()
        .filter_map(|tier| tier.max_revenue)
        .collect();
    if ceilings.len() != corporate.rate_tiers.len() - 1 || ceilings.windows(2).any(|w| w[0] >= w[1]) {
        return Err(invalid(
            jurisdiction,
            format!("{}: rate tier ceilings must be ascending", rule_set.label),
        ));
    }

    if let Some(relief) = &corporate.small_profits {
        if relief.lower_limit >= relief.upper_limit {
            return Err(invalid(
                jurisdiction,
                format!("{}: small profits limits are inverted", rule_set.label),
            ));
        }
    }
    Ok(())
}

fn validate_surcharge_tiers(
    jurisdiction: Jurisdiction,
    rule_set: &JurisdictionRuleSet,
) -> EngineResult<()> {
    let ascending = rule_set
        .surcharge_tiers
        .windows(2)
        .all(|w| w[0].threshold < w[1].threshold);
    if !ascending {
        return Err(invalid(
            jurisdiction,
            format!("{}: surcharge tiers must be ascending by threshold", rule_set.label),
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

    fn slab(lower: &str, upper: Option<&str>, rate: &str) -> Slab {
        Slab {
            lower: dec(lower),
            upper: upper.map(dec),
            rate: dec(rate),
        }
    }

    fn individual(regime: Regime, slabs: Vec<Slab>) -> JurisdictionRuleSet {
        JurisdictionRuleSet {
            entity_type: EntityType::Individual,
            regime,
            label: format!("{} test", regime),
            slabs,
            rebate_threshold: None,
            standard_deduction: None,
            itemized_deductions: None,
            cess_rate: Decimal::ZERO,
            surcharge_tiers: vec![],
            corporate: None,
        }
    }

    fn table(rule_sets: Vec<JurisdictionRuleSet>) -> JurisdictionTable {
        JurisdictionTable {
            jurisdiction: Jurisdiction::India,
            personal_tips: vec![],
            corporate_tips: vec![],
            rule_sets,
        }
    }

    fn valid_slabs() -> Vec<Slab> {
        vec![
            slab("0", Some("300000"), "0"),
            slab("300000", Some("600000"), "5"),
            slab("600000", None, "10"),
        ]
    }

    #[test]
    fn test_valid_slabs_pass() {
        let t = table(vec![individual(Regime::Standard, valid_slabs())]);
        assert!(validate_table(&t).is_ok());
    }

    #[test]
    fn test_gap_between_slabs_is_rejected() {
        let slabs = vec![
            slab("0", Some("300000"), "0"),
            slab("350000", None, "5"),
        ];
        let t = table(vec![individual(Regime::Standard, slabs)]);
        let err = validate_table(&t).unwrap_err();
        assert!(err.to_string().contains("not contiguous"));
    }

    #[test]
    fn test_decreasing_rates_are_rejected() {
        let slabs = vec![
            slab("0", Some("300000"), "10"),
            slab("300000", None, "5"),
        ];
        let t = table(vec![individual(Regime::Standard, slabs)]);
        let err = validate_table(&t).unwrap_err();
        assert!(err.to_string().contains("non-decreasing"));
    }

    #[test]
    fn test_bounded_last_slab_is_rejected() {
        let slabs = vec![slab("0", Some("300000"), "0")];
        let t = table(vec![individual(Regime::Standard, slabs)]);
        assert!(validate_table(&t).is_err());
    }

    #[test]
    fn test_lone_old_regime_is_rejected() {
        let t = table(vec![individual(Regime::Old, valid_slabs())]);
        let err = validate_table(&t).unwrap_err();
        assert!(err.to_string().contains("'new' and 'old' pair"));
    }

    #[test]
    fn test_duplicate_rule_set_is_rejected() {
        let t = table(vec![
            individual(Regime::Standard, valid_slabs()),
            individual(Regime::Standard, valid_slabs()),
        ]);
        let err = validate_table(&t).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_company_without_corporate_rates_is_rejected() {
        let mut rule_set = individual(Regime::Standard, vec![]);
        rule_set.entity_type = EntityType::Company;
        let t = table(vec![rule_set]);
        let err = validate_table(&t).unwrap_err();
        assert!(err.to_string().contains("no corporate rates"));
    }

    #[test]
    fn test_percent_range_is_inclusive() {
        let range = PercentRange {
            min: dec("30"),
            max: dec("60"),
        };
        assert!(range.contains(dec("30")));
        assert!(range.contains(dec("60")));
        assert!(!range.contains(dec("60.01")));
        assert!(!range.contains(dec("29.99")));
    }
}
