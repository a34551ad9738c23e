//! Surcharge and cess, applied on top of base tax.

use rust_decimal::Decimal;
use serde_json::json;

use crate::config::JurisdictionRuleSet;

use super::audit::AuditLog;
use super::slabs::{applicable_surcharge, cess_on, percent_of};

/// Surcharge and cess amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Levies {
    pub(crate) surcharge: Decimal,
    pub(crate) cess: Decimal,
}

/// Applies the rule set's surcharge tiers (selected by `basis`, the taxable
/// income or profit) and then cess on base tax plus surcharge.
pub(crate) fn apply_levies(
    rules: &JurisdictionRuleSet,
    basis_name: &str,
    basis: Decimal,
    base_tax: Decimal,
    audit: &mut AuditLog,
) -> Levies {
    let surcharge = match applicable_surcharge(&rules.surcharge_tiers, basis) {
        Some(tier) => {
            let surcharge = percent_of(base_tax, tier.rate);
            audit.record(
                "surcharge",
                "Surcharge",
                json!({ basis_name: basis, "threshold": tier.threshold, "base_tax": base_tax }),
                json!({ "rate": tier.rate, "surcharge": surcharge }),
                format!(
                    "{} {} exceeds {}, so a {}% surcharge applies",
                    capitalize(basis_name),
                    basis,
                    tier.threshold,
                    tier.rate
                ),
            );
            surcharge
        }
        None => Decimal::ZERO,
    };

    let chargeable = base_tax + surcharge;
    let cess = cess_on(chargeable, rules.cess_rate);
    if !rules.cess_rate.is_zero() {
        audit.record(
            "cess",
            "Cess",
            json!({ "tax": chargeable, "cess_rate": rules.cess_rate }),
            json!({ "cess": cess }),
            if cess.is_zero() {
                "No tax is due, so no cess applies".to_string()
            } else {
                format!("{}% cess on {}", rules.cess_rate, chargeable)
            },
        );
    }

    Levies { surcharge, cess }
}

fn capitalize(name: &str) -> String {
    let words = name.replace('_', " ");
    let mut chars = words.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
