//! Regime recommendation.
//!
//! Picks the regime with strictly lower tax. Ties go to the New Regime,
//! which is the statutory default and comes first in priority order.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::RecommendedRegime;

/// Reason given whenever only one regime applies.
pub const SINGLE_REGIME_REASON: &str = "Only one tax regime applies for this entity/region.";

/// The outcome of comparing two regimes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    /// The regime to elect.
    pub regime: RecommendedRegime,
    /// Human-readable explanation.
    pub reason: String,
}

/// Recommends a regime from the two tax liabilities.
///
/// When `has_dual_regime` is false the amounts are ignored and the result is
/// always [`RecommendedRegime::NotApplicable`].
///
/// # Examples
///
/// ```
/// use tax_engine::calculation::recommend;
/// use tax_engine::models::RecommendedRegime;
/// use rust_decimal::Decimal;
///
/// let rec = recommend(Decimal::from(65_000), Decimal::from(31_200), true);
/// assert_eq!(rec.regime, RecommendedRegime::New);
///
/// let tie = recommend(Decimal::from(1_000), Decimal::from(1_000), true);
/// assert_eq!(tie.regime, RecommendedRegime::New);
/// ```
pub fn recommend(old_tax: Decimal, new_tax: Decimal, has_dual_regime: bool) -> Recommendation {
    if !has_dual_regime {
        return Recommendation {
            regime: RecommendedRegime::NotApplicable,
            reason: SINGLE_REGIME_REASON.to_string(),
        };
    }

    if old_tax < new_tax {
        Recommendation {
            regime: RecommendedRegime::Old,
            reason: format!(
                "The Old Regime results in lower tax, saving {:.2} compared to the New Regime.",
                new_tax - old_tax
            ),
        }
    } else if new_tax < old_tax {
        Recommendation {
            regime: RecommendedRegime::New,
            reason: format!(
                "The New Regime results in lower tax, saving {:.2} compared to the Old Regime.",
                old_tax - new_tax
            ),
        }
    } else {
        Recommendation {
            regime: RecommendedRegime::New,
            reason: "Both regimes result in the same tax; the New Regime is the default and is recommended."
                .to_string(),
        }
    }
}
