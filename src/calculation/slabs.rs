//! Progressive slab tax, surcharge and cess.
//!
//! These are the arithmetic primitives shared by the personal and corporate
//! calculators. All rates are percentages; nothing here rounds.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::config::{Slab, SurchargeTier};

/// The portion of taxable income charged within one slab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlabCharge {
    /// Lower bound of the slab.
    pub lower: Decimal,
    /// Upper bound of the slab, `None` if unbounded.
    pub upper: Option<Decimal>,
    /// Marginal rate of the slab.
    pub rate: Decimal,
    /// Income falling within the slab.
    pub taxed_amount: Decimal,
    /// Tax on that income.
    pub tax: Decimal,
}

/// The result of applying a progressive table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlabTax {
    /// Total tax across all slabs.
    pub tax: Decimal,
    /// Per-slab breakdown, only for slabs the income reaches.
    pub charges: Vec<SlabCharge>,
}

/// Returns `rate` percent of `amount`.
pub fn percent_of(amount: Decimal, rate: Decimal) -> Decimal {
    amount * rate / Decimal::ONE_HUNDRED
}

/// Applies a progressive table to `taxable_income`.
///
/// For each slab whose lower bound is below the income, charges
/// `rate × (min(income, upper) − lower)`.
///
/// # Examples
///
/// ```
/// use tax_engine::calculation::progressive_tax;
/// use tax_engine::config::Slab;
/// use rust_decimal::Decimal;
///
/// let slabs = vec![
///     Slab { lower: Decimal::ZERO, upper: Some(Decimal::from(300_000)), rate: Decimal::ZERO },
///     Slab { lower: Decimal::from(300_000), upper: None, rate: Decimal::from(5) },
/// ];
/// let result = progressive_tax(&slabs, Decimal::from(500_000));
/// assert_eq!(result.tax, Decimal::from(10_000));
/// ```
pub fn progressive_tax(slabs: &[Slab], taxable_income: Decimal) -> SlabTax {
    let charges: Vec<SlabCharge> = slabs
        .iter()
        .filter(|slab| slab.lower < taxable_income)
        .map(|slab| {
            let top = match slab.upper {
                Some(upper) => upper.min(taxable_income),
                None => taxable_income,
            };
            let taxed_amount = top - slab.lower;
            SlabCharge {
                lower: slab.lower,
                upper: slab.upper,
                rate: slab.rate,
                taxed_amount,
                tax: percent_of(taxed_amount, slab.rate),
            }
        })
        .collect();

    SlabTax {
        tax: charges.iter().map(|c| c.tax).sum(),
        charges,
    }
}

/// Returns the surcharge tier that applies to `basis`: the one with the
/// highest threshold strictly exceeded. Tiers must be ascending.
pub fn applicable_surcharge(tiers: &[SurchargeTier], basis: Decimal) -> Option<&SurchargeTier> {
    tiers.iter().rev().find(|tier| basis > tier.threshold)
}

/// Returns cess on `tax`; zero tax never attracts cess.
pub fn cess_on(tax: Decimal, cess_rate: Decimal) -> Decimal {
    if tax > Decimal::ZERO {
        percent_of(tax, cess_rate)
    } else {
        Decimal::ZERO
    }
}

/// Returns `tax / denominator` as a percentage with two decimal places, or
/// zero when the denominator is zero.
pub fn effective_rate(tax: Decimal, denominator: Decimal) -> Decimal {
    if denominator <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (tax / denominator * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
