//! GST on an exclusive or inclusive amount.

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::RuleTables;
use crate::error::{EngineError, EngineResult};
use crate::models::{GstBreakdown, GstDirection, ensure_amount};

use super::slabs::percent_of;

/// Splits `amount` into base and GST at `rate` percent.
///
/// Exclusive amounts are the base and GST is added; inclusive amounts are
/// the total and the base is extracted as `amount × 100 / (100 + rate)`.
///
/// # Errors
///
/// [`EngineError::InvalidInput`] if `amount` is negative or above
/// [`MAX_AMOUNT`](crate::models::MAX_AMOUNT), or `rate` is not one of the
/// supported GST rates.
///
/// # Examples
///
/// ```
/// use tax_engine::calculation::compute_gst;
/// use tax_engine::config::ConfigLoader;
/// use tax_engine::models::GstDirection;
/// use rust_decimal::Decimal;
///
/// let config = ConfigLoader::builtin().unwrap();
/// let gst = compute_gst(
///     Decimal::from(11_800),
///     Decimal::from(18),
///     GstDirection::Inclusive,
///     config.tables(),
/// )
/// .unwrap();
/// assert_eq!(gst.base_amount, Decimal::from(10_000));
/// assert_eq!(gst.gst_amount, Decimal::from(1_800));
/// ```
pub fn compute_gst(
    amount: Decimal,
    rate: Decimal,
    direction: GstDirection,
    tables: &RuleTables,
) -> EngineResult<GstBreakdown> {
    ensure_amount("amount", amount)?;

    let supported = &tables.gst().supported_rates;
    if !supported.contains(&rate) {
        let rates: Vec<String> = supported.iter().map(|r| r.to_string()).collect();
        return Err(EngineError::invalid_input(
            "rate",
            format!("{}% is not a GST rate; expected one of {}", rate, rates.join(", ")),
        ));
    }

    let breakdown = match direction {
        GstDirection::Exclusive => {
            let gst_amount = percent_of(amount, rate);
            GstBreakdown {
                base_amount: amount,
                gst_amount,
                total_amount: amount + gst_amount,
                rate,
                direction,
            }
        }
        GstDirection::Inclusive => {
            let base_amount = amount * Decimal::ONE_HUNDRED / (Decimal::ONE_HUNDRED + rate);
            GstBreakdown {
                base_amount,
                gst_amount: amount - base_amount,
                total_amount: amount,
                rate,
                direction,
            }
        }
    };

    debug!(
        amount = %amount,
        rate = %rate,
        direction = %direction,
        gst = %breakdown.gst_amount,
        "Computed GST"
    );

    Ok(breakdown)
}
