//! GST breakdown model.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Whether an input amount already includes GST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GstDirection {
    /// The amount is the base; GST is added on top.
    Exclusive,
    /// The amount already includes GST; the base is extracted.
    Inclusive,
}

impl fmt::Display for GstDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GstDirection::Exclusive => f.write_str("exclusive"),
            GstDirection::Inclusive => f.write_str("inclusive"),
        }
    }
}

impl FromStr for GstDirection {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exclusive" | "add" => Ok(GstDirection::Exclusive),
            "inclusive" | "remove" => Ok(GstDirection::Inclusive),
            other => Err(EngineError::invalid_input(
                "direction",
                format!("expected 'exclusive' or 'inclusive', got '{}'", other),
            )),
        }
    }
}

/// The split of an amount into base and GST.
///
/// Amounts are kept at full precision; rounding belongs to presentation.
/// Invariant: `total = base * (1 + rate / 100)` in both directions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GstBreakdown {
    /// Amount before GST.
    pub base_amount: Decimal,
    /// GST charged.
    pub gst_amount: Decimal,
    /// Amount including GST.
    pub total_amount: Decimal,
    /// GST rate as a percentage.
    pub rate: Decimal,
    /// Which way the computation ran.
    pub direction: GstDirection,
}

impl GstBreakdown {
    /// Returns true when the input amount was GST-inclusive.
    pub fn is_inclusive(&self) -> bool {
        self.direction == GstDirection::Inclusive
    }
}
