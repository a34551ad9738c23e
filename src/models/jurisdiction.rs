//! Jurisdiction, entity type and regime discriminators.
//!
//! These closed enums replace string-typed region/role dispatch: anything
//! that does not parse into one of them is rejected with
//! [`EngineError::UnsupportedJurisdiction`] before any rule lookup happens.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// A tax jurisdiction with rule tables in the engine.
///
/// # Example
///
/// ```
/// use tax_engine::models::Jurisdiction;
///
/// let jurisdiction: Jurisdiction = "United Kingdom".parse().unwrap();
/// assert_eq!(jurisdiction, Jurisdiction::Uk);
/// assert!("Germany".parse::<Jurisdiction>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Jurisdiction {
    /// India (income tax under the Income-tax Act, GST, EPF/ESI).
    India,
    /// United States, federal tax only.
    Usa,
    /// United Kingdom.
    Uk,
    /// Australia.
    Australia,
}

impl Jurisdiction {
    /// All supported jurisdictions.
    pub const ALL: [Jurisdiction; 4] = [
        Jurisdiction::India,
        Jurisdiction::Usa,
        Jurisdiction::Uk,
        Jurisdiction::Australia,
    ];

    /// The snake_case key used in rule tables and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Jurisdiction::India => "india",
            Jurisdiction::Usa => "usa",
            Jurisdiction::Uk => "uk",
            Jurisdiction::Australia => "australia",
        }
    }

    /// The currency amounts in this jurisdiction are denominated in.
    pub fn currency(&self) -> Currency {
        match self {
            Jurisdiction::India => Currency::Inr,
            Jurisdiction::Usa => Currency::Usd,
            Jurisdiction::Uk => Currency::Gbp,
            Jurisdiction::Australia => Currency::Aud,
        }
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Jurisdiction {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "india" | "in" | "ind" => Ok(Jurisdiction::India),
            "usa" | "us" | "united states" | "united states of america" => Ok(Jurisdiction::Usa),
            "uk" | "gb" | "united kingdom" | "great britain" => Ok(Jurisdiction::Uk),
            "australia" | "au" | "aus" => Ok(Jurisdiction::Australia),
            _ => Err(EngineError::UnsupportedJurisdiction {
                jurisdiction: s.to_string(),
                detail: "no rule tables are defined for this jurisdiction".to_string(),
            }),
        }
    }
}

/// The kind of taxpayer a rule table applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    /// A natural person.
    Individual,
    /// An incorporated company (Pvt Ltd, C-Corp, Limited Company, Pty Ltd).
    Company,
}

impl EntityType {
    /// The snake_case key used in rule tables and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Individual => "individual",
            EntityType::Company => "company",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "individual" | "sole proprietorship" | "sole trader" => Ok(EntityType::Individual),
            "company" | "private limited" | "pvt ltd" | "c-corp" | "c corp" | "limited company"
            | "ltd" | "pty ltd" => Ok(EntityType::Company),
            _ => Err(EngineError::UnsupportedJurisdiction {
                jurisdiction: s.to_string(),
                detail: "unknown entity type".to_string(),
            }),
        }
    }
}

/// A set of tax rules a taxpayer is assessed under.
///
/// Jurisdictions with a single set of rules use [`Regime::Standard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    /// India's New Regime, the statutory default.
    New,
    /// India's Old Regime with itemized deductions.
    Old,
    /// The only regime of a single-regime jurisdiction.
    Standard,
}

impl Regime {
    /// The snake_case key used in rule tables and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Regime::New => "new",
            Regime::Old => "old",
            Regime::Standard => "standard",
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The regime a comparative report recommends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedRegime {
    /// The Old Regime yields strictly lower tax.
    Old,
    /// The New Regime yields lower or equal tax.
    New,
    /// Only one regime applies, so there is nothing to choose.
    NotApplicable,
}

/// A currency used for presenting amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Indian rupee.
    Inr,
    /// US dollar.
    Usd,
    /// Pound sterling.
    Gbp,
    /// Australian dollar.
    Aud,
}

impl Currency {
    /// The symbol prefixed to formatted amounts.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Inr => "₹",
            Currency::Usd => "$",
            Currency::Gbp => "£",
            Currency::Aud => "A$",
        }
    }
}
