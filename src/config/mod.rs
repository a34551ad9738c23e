//! Rule-table loading and lookup for the tax engine.
//!
//! Rule tables (slabs, rebates, deductions, cess, surcharge, corporate
//! rates, payroll constants and GST rates) are versioned YAML data, loaded
//! from a directory or from the copies compiled into the crate.
//!
//! # Example
//!
//! ```
//! use tax_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::builtin().unwrap();
//! println!("Fiscal year: {}", config.tables().metadata().fiscal_year);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    BaseRateEntity, CorporateRates, FiscalYearMetadata, GstRules, ItemizedDeductionCaps,
    JurisdictionRuleSet, JurisdictionTable, PayrollRules, PercentRange, ProvidentFundRules,
    RevenueRateTier, RuleTables, Slab, SmallProfitsRelief, StandardDeduction,
    StateInsuranceRules, SurchargeTier,
};
