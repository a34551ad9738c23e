//! Core data models for the tax engine.
//!
//! Every model is a plain value constructed fresh per calculation.

mod company;
mod gst;
mod income;
mod jurisdiction;
mod payroll;
mod tax_result;

pub use company::{
    CompanyFinancials, CompanyProfile, CompanyTaxOutcome, JurisdictionTotal, PortfolioSummary,
};
pub use gst::{GstBreakdown, GstDirection};
pub use income::{DeductionProfile, IncomeProfile, MAX_AMOUNT};
pub(crate) use income::ensure_amount;
pub use jurisdiction::{Currency, EntityType, Jurisdiction, RecommendedRegime, Regime};
pub use payroll::{PayrollBreakdown, SalaryComponents, StatutoryAmounts};
pub use tax_result::{AuditStep, ComparativeTaxReport, TaxCalculationResult};
