//! Calculation logic for the tax engine.
//!
//! This module contains the calculators: personal income tax with regime
//! comparison, corporate tax, regime recommendation, Indian payroll
//! statutory deductions, GST, and portfolio batches of corporate reports.
//! All calculators are pure functions of their inputs and the rule tables.

mod audit;
mod corporate_tax;
mod gst;
mod levies;
mod payroll;
mod personal_tax;
mod portfolio;
mod recommender;
mod slabs;

pub use corporate_tax::{compute_company_tax, compute_corporate_tax};
pub use gst::compute_gst;
pub use payroll::compute_payroll;
pub use personal_tax::compute_personal_tax;
pub use portfolio::compute_portfolio;
pub use recommender::{Recommendation, SINGLE_REGIME_REASON, recommend};
pub use slabs::{
    SlabCharge, SlabTax, applicable_surcharge, cess_on, effective_rate, percent_of,
    progressive_tax,
};
