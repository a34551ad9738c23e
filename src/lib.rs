//! Tax and statutory computation engine.
//!
//! This crate computes personal income tax (India's New and Old regimes with
//! a regime recommendation, the USA, the UK and Australia), corporate tax,
//! Indian payroll statutory deductions (provident fund and state insurance)
//! and GST, from versioned rule tables. Calculators are pure functions;
//! [`format`] renders their full-precision results for display and [`api`]
//! exposes them over HTTP.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod format;
pub mod models;
