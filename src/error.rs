//! Error types for the tax engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure a calculator or the rule-table loader can report.
//! Nothing is retried and nothing is recovered silently: every error
//! propagates to the caller.

use thiserror::Error;

/// The main error type for the tax engine.
///
/// # Example
///
/// ```
/// use tax_engine::error::EngineError;
///
/// let error = EngineError::InvalidInput {
///     field: "salary".to_string(),
///     message: "must not be negative".to_string(),
/// };
/// assert_eq!(error.to_string(), "Invalid input 'salary': must not be negative");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Rule-table file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Rule-table file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A rule table parsed but violates a structural invariant.
    #[error("Invalid rule table for '{jurisdiction}': {message}")]
    InvalidRuleTable {
        /// The jurisdiction the table belongs to.
        jurisdiction: String,
        /// What is wrong with the table.
        message: String,
    },

    /// No rule table exists for the requested jurisdiction/entity/regime.
    #[error("Unsupported jurisdiction '{jurisdiction}': {detail}")]
    UnsupportedJurisdiction {
        /// The jurisdiction as requested.
        jurisdiction: String,
        /// Which part of the lookup failed.
        detail: String,
    },

    /// A numeric input was negative or out of bounds.
    #[error("Invalid input '{field}': {message}")]
    InvalidInput {
        /// The offending input field.
        field: String,
        /// A description of what made the input invalid.
        message: String,
    },

    /// An internal invariant was violated while computing a result.
    #[error("Computation invariant violated: {message}")]
    ComputationInvariant {
        /// A description of the violated invariant.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for an [`EngineError::InvalidInput`].
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
