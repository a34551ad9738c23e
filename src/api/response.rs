//! Response types for the tax engine API.
//!
//! Successful calculations are wrapped in a [`CalculationResponse`] that
//! carries the full-precision result next to a `display` block of formatted
//! strings. Failures map [`EngineError`] variants to a status code and a
//! machine-readable [`ApiError`].

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;
use crate::format::{format_amount, format_currency, format_percent};
use crate::models::{
    ComparativeTaxReport, Currency, GstBreakdown, Jurisdiction, PayrollBreakdown,
    PortfolioSummary, TaxCalculationResult,
};

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::InvalidRuleTable { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            },
            EngineError::UnsupportedJurisdiction { detail, .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details("UNSUPPORTED_JURISDICTION", message, detail),
            },
            EngineError::InvalidInput { field, .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_INPUT",
                    message,
                    format!("Check the value supplied for '{}'", field),
                ),
            },
            EngineError::ComputationInvariant { .. } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::new("COMPUTATION_INVARIANT", message),
            },
        }
    }
}

/// Envelope for every successful calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationResponse<T, D> {
    /// Unique identifier of this calculation (also the log correlation id).
    pub calculation_id: Uuid,
    /// When the calculation completed.
    pub timestamp: DateTime<Utc>,
    /// Version of the engine that produced the result.
    pub engine_version: String,
    /// Fiscal year of the rule tables used.
    pub fiscal_year: String,
    /// Calculation time in microseconds.
    pub duration_us: u64,
    /// The full-precision result.
    pub result: T,
    /// The result formatted for presentation.
    pub display: D,
}

/// Formatted figures for one regime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxResultDisplay {
    /// Gross income.
    pub gross_income: String,
    /// Total deductions.
    pub total_deductions: String,
    /// Taxable income.
    pub taxable_income: String,
    /// Base tax.
    pub base_tax: String,
    /// Surcharge.
    pub surcharge: String,
    /// Cess.
    pub cess: String,
    /// Tax payable.
    pub tax_payable: String,
    /// Effective rate.
    pub effective_rate: String,
}

impl TaxResultDisplay {
    fn new(result: &TaxCalculationResult, jurisdiction: Jurisdiction) -> Self {
        Self {
            gross_income: format_amount(result.gross_income, jurisdiction),
            total_deductions: format_amount(result.total_deductions, jurisdiction),
            taxable_income: format_amount(result.taxable_income, jurisdiction),
            base_tax: format_amount(result.base_tax, jurisdiction),
            surcharge: format_amount(result.surcharge, jurisdiction),
            cess: format_amount(result.cess, jurisdiction),
            tax_payable: format_amount(result.tax_payable, jurisdiction),
            effective_rate: format_percent(result.effective_rate),
        }
    }
}

/// Formatted figures for a comparative report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDisplay {
    /// Currency the amounts are shown in.
    pub currency: Currency,
    /// Old Regime (or single regime) figures.
    pub old_regime: TaxResultDisplay,
    /// New Regime (or single regime) figures.
    pub new_regime: TaxResultDisplay,
}

impl ReportDisplay {
    /// Formats both halves of a report in the jurisdiction's currency.
    pub fn new(report: &ComparativeTaxReport) -> Self {
        Self {
            currency: report.jurisdiction.currency(),
            old_regime: TaxResultDisplay::new(&report.old_regime, report.jurisdiction),
            new_regime: TaxResultDisplay::new(&report.new_regime, report.jurisdiction),
        }
    }
}

/// Formatted monthly payroll figures, in rupees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollDisplay {
    /// Monthly basic.
    pub basic: String,
    /// Monthly HRA.
    pub hra: String,
    /// Monthly special allowance.
    pub special_allowance: String,
    /// Monthly other allowances.
    pub other_allowances: String,
    /// Gross monthly pay.
    pub gross_monthly: String,
    /// Employee provident fund.
    pub provident_fund: String,
    /// Employee state insurance.
    pub state_insurance: String,
    /// Net monthly pay.
    pub net_salary: String,
    /// Monthly cost to the employer.
    pub employer_cost: String,
}

impl PayrollDisplay {
    /// Formats a payroll breakdown.
    pub fn new(payroll: &PayrollBreakdown) -> Self {
        let inr = |amount| format_currency(amount, Currency::Inr);
        Self {
            basic: inr(payroll.monthly.basic),
            hra: inr(payroll.monthly.hra),
            special_allowance: inr(payroll.monthly.special_allowance),
            other_allowances: inr(payroll.monthly.other_allowances),
            gross_monthly: inr(payroll.gross_monthly),
            provident_fund: inr(payroll.employee_deductions.provident_fund),
            state_insurance: inr(payroll.employee_deductions.state_insurance),
            net_salary: inr(payroll.net_salary),
            employer_cost: inr(payroll.employer_cost),
        }
    }
}

/// Formatted GST figures, in rupees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GstDisplay {
    /// Amount before GST.
    pub base_amount: String,
    /// GST charged.
    pub gst_amount: String,
    /// Amount including GST.
    pub total_amount: String,
    /// GST rate.
    pub rate: String,
}

impl GstDisplay {
    /// Formats a GST breakdown.
    pub fn new(gst: &GstBreakdown) -> Self {
        Self {
            base_amount: format_currency(gst.base_amount, Currency::Inr),
            gst_amount: format_currency(gst.gst_amount, Currency::Inr),
            total_amount: format_currency(gst.total_amount, Currency::Inr),
            rate: format_percent(gst.rate),
        }
    }
}

/// Formatted portfolio totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioDisplay {
    /// One line per jurisdiction.
    pub totals: Vec<PortfolioTotalDisplay>,
}

/// Formatted totals for one jurisdiction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioTotalDisplay {
    /// The jurisdiction.
    pub jurisdiction: Jurisdiction,
    /// Total revenue.
    pub total_revenue: String,
    /// Total tax payable.
    pub total_tax_payable: String,
}

impl PortfolioDisplay {
    /// Formats portfolio totals in each jurisdiction's currency.
    pub fn new(summary: &PortfolioSummary) -> Self {
        Self {
            totals: summary
                .totals
                .iter()
                .map(|total| PortfolioTotalDisplay {
                    jurisdiction: total.jurisdiction,
                    total_revenue: format_currency(total.total_revenue, total.currency),
                    total_tax_payable: format_currency(total.total_tax_payable, total.currency),
                })
                .collect(),
        }
    }
}
