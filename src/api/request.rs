//! Request types for the tax engine API.
//!
//! Jurisdictions and GST directions arrive as strings and are parsed here,
//! so unknown values surface as engine errors rather than JSON errors.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{
    CompanyFinancials, CompanyProfile, DeductionProfile, GstDirection, IncomeProfile,
    Jurisdiction,
};

/// Request body for `POST /tax/personal`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalTaxRequest {
    /// Jurisdiction name or code (e.g., "india", "US", "uk").
    pub jurisdiction: String,
    /// Income by source; omitted fields are zero.
    #[serde(default)]
    pub income: IncomeProfile,
    /// Itemized deductions; omitted fields are zero.
    #[serde(default)]
    pub deductions: DeductionProfile,
}

impl PersonalTaxRequest {
    /// Parses the requested jurisdiction.
    pub fn jurisdiction(&self) -> EngineResult<Jurisdiction> {
        self.jurisdiction.parse()
    }
}

/// Request body for `POST /tax/corporate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorporateTaxRequest {
    /// Jurisdiction name or code.
    pub jurisdiction: String,
    /// Annual revenue.
    pub revenue: Decimal,
    /// Taxable profit.
    pub profit: Decimal,
    /// Passive income included in revenue.
    #[serde(default)]
    pub passive_income: Decimal,
}

impl CorporateTaxRequest {
    /// Parses the requested jurisdiction.
    pub fn jurisdiction(&self) -> EngineResult<Jurisdiction> {
        self.jurisdiction.parse()
    }

    /// Returns the company's figures.
    pub fn financials(&self) -> CompanyFinancials {
        CompanyFinancials {
            revenue: self.revenue,
            profit: self.profit,
            passive_income: self.passive_income,
        }
    }
}

/// Request body for `POST /payroll`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollRequest {
    /// Annual cost to company.
    pub ctc: Decimal,
    /// Basic salary as a percentage of CTC.
    pub basic_percent: Decimal,
    /// HRA as a percentage of basic.
    pub hra_percent: Decimal,
    /// Other annual allowances.
    #[serde(default)]
    pub other_allowances: Decimal,
}

/// Request body for `POST /gst`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GstRequest {
    /// The amount to split.
    pub amount: Decimal,
    /// GST rate as a percentage.
    pub rate: Decimal,
    /// "exclusive" (add GST) or "inclusive" (extract GST).
    #[serde(default = "default_direction")]
    pub direction: String,
}

fn default_direction() -> String {
    "exclusive".to_string()
}

impl GstRequest {
    /// Parses the requested direction.
    pub fn direction(&self) -> EngineResult<GstDirection> {
        self.direction.parse()
    }
}

/// Request body for `POST /portfolio`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioRequest {
    /// The client companies.
    pub companies: Vec<CompanyRequest>,
}

/// One company in a portfolio request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyRequest {
    /// Caller-assigned identifier.
    pub company_id: String,
    /// Jurisdiction name or code.
    pub jurisdiction: String,
    /// Annual revenue.
    pub revenue: Decimal,
    /// Taxable profit.
    pub profit: Decimal,
    /// Passive income included in revenue.
    #[serde(default)]
    pub passive_income: Decimal,
}

impl TryFrom<CompanyRequest> for CompanyProfile {
    type Error = EngineError;

    fn try_from(req: CompanyRequest) -> Result<Self, Self::Error> {
        Ok(CompanyProfile {
            jurisdiction: req.jurisdiction.parse()?,
            company_id: req.company_id,
            financials: CompanyFinancials {
                revenue: req.revenue,
                profit: req.profit,
                passive_income: req.passive_income,
            },
        })
    }
}

impl PortfolioRequest {
    /// Converts every company, failing on the first unknown jurisdiction.
    pub fn into_profiles(self) -> EngineResult<Vec<CompanyProfile>> {
        self.companies.into_iter().map(CompanyProfile::try_from).collect()
    }
}
