//! HTTP API module for the tax engine.
//!
//! Exposes the calculators as JSON endpoints:
//!
//! | Method | Path             | Calculator                 |
//! |--------|------------------|----------------------------|
//! | POST   | `/tax/personal`  | personal tax comparison    |
//! | POST   | `/tax/corporate` | corporate tax              |
//! | POST   | `/payroll`       | payroll statutory amounts  |
//! | POST   | `/gst`           | GST split                  |
//! | POST   | `/portfolio`     | batch corporate tax        |

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    CompanyRequest, CorporateTaxRequest, GstRequest, PayrollRequest, PersonalTaxRequest,
    PortfolioRequest,
};
pub use response::{
    ApiError, ApiErrorResponse, CalculationResponse, GstDisplay, PayrollDisplay,
    PortfolioDisplay, PortfolioTotalDisplay, ReportDisplay, TaxResultDisplay,
};
pub use state::AppState;
