//! Sales report aggregation.
//!
//! Reports are derived purely from stored sale documents: grouped by type,
//! then by date within type, with running totals at every level. Nothing is
//! persisted beyond the query parameters.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::ReportError;
pub use service::ReportService;
pub use types::{
    DashboardSummary, DateGroup, ReportDocument, ReportLine, ReportQuery, SalesReport, TypeGroup,
};
