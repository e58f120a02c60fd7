//! Report data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::documents::DocumentKind;

/// Parameters of a sales report.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ReportQuery {
    /// Restrict to one document type; `None` means all types.
    pub report_type: Option<DocumentKind>,
    /// Inclusive range start; `None` means unbounded.
    pub start_date: Option<NaiveDate>,
    /// Inclusive range end; `None` means unbounded.
    pub end_date: Option<NaiveDate>,
}

/// A sale document as the aggregator consumes it.
///
/// Rows must arrive ordered by date ascending and, within a date, in
/// creation order; the repository query provides that ordering.
#[derive(Debug, Clone)]
pub struct ReportDocument {
    /// Document ID.
    pub id: Uuid,
    /// Document type.
    pub kind: DocumentKind,
    /// Document number.
    pub number: String,
    /// Document date.
    pub date: NaiveDate,
    /// Document total.
    pub total: Decimal,
    /// Customer name.
    pub customer: String,
}

/// A single document line in the report output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportLine {
    /// Document number.
    pub number: String,
    /// Document date.
    pub date: NaiveDate,
    /// Document total.
    pub total: Decimal,
    /// Customer name.
    pub customer: String,
}

/// One calendar date within a type group.
#[derive(Debug, Clone, Serialize)]
pub struct DateGroup {
    /// The date.
    pub date: NaiveDate,
    /// Running total for the date.
    pub total: Decimal,
    /// Documents on this date, in creation order.
    pub documents: Vec<ReportLine>,
}

/// One document type group.
#[derive(Debug, Clone, Serialize)]
pub struct TypeGroup {
    /// The document type.
    pub kind: DocumentKind,
    /// Human-readable type name.
    pub type_name: String,
    /// Running total for the type.
    pub total: Decimal,
    /// Date buckets in chronological order.
    pub dates: Vec<DateGroup>,
}

/// The assembled sales report.
#[derive(Debug, Clone, Serialize)]
pub struct SalesReport {
    /// Type filter the report was built with.
    pub report_type: Option<DocumentKind>,
    /// Range start, if bounded.
    pub start_date: Option<NaiveDate>,
    /// Range end, if bounded.
    pub end_date: Option<NaiveDate>,
    /// Type groups in first-encountered order.
    pub groups: Vec<TypeGroup>,
    /// Grand total across all groups.
    pub grand_total: Decimal,
}

/// Headline figures for the dashboard.
///
/// Sales windows exclude returns; the returns total is reported separately.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    /// Sales total for today.
    pub sales_today: Decimal,
    /// Sales total for the last 7 days.
    pub sales_week: Decimal,
    /// Sales total for the last 30 days.
    pub sales_month: Decimal,
    /// All-time sales total.
    pub total_sales: Decimal,
    /// All-time returns total.
    pub total_returns: Decimal,
}
