//! Report and dashboard routes.

use std::str::FromStr;

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use serde::Deserialize;

use lavka_core::documents::DocumentKind;
use lavka_core::reports::{ReportQuery, ReportService};
use lavka_db::repositories::ReportRepository;
use lavka_shared::AppError;

use super::ApiError;
use crate::AppState;

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/sales", get(sales_report))
        .route("/dashboard", get(dashboard))
}

/// Query parameters for the sales report.
#[derive(Debug, Deserialize)]
pub struct SalesReportQuery {
    /// Document type filter: cash, cashless, or return.
    #[serde(rename = "type")]
    pub report_type: Option<String>,
    /// Inclusive range start.
    pub from: Option<NaiveDate>,
    /// Inclusive range end.
    pub to: Option<NaiveDate>,
}

/// GET /reports/sales
///
/// Groups matching documents by type, then by date, with running totals at
/// every level. The query parameters are recorded; the output is derived.
async fn sales_report(
    State(state): State<AppState>,
    Query(query): Query<SalesReportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let report_type = query
        .report_type
        .as_deref()
        .map(DocumentKind::from_str)
        .transpose()
        .map_err(AppError::Validation)?;

    let report_query = ReportQuery {
        report_type,
        start_date: query.from,
        end_date: query.to,
    };
    ReportService::validate_query(&report_query).map_err(AppError::from)?;

    let repo = ReportRepository::new((*state.db).clone());
    repo.record_parameters(&report_query).await?;
    let documents = repo.sale_documents(&report_query).await?;
    let report = ReportService::generate(&report_query, &documents).map_err(AppError::from)?;

    Ok(Json(report))
}

/// GET /dashboard
async fn dashboard(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let repo = ReportRepository::new((*state.db).clone());
    let summary = repo.dashboard(chrono::Utc::now().date_naive()).await?;
    Ok(Json(summary))
}
