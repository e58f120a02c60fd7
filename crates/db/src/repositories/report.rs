//! Report repository.
//!
//! Feeds the report aggregator with sale documents in the order it expects
//! (date ascending, creation order within a date), records the parameters a
//! report was generated with, and computes the dashboard sums.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use lavka_core::reports::{DashboardSummary, ReportDocument, ReportQuery};
use lavka_shared::AppError;

use crate::entities::{customers, sale_documents, sales_reports, sea_orm_active_enums::DocType};

/// Error types for report operations.
#[derive(Debug, thiserror::Error)]
pub enum ReportRepositoryError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ReportRepositoryError> for AppError {
    fn from(err: ReportRepositoryError) -> Self {
        match err {
            ReportRepositoryError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Report repository.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Loads the documents matching a report query, ready for aggregation.
    pub async fn sale_documents(
        &self,
        query: &ReportQuery,
    ) -> Result<Vec<ReportDocument>, ReportRepositoryError> {
        let mut select = sale_documents::Entity::find();

        if let Some(kind) = query.report_type {
            select = select.filter(sale_documents::Column::DocType.eq(DocType::from(kind)));
        }
        if let Some(start) = query.start_date {
            select = select.filter(sale_documents::Column::Date.gte(start));
        }
        if let Some(end) = query.end_date {
            select = select.filter(sale_documents::Column::Date.lte(end));
        }

        let rows = select
            .find_also_related(customers::Entity)
            .order_by_asc(sale_documents::Column::Date)
            .order_by_asc(sale_documents::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(document, customer)| ReportDocument {
                id: document.id,
                kind: document.doc_type.into(),
                number: document.number,
                date: document.date,
                total: document.total,
                customer: customer.map(|c| c.name).unwrap_or_default(),
            })
            .collect())
    }

    /// Records the parameters a report was generated with.
    pub async fn record_parameters(
        &self,
        query: &ReportQuery,
    ) -> Result<sales_reports::Model, ReportRepositoryError> {
        let row = sales_reports::ActiveModel {
            id: Set(Uuid::new_v4()),
            report_type: Set(query.report_type.map(DocType::from)),
            start_date: Set(query.start_date),
            end_date: Set(query.end_date),
            created_at: Set(chrono::Utc::now().into()),
        };
        Ok(row.insert(&self.db).await?)
    }

    /// Computes the dashboard summary as of `today`.
    ///
    /// Sales windows exclude returns; the returns total is reported
    /// separately.
    pub async fn dashboard(
        &self,
        today: NaiveDate,
    ) -> Result<DashboardSummary, ReportRepositoryError> {
        let week_ago = today.checked_sub_days(Days::new(7)).unwrap_or(today);
        let month_ago = today.checked_sub_days(Days::new(30)).unwrap_or(today);

        let sales: Vec<(NaiveDate, Decimal)> = sale_documents::Entity::find()
            .filter(sale_documents::Column::DocType.ne(DocType::Return))
            .select_only()
            .column(sale_documents::Column::Date)
            .column(sale_documents::Column::Total)
            .into_tuple()
            .all(&self.db)
            .await?;
        let returns: Vec<Decimal> = sale_documents::Entity::find()
            .filter(sale_documents::Column::DocType.eq(DocType::Return))
            .select_only()
            .column(sale_documents::Column::Total)
            .into_tuple()
            .all(&self.db)
            .await?;

        let zero = Decimal::new(0, 2);
        let mut summary = DashboardSummary {
            sales_today: zero,
            sales_week: zero,
            sales_month: zero,
            total_sales: zero,
            total_returns: returns.iter().fold(zero, |acc, total| acc + total),
        };
        for (date, total) in sales {
            summary.total_sales += total;
            if date == today {
                summary.sales_today += total;
            }
            if date >= week_ago {
                summary.sales_week += total;
            }
            if date >= month_ago {
                summary.sales_month += total;
            }
        }

        Ok(summary)
    }
}
