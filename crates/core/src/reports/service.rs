//! Report generation service.

use rust_decimal::Decimal;

use super::error::ReportError;
use super::types::{DateGroup, ReportDocument, ReportLine, ReportQuery, SalesReport, TypeGroup};

/// Service for assembling sales reports.
pub struct ReportService;

impl ReportService {
    /// Validates a report query.
    ///
    /// # Errors
    ///
    /// `InvalidDateRange` when both bounds are present and inverted.
    pub fn validate_query(query: &ReportQuery) -> Result<(), ReportError> {
        if let (Some(start), Some(end)) = (query.start_date, query.end_date) {
            if start > end {
                return Err(ReportError::InvalidDateRange { start, end });
            }
        }
        Ok(())
    }

    /// Builds a sales report from stored documents.
    ///
    /// Documents outside the query's range or type filter are dropped; the
    /// rest are scanned in date-then-creation order. Type groups appear in
    /// the order first encountered during that scan, date buckets follow
    /// chronologically within each type, and totals accumulate at the date,
    /// type, and grand level.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` from query validation.
    pub fn generate(
        query: &ReportQuery,
        documents: &[ReportDocument],
    ) -> Result<SalesReport, ReportError> {
        Self::validate_query(query)?;

        let mut scan: Vec<&ReportDocument> = documents
            .iter()
            .filter(|doc| Self::matches(query, doc))
            .collect();
        // Stable by date: creation order within a date is preserved.
        scan.sort_by_key(|doc| doc.date);

        let mut groups: Vec<TypeGroup> = Vec::new();
        let mut grand_total = Decimal::new(0, 2);

        for doc in scan {
            grand_total += doc.total;

            let group_index = groups
                .iter()
                .position(|g| g.kind == doc.kind)
                .unwrap_or_else(|| {
                    groups.push(TypeGroup {
                        kind: doc.kind,
                        type_name: doc.kind.type_name().to_string(),
                        total: Decimal::new(0, 2),
                        dates: Vec::new(),
                    });
                    groups.len() - 1
                });
            let group = &mut groups[group_index];
            group.total += doc.total;

            let bucket_index = group
                .dates
                .iter()
                .position(|d| d.date == doc.date)
                .unwrap_or_else(|| {
                    group.dates.push(DateGroup {
                        date: doc.date,
                        total: Decimal::new(0, 2),
                        documents: Vec::new(),
                    });
                    group.dates.len() - 1
                });
            let bucket = &mut group.dates[bucket_index];
            bucket.total += doc.total;
            bucket.documents.push(ReportLine {
                number: doc.number.clone(),
                date: doc.date,
                total: doc.total,
                customer: doc.customer.clone(),
            });
        }

        Ok(SalesReport {
            report_type: query.report_type,
            start_date: query.start_date,
            end_date: query.end_date,
            groups,
            grand_total,
        })
    }

    fn matches(query: &ReportQuery, doc: &ReportDocument) -> bool {
        if query.report_type.is_some_and(|kind| kind != doc.kind) {
            return false;
        }
        if query.start_date.is_some_and(|start| doc.date < start) {
            return false;
        }
        if query.end_date.is_some_and(|end| doc.date > end) {
            return false;
        }
        true
    }
}
