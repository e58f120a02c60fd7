//! Tests for the report aggregator.

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use uuid::Uuid;

use crate::documents::DocumentKind;

use super::error::ReportError;
use super::service::ReportService;
use super::types::{ReportDocument, ReportQuery};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 4, d).unwrap()
}

fn doc(
    kind: DocumentKind,
    number: &str,
    date: NaiveDate,
    total: rust_decimal::Decimal,
) -> ReportDocument {
    ReportDocument {
        id: Uuid::new_v4(),
        kind,
        number: number.to_string(),
        date,
        total,
        customer: "ООО Ромашка".to_string(),
    }
}

#[test]
fn test_empty_report() {
    let report = ReportService::generate(&ReportQuery::default(), &[]).unwrap();
    assert!(report.groups.is_empty());
    assert_eq!(report.grand_total, dec!(0.00));
}

#[test]
fn test_grouping_and_totals() {
    // Two cash documents on one day, one cashless on another.
    let documents = vec![
        doc(DocumentKind::Cash, "ТЧ-1", day(1), dec!(10.00)),
        doc(DocumentKind::Cash, "ТЧ-2", day(1), dec!(20.00)),
        doc(DocumentKind::Cashless, "БН-1", day(2), dec!(5.00)),
    ];

    let report = ReportService::generate(&ReportQuery::default(), &documents).unwrap();

    assert_eq!(report.grand_total, dec!(35.00));
    assert_eq!(report.groups.len(), 2);

    let cash = &report.groups[0];
    assert_eq!(cash.kind, DocumentKind::Cash);
    assert_eq!(cash.total, dec!(30.00));
    assert_eq!(cash.dates.len(), 1);
    assert_eq!(cash.dates[0].date, day(1));
    assert_eq!(cash.dates[0].total, dec!(30.00));
    assert_eq!(cash.dates[0].documents.len(), 2);
    assert_eq!(cash.dates[0].documents[0].number, "ТЧ-1");
    assert_eq!(cash.dates[0].documents[1].number, "ТЧ-2");

    let cashless = &report.groups[1];
    assert_eq!(cashless.kind, DocumentKind::Cashless);
    assert_eq!(cashless.total, dec!(5.00));
    assert_eq!(cashless.dates.len(), 1);
    assert_eq!(cashless.dates[0].total, dec!(5.00));
}

#[test]
fn test_types_appear_in_first_encounter_order() {
    // The cashless document comes first chronologically, so its group leads
    // even though the input slice starts with cash documents.
    let documents = vec![
        doc(DocumentKind::Cash, "ТЧ-1", day(5), dec!(10.00)),
        doc(DocumentKind::Cashless, "БН-1", day(3), dec!(5.00)),
        doc(DocumentKind::Cash, "ТЧ-2", day(4), dec!(20.00)),
    ];

    let report = ReportService::generate(&ReportQuery::default(), &documents).unwrap();

    assert_eq!(report.groups[0].kind, DocumentKind::Cashless);
    assert_eq!(report.groups[1].kind, DocumentKind::Cash);
    // Dates within the cash group stay chronological.
    assert_eq!(report.groups[1].dates[0].date, day(4));
    assert_eq!(report.groups[1].dates[1].date, day(5));
}

#[test]
fn test_type_filter() {
    let documents = vec![
        doc(DocumentKind::Cash, "ТЧ-1", day(1), dec!(10.00)),
        doc(DocumentKind::Return, "ВР-1", day(2), dec!(4.00)),
    ];

    let query = ReportQuery {
        report_type: Some(DocumentKind::Return),
        ..ReportQuery::default()
    };
    let report = ReportService::generate(&query, &documents).unwrap();

    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.groups[0].kind, DocumentKind::Return);
    assert_eq!(report.groups[0].type_name, "Возврат товара");
    assert_eq!(report.grand_total, dec!(4.00));
}

#[test]
fn test_date_bounds_are_inclusive() {
    let documents = vec![
        doc(DocumentKind::Cash, "ТЧ-1", day(1), dec!(1.00)),
        doc(DocumentKind::Cash, "ТЧ-2", day(2), dec!(2.00)),
        doc(DocumentKind::Cash, "ТЧ-3", day(3), dec!(4.00)),
        doc(DocumentKind::Cash, "ТЧ-4", day(4), dec!(8.00)),
    ];

    let query = ReportQuery {
        report_type: None,
        start_date: Some(day(2)),
        end_date: Some(day(3)),
    };
    let report = ReportService::generate(&query, &documents).unwrap();

    assert_eq!(report.grand_total, dec!(6.00));
    let numbers: Vec<&str> = report.groups[0]
        .dates
        .iter()
        .flat_map(|d| d.documents.iter().map(|l| l.number.as_str()))
        .collect();
    assert_eq!(numbers, vec!["ТЧ-2", "ТЧ-3"]);
}

#[test]
fn test_open_ended_bounds() {
    let documents = vec![
        doc(DocumentKind::Cash, "ТЧ-1", day(1), dec!(1.00)),
        doc(DocumentKind::Cash, "ТЧ-2", day(10), dec!(2.00)),
    ];

    let from_only = ReportQuery {
        start_date: Some(day(5)),
        ..ReportQuery::default()
    };
    assert_eq!(
        ReportService::generate(&from_only, &documents)
            .unwrap()
            .grand_total,
        dec!(2.00)
    );

    let until_only = ReportQuery {
        end_date: Some(day(5)),
        ..ReportQuery::default()
    };
    assert_eq!(
        ReportService::generate(&until_only, &documents)
            .unwrap()
            .grand_total,
        dec!(1.00)
    );
}

#[test]
fn test_inverted_range_rejected() {
    let query = ReportQuery {
        report_type: None,
        start_date: Some(day(9)),
        end_date: Some(day(1)),
    };
    let err = ReportService::generate(&query, &[]).unwrap_err();
    assert_eq!(
        err,
        ReportError::InvalidDateRange {
            start: day(9),
            end: day(1),
        }
    );
    assert!(ReportService::validate_query(&query).is_err());
}

#[test]
fn test_report_is_deterministic() {
    let documents = vec![
        doc(DocumentKind::Cash, "ТЧ-1", day(1), dec!(10.00)),
        doc(DocumentKind::Return, "ВР-1", day(1), dec!(3.00)),
    ];
    let query = ReportQuery::default();

    let first = ReportService::generate(&query, &documents).unwrap();
    let second = ReportService::generate(&query, &documents).unwrap();

    assert_eq!(first.grand_total, second.grand_total);
    assert_eq!(first.groups.len(), second.groups.len());
    for (a, b) in first.groups.iter().zip(second.groups.iter()) {
        assert_eq!(a.kind, b.kind);
        assert_eq!(a.total, b.total);
    }
}
