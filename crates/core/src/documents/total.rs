//! Total recalculation rule.
//!
//! A document's total is always the sum of its current items' price times
//! quantity. It is recomputed after every item mutation and never edited
//! independently.

use rust_decimal::Decimal;

/// The amount-bearing slice of a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineAmount {
    /// Unit price snapshot.
    pub price: Decimal,
    /// Quantity on the line.
    pub quantity: i32,
}

/// Computes the total of a single line.
#[must_use]
pub fn line_total(line: LineAmount) -> Decimal {
    line.price * Decimal::from(line.quantity)
}

/// Computes a document total over its current items.
///
/// An empty item list yields 0.00. Recomputing with the same items always
/// yields the same total.
#[must_use]
pub fn document_total(items: &[LineAmount]) -> Decimal {
    items
        .iter()
        .fold(Decimal::new(0, 2), |acc, line| acc + line_total(*line))
}
