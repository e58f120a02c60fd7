//! Stock adjustment rule.
//!
//! Product quantity is the single source of truth for sale eligibility. This
//! module implements the pure arithmetic and validation behind every line
//! item mutation:
//! - Sales (invoice items, cash/cashless document items) debit stock
//! - Returns credit stock, bounded by the original sale
//! - Edits are a compensating reversal followed by a fresh apply
//! - Deletions reverse the item's effect
//!
//! The repository layer persists the resulting counts together with the
//! parent document's total inside one transaction.

pub mod adjustment;
pub mod error;

#[cfg(test)]
mod adjustment_props;

pub use adjustment::StockService;
pub use error::StockError;
