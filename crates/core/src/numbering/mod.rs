//! Sequential document numbering per series.
//!
//! Every invoice and sale document carries a human-readable number of the
//! form `<PREFIX>-<integer>`. Numbers within a series form a gapless run
//! starting at 1. This module implements:
//! - Number parsing and formatting
//! - Next-number assignment by scanning existing numbers
//! - Compaction planning after a sale document is deleted
//!
//! The scan-and-assign step is only correct when executed inside the same
//! database transaction as the insert; the repository layer owns that
//! boundary.

pub mod series;

#[cfg(test)]
mod series_props;

pub use series::{Series, compaction_plan, next_number, parse_number};
