//! Document domain: types, per-variant validation, and total recalculation.
//!
//! Sale documents are a tagged union over a common envelope: cashless sales
//! carry a paid invoice, cash sales a register identifier, returns the
//! original sale. Validation runs before persistence and yields typed
//! errors; the invoice payment transition that spawns a cashless document is
//! guarded here as well.

pub mod error;
pub mod total;
pub mod types;
pub mod validation;

pub use error::DocumentError;
pub use total::{LineAmount, document_total, line_total};
pub use types::{
    DocumentDetails, DocumentKind, InvoiceRef, ItemInput, NewSaleDocument, OriginalSaleRef,
};
pub use validation::DocumentValidator;
