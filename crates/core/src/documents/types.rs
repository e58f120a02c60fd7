//! Document domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::numbering::Series;

/// Sale document type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Cashless sale backed by a paid invoice.
    Cashless,
    /// Cash sale rung up on a register.
    Cash,
    /// Return of goods against an earlier sale.
    Return,
}

impl DocumentKind {
    /// Returns the number series for this document type.
    #[must_use]
    pub const fn series(self) -> Series {
        match self {
            Self::Cashless => Series::Cashless,
            Self::Cash => Series::Cash,
            Self::Return => Series::Return,
        }
    }

    /// True for the two sale types (everything except returns).
    #[must_use]
    pub const fn is_sale(self) -> bool {
        matches!(self, Self::Cashless | Self::Cash)
    }

    /// Human-readable type name used in journals and reports.
    #[must_use]
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::Cashless => "Безналичный расчет",
            Self::Cash => "Наличный расчет",
            Self::Return => "Возврат товара",
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cashless => write!(f, "cashless"),
            Self::Cash => write!(f, "cash"),
            Self::Return => write!(f, "return"),
        }
    }
}

impl std::str::FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cashless" => Ok(Self::Cashless),
            "cash" => Ok(Self::Cash),
            "return" => Ok(Self::Return),
            _ => Err(format!("Unknown document type: {s}")),
        }
    }
}

/// Type-specific document details.
///
/// One variant per document type instead of a row of nullable columns; the
/// storage layer flattens this back out, the domain never sees the nulls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DocumentDetails {
    /// Cashless sale: settled against a paid invoice.
    Cashless {
        /// The paid invoice this sale settles.
        invoice_id: Uuid,
    },
    /// Cash sale: identified by the register/department that rang it up.
    Cash {
        /// Register or department identifier.
        cash_register: String,
    },
    /// Return: bounded by the original sale.
    Return {
        /// The sale the goods came from.
        original_sale_id: Uuid,
        /// Optional reason for the return.
        reason: Option<String>,
    },
}

impl DocumentDetails {
    /// Returns the document type of this variant.
    #[must_use]
    pub const fn kind(&self) -> DocumentKind {
        match self {
            Self::Cashless { .. } => DocumentKind::Cashless,
            Self::Cash { .. } => DocumentKind::Cash,
            Self::Return { .. } => DocumentKind::Return,
        }
    }
}

/// A sale document about to be created, before numbering and persistence.
#[derive(Debug, Clone)]
pub struct NewSaleDocument {
    /// The customer on the document.
    pub customer_id: Uuid,
    /// Document date.
    pub date: NaiveDate,
    /// Type-specific details.
    pub details: DocumentDetails,
}

/// A line item as supplied by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemInput {
    /// The product being sold or returned.
    pub product_id: Uuid,
    /// Quantity, at least 1.
    pub quantity: i32,
    /// Unit price snapshot; defaults to the product's current price.
    pub price: Option<Decimal>,
}

/// The slice of an invoice that document validation needs.
#[derive(Debug, Clone)]
pub struct InvoiceRef {
    /// Invoice ID.
    pub id: Uuid,
    /// Invoice number ("СЧ-N").
    pub number: String,
    /// The invoice's customer.
    pub customer_id: Uuid,
    /// Whether the invoice has been paid.
    pub is_paid: bool,
    /// Invoice total.
    pub total: Decimal,
    /// Whether a sale document is already linked to this invoice.
    pub has_linked_document: bool,
}

/// The slice of an original sale that return validation needs.
#[derive(Debug, Clone)]
pub struct OriginalSaleRef {
    /// Original sale document ID.
    pub id: Uuid,
    /// Original sale number.
    pub number: String,
    /// Original sale type.
    pub kind: DocumentKind,
    /// The original sale's customer.
    pub customer_id: Uuid,
    /// Whether a return already exists against this sale.
    pub has_return: bool,
}
