//! Stock adjustment error types.

use thiserror::Error;
use uuid::Uuid;

use lavka_shared::AppError;

/// Errors raised by the stock adjustment rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StockError {
    /// Requested quantity exceeds the available stock.
    #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        /// The product being sold.
        product_id: Uuid,
        /// The quantity requested.
        requested: i32,
        /// The quantity currently available.
        available: i32,
    },

    /// Line item quantity must be at least 1.
    #[error("Item quantity must be at least 1, got {0}")]
    QuantityNotPositive(i32),

    /// The returned product does not appear on the original sale.
    #[error("Product {product_id} is not present on the original sale")]
    ProductNotOnOriginalSale {
        /// The product being returned.
        product_id: Uuid,
    },

    /// Return quantity exceeds the quantity on the original sale.
    #[error("Return of product {product_id} exceeds the original sale: requested {requested}, sold {sold}")]
    ReturnExceedsSoldQuantity {
        /// The product being returned.
        product_id: Uuid,
        /// The quantity requested for return.
        requested: i32,
        /// The quantity on the original sale.
        sold: i32,
    },

    /// Reverting a return would drive the stock level below zero.
    #[error("Cannot revert return of product {product_id}: only {available} left in stock")]
    RevertBelowZero {
        /// The product whose return is being reverted.
        product_id: Uuid,
        /// The quantity currently available.
        available: i32,
    },
}

impl StockError {
    /// Returns the error code for API responses.
    ///
    /// Both return-item violations share one code: the caller asked for an
    /// invalid return line, whichever bound it broke.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            Self::QuantityNotPositive(_) => "QUANTITY_NOT_POSITIVE",
            Self::ProductNotOnOriginalSale { .. } | Self::ReturnExceedsSoldQuantity { .. } => {
                "INVALID_RETURN_ITEM"
            }
            Self::RevertBelowZero { .. } => "INSUFFICIENT_STOCK",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::QuantityNotPositive(_) => 400,
            Self::InsufficientStock { .. }
            | Self::ProductNotOnOriginalSale { .. }
            | Self::ReturnExceedsSoldQuantity { .. }
            | Self::RevertBelowZero { .. } => 422,
        }
    }
}

impl From<StockError> for AppError {
    fn from(err: StockError) -> Self {
        match err {
            StockError::QuantityNotPositive(_) => Self::Validation(err.to_string()),
            _ => Self::BusinessRule(err.to_string()),
        }
    }
}
