//! Document validation error types.

use thiserror::Error;

use lavka_shared::AppError;

/// Errors raised when validating a document before persistence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// A cashless sale needs an invoice.
    #[error("A cashless sale requires an invoice")]
    InvoiceRequired,

    /// The linked invoice has not been paid yet.
    #[error("Invoice {number} must be paid before creating a sale")]
    InvoiceNotPaid {
        /// The invoice number.
        number: String,
    },

    /// The invoice already has a sale document.
    #[error("Invoice {number} already has a linked sale document")]
    InvoiceAlreadyLinked {
        /// The invoice number.
        number: String,
    },

    /// A cash sale needs a register/department identifier.
    #[error("A cash sale requires a cash register identifier")]
    CashRegisterRequired,

    /// A return needs an original sale.
    #[error("A return requires the original sale")]
    OriginalSaleRequired,

    /// A return cannot be created against another return.
    #[error("Document {number} is itself a return; cannot return a return")]
    ReturnOfReturn {
        /// The referenced document's number.
        number: String,
    },

    /// The original sale already has a return.
    #[error("Sale {number} already has a return")]
    DuplicateReturn {
        /// The original sale's number.
        number: String,
    },

    /// A return must be issued to the customer of the original sale.
    #[error("Return customer does not match the original sale's customer")]
    CustomerMismatch,

    /// Invoices are issued to companies only.
    #[error("Invoices can only be issued to company customers")]
    CustomerNotCompany,
}

impl DocumentError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvoiceRequired => "INVOICE_REQUIRED",
            Self::InvoiceNotPaid { .. } => "INVOICE_NOT_PAID",
            Self::InvoiceAlreadyLinked { .. } => "INVOICE_ALREADY_LINKED",
            Self::CashRegisterRequired => "CASH_REGISTER_REQUIRED",
            Self::OriginalSaleRequired => "ORIGINAL_SALE_REQUIRED",
            Self::ReturnOfReturn { .. } => "RETURN_OF_RETURN",
            Self::DuplicateReturn { .. } => "DUPLICATE_RETURN",
            Self::CustomerMismatch => "CUSTOMER_MISMATCH",
            Self::CustomerNotCompany => "CUSTOMER_NOT_COMPANY",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - a required field is missing
            Self::InvoiceRequired | Self::CashRegisterRequired | Self::OriginalSaleRequired => 400,

            // 422 Unprocessable - the referenced state breaks a business rule
            Self::InvoiceNotPaid { .. }
            | Self::ReturnOfReturn { .. }
            | Self::CustomerMismatch
            | Self::CustomerNotCompany => 422,

            // 409 Conflict - a one-to-one link already exists
            Self::InvoiceAlreadyLinked { .. } | Self::DuplicateReturn { .. } => 409,
        }
    }
}

impl From<DocumentError> for AppError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::InvoiceRequired
            | DocumentError::CashRegisterRequired
            | DocumentError::OriginalSaleRequired => Self::Validation(err.to_string()),
            DocumentError::InvoiceAlreadyLinked { .. } | DocumentError::DuplicateReturn { .. } => {
                Self::Conflict(err.to_string())
            }
            _ => Self::BusinessRule(err.to_string()),
        }
    }
}
