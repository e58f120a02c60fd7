//! Per-variant document validation and lifecycle guards.

use super::error::DocumentError;
use super::types::{DocumentDetails, InvoiceRef, NewSaleDocument, OriginalSaleRef};

/// Document validation service.
///
/// Pure checks over the draft and the referenced state the repository has
/// already loaded; runs before anything is persisted.
pub struct DocumentValidator;

impl DocumentValidator {
    /// Validates a sale document draft against its referenced records.
    ///
    /// `invoice` must be supplied for cashless drafts and `original` for
    /// return drafts; the repository resolves the IDs and passes `None` when
    /// the referenced row does not exist.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule as a [`DocumentError`].
    pub fn validate(
        draft: &NewSaleDocument,
        invoice: Option<&InvoiceRef>,
        original: Option<&OriginalSaleRef>,
    ) -> Result<(), DocumentError> {
        match &draft.details {
            DocumentDetails::Cashless { .. } => {
                let invoice = invoice.ok_or(DocumentError::InvoiceRequired)?;
                if !invoice.is_paid {
                    return Err(DocumentError::InvoiceNotPaid {
                        number: invoice.number.clone(),
                    });
                }
                if invoice.has_linked_document {
                    return Err(DocumentError::InvoiceAlreadyLinked {
                        number: invoice.number.clone(),
                    });
                }
                Ok(())
            }
            DocumentDetails::Cash { cash_register } => {
                if cash_register.trim().is_empty() {
                    return Err(DocumentError::CashRegisterRequired);
                }
                Ok(())
            }
            DocumentDetails::Return { .. } => {
                let original = original.ok_or(DocumentError::OriginalSaleRequired)?;
                if !original.kind.is_sale() {
                    return Err(DocumentError::ReturnOfReturn {
                        number: original.number.clone(),
                    });
                }
                if original.has_return {
                    return Err(DocumentError::DuplicateReturn {
                        number: original.number.clone(),
                    });
                }
                if original.customer_id != draft.customer_id {
                    return Err(DocumentError::CustomerMismatch);
                }
                Ok(())
            }
        }
    }

    /// Validates the customer of a new invoice.
    ///
    /// # Errors
    ///
    /// Invoices are issued to companies only.
    pub fn validate_invoice_customer(is_company: bool) -> Result<(), DocumentError> {
        if !is_company {
            return Err(DocumentError::CustomerNotCompany);
        }
        Ok(())
    }

    /// The invoice payment transition guard.
    ///
    /// True when marking the invoice paid must spawn its cashless sale
    /// document: the invoice is paid and nothing is linked yet. The linked
    /// check doubles as the re-entrancy guard, so saving an already-paid
    /// invoice again never creates a second document.
    #[must_use]
    pub fn payment_spawns_document(invoice: &InvoiceRef) -> bool {
        invoice.is_paid && !invoice.has_linked_document
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::types::DocumentKind;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn customer() -> Uuid {
        Uuid::new_v4()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    fn invoice_ref(customer_id: Uuid, is_paid: bool, has_linked_document: bool) -> InvoiceRef {
        InvoiceRef {
            id: Uuid::new_v4(),
            number: "СЧ-1".to_string(),
            customer_id,
            is_paid,
            total: dec!(100.00),
            has_linked_document,
        }
    }

    fn original_ref(
        customer_id: Uuid,
        kind: DocumentKind,
        has_return: bool,
    ) -> OriginalSaleRef {
        OriginalSaleRef {
            id: Uuid::new_v4(),
            number: "ТЧ-1".to_string(),
            kind,
            customer_id,
            has_return,
        }
    }

    fn cashless_draft(customer_id: Uuid, invoice_id: Uuid) -> NewSaleDocument {
        NewSaleDocument {
            customer_id,
            date: date(),
            details: DocumentDetails::Cashless { invoice_id },
        }
    }

    fn return_draft(customer_id: Uuid, original_sale_id: Uuid) -> NewSaleDocument {
        NewSaleDocument {
            customer_id,
            date: date(),
            details: DocumentDetails::Return {
                original_sale_id,
                reason: Some("брак".to_string()),
            },
        }
    }

    #[test]
    fn test_cashless_requires_invoice() {
        let c = customer();
        let draft = cashless_draft(c, Uuid::new_v4());
        assert_eq!(
            DocumentValidator::validate(&draft, None, None),
            Err(DocumentError::InvoiceRequired)
        );
    }

    #[test]
    fn test_cashless_requires_paid_invoice() {
        let c = customer();
        let invoice = invoice_ref(c, false, false);
        let draft = cashless_draft(c, invoice.id);
        assert!(matches!(
            DocumentValidator::validate(&draft, Some(&invoice), None),
            Err(DocumentError::InvoiceNotPaid { .. })
        ));
    }

    #[test]
    fn test_cashless_rejects_already_linked_invoice() {
        let c = customer();
        let invoice = invoice_ref(c, true, true);
        let draft = cashless_draft(c, invoice.id);
        assert!(matches!(
            DocumentValidator::validate(&draft, Some(&invoice), None),
            Err(DocumentError::InvoiceAlreadyLinked { .. })
        ));
    }

    #[test]
    fn test_cashless_valid() {
        let c = customer();
        let invoice = invoice_ref(c, true, false);
        let draft = cashless_draft(c, invoice.id);
        assert!(DocumentValidator::validate(&draft, Some(&invoice), None).is_ok());
    }

    #[test]
    fn test_cash_requires_register() {
        let draft = NewSaleDocument {
            customer_id: customer(),
            date: date(),
            details: DocumentDetails::Cash {
                cash_register: "   ".to_string(),
            },
        };
        assert_eq!(
            DocumentValidator::validate(&draft, None, None),
            Err(DocumentError::CashRegisterRequired)
        );
    }

    #[test]
    fn test_cash_valid() {
        let draft = NewSaleDocument {
            customer_id: customer(),
            date: date(),
            details: DocumentDetails::Cash {
                cash_register: "Касса 2".to_string(),
            },
        };
        assert!(DocumentValidator::validate(&draft, None, None).is_ok());
    }

    #[test]
    fn test_return_requires_original() {
        let draft = return_draft(customer(), Uuid::new_v4());
        assert_eq!(
            DocumentValidator::validate(&draft, None, None),
            Err(DocumentError::OriginalSaleRequired)
        );
    }

    #[test]
    fn test_return_of_return_rejected() {
        let c = customer();
        let original = original_ref(c, DocumentKind::Return, false);
        let draft = return_draft(c, original.id);
        assert!(matches!(
            DocumentValidator::validate(&draft, None, Some(&original)),
            Err(DocumentError::ReturnOfReturn { .. })
        ));
    }

    #[test]
    fn test_double_return_rejected() {
        let c = customer();
        let original = original_ref(c, DocumentKind::Cash, true);
        let draft = return_draft(c, original.id);
        assert!(matches!(
            DocumentValidator::validate(&draft, None, Some(&original)),
            Err(DocumentError::DuplicateReturn { .. })
        ));
    }

    #[test]
    fn test_return_customer_must_match() {
        let original = original_ref(customer(), DocumentKind::Cash, false);
        let draft = return_draft(customer(), original.id);
        assert_eq!(
            DocumentValidator::validate(&draft, None, Some(&original)),
            Err(DocumentError::CustomerMismatch)
        );
    }

    #[test]
    fn test_return_valid_against_cashless() {
        let c = customer();
        let original = original_ref(c, DocumentKind::Cashless, false);
        let draft = return_draft(c, original.id);
        assert!(DocumentValidator::validate(&draft, None, Some(&original)).is_ok());
    }

    #[test]
    fn test_invoice_customer_must_be_company() {
        assert_eq!(
            DocumentValidator::validate_invoice_customer(false),
            Err(DocumentError::CustomerNotCompany)
        );
        assert!(DocumentValidator::validate_invoice_customer(true).is_ok());
    }

    #[test]
    fn test_payment_spawns_document_once() {
        let c = customer();
        let unpaid = invoice_ref(c, false, false);
        assert!(!DocumentValidator::payment_spawns_document(&unpaid));

        let paid = invoice_ref(c, true, false);
        assert!(DocumentValidator::payment_spawns_document(&paid));

        let paid_and_linked = invoice_ref(c, true, true);
        assert!(!DocumentValidator::payment_spawns_document(&paid_and_linked));
    }
}
