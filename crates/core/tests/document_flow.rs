//! End-to-end exercise of the business rules the way the repository layer
//! drives them: numbering, stock adjustment, validation, and total
//! recalculation working together over an in-memory ledger.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use lavka_core::documents::{
    DocumentDetails, DocumentKind, DocumentValidator, InvoiceRef, LineAmount, NewSaleDocument,
    OriginalSaleRef, document_total,
};
use lavka_core::numbering::{Series, compaction_plan, next_number};
use lavka_core::stock::{StockError, StockService};

struct Ledger {
    product_on_hand: i32,
    product_price: Decimal,
    documents: Vec<Document>,
    return_links: Vec<(Uuid, Uuid)>,
}

struct Document {
    id: Uuid,
    kind: DocumentKind,
    number: String,
    customer_id: Uuid,
    items: Vec<(Uuid, i32, Decimal)>,
    total: Decimal,
}

impl Ledger {
    fn new(on_hand: i32, price: Decimal) -> Self {
        Self {
            product_on_hand: on_hand,
            product_price: price,
            documents: Vec::new(),
            return_links: Vec::new(),
        }
    }

    fn numbers_of(&self, kind: DocumentKind) -> Vec<&str> {
        self.documents
            .iter()
            .filter(|d| d.kind == kind)
            .map(|d| d.number.as_str())
            .collect()
    }

    fn create_cash_sale(
        &mut self,
        customer_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<Uuid, StockError> {
        let draft = NewSaleDocument {
            customer_id,
            date: NaiveDate::from_ymd_opt(2026, 5, 20).unwrap(),
            details: DocumentDetails::Cash {
                cash_register: "Касса 1".to_string(),
            },
        };
        DocumentValidator::validate(&draft, None, None).unwrap();

        self.product_on_hand =
            StockService::apply_sale_item(product_id, self.product_on_hand, quantity)?;

        let number = next_number(Series::Cash, self.numbers_of(DocumentKind::Cash));
        let items = vec![(product_id, quantity, self.product_price)];
        let total = document_total(
            &items
                .iter()
                .map(|&(_, quantity, price)| LineAmount { price, quantity })
                .collect::<Vec<_>>(),
        );

        let id = Uuid::new_v4();
        self.documents.push(Document {
            id,
            kind: DocumentKind::Cash,
            number,
            customer_id,
            items,
            total,
        });
        Ok(id)
    }

    fn create_return(
        &mut self,
        customer_id: Uuid,
        original_sale_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<Uuid, String> {
        let original = self
            .documents
            .iter()
            .find(|d| d.id == original_sale_id)
            .expect("original sale exists");
        let original_ref = OriginalSaleRef {
            id: original.id,
            number: original.number.clone(),
            kind: original.kind,
            customer_id: original.customer_id,
            has_return: self
                .return_links
                .iter()
                .any(|&(_, target)| target == original_sale_id),
        };
        let sold = original
            .items
            .iter()
            .find(|&&(p, _, _)| p == product_id)
            .map(|&(_, q, _)| q);

        let draft = NewSaleDocument {
            customer_id,
            date: NaiveDate::from_ymd_opt(2026, 5, 21).unwrap(),
            details: DocumentDetails::Return {
                original_sale_id,
                reason: None,
            },
        };
        DocumentValidator::validate(&draft, None, Some(&original_ref))
            .map_err(|e| e.to_string())?;

        self.product_on_hand =
            StockService::apply_return_item(product_id, self.product_on_hand, quantity, sold)
                .map_err(|e| e.to_string())?;

        let number = next_number(Series::Return, self.numbers_of(DocumentKind::Return));
        let price = original
            .items
            .iter()
            .find(|&&(p, _, _)| p == product_id)
            .map(|&(_, _, price)| price)
            .expect("validated above");
        let total = document_total(&[LineAmount { price, quantity }]);

        let id = Uuid::new_v4();
        self.return_links.push((id, original_sale_id));
        self.documents.push(Document {
            id,
            kind: DocumentKind::Return,
            number,
            customer_id,
            items: vec![(product_id, quantity, price)],
            total,
        });
        Ok(id)
    }

    fn delete_document(&mut self, id: Uuid) {
        let index = self
            .documents
            .iter()
            .position(|d| d.id == id)
            .expect("document exists");
        let removed = self.documents.remove(index);
        self.return_links.retain(|&(return_id, _)| return_id != id);

        for (product_id, quantity, _) in &removed.items {
            self.product_on_hand = match removed.kind {
                DocumentKind::Return => {
                    StockService::revert_return_item(*product_id, self.product_on_hand, *quantity)
                        .expect("stock available to revert")
                }
                _ => StockService::revert_sale_item(self.product_on_hand, *quantity),
            };
        }

        let survivors: Vec<(Uuid, String)> = self
            .documents
            .iter()
            .filter(|d| d.kind == removed.kind)
            .map(|d| (d.id, d.number.clone()))
            .collect();
        for (doc_id, new_number) in
            compaction_plan(removed.kind.series(), &removed.number, &survivors)
        {
            if let Some(doc) = self.documents.iter_mut().find(|d| d.id == doc_id) {
                doc.number = new_number;
            }
        }
    }
}

#[test]
fn widget_sale_and_return_scenario() {
    // Product "Widget": quantity 10, price 5.00.
    let customer = Uuid::new_v4();
    let widget = Uuid::new_v4();
    let mut ledger = Ledger::new(10, dec!(5.00));

    // Cash sale of 3 widgets.
    let sale = ledger.create_cash_sale(customer, widget, 3).unwrap();
    assert_eq!(ledger.product_on_hand, 7);
    let sale_doc = ledger.documents.iter().find(|d| d.id == sale).unwrap();
    assert_eq!(sale_doc.total, dec!(15.00));
    assert_eq!(sale_doc.number, "ТЧ-1");

    // Return 2 of them.
    let ret = ledger.create_return(customer, sale, widget, 2).unwrap();
    assert_eq!(ledger.product_on_hand, 9);
    let ret_doc = ledger.documents.iter().find(|d| d.id == ret).unwrap();
    assert_eq!(ret_doc.total, dec!(10.00));
    assert_eq!(ret_doc.number, "ВР-1");

    // A second return against the same sale is rejected.
    let err = ledger.create_return(customer, sale, widget, 1).unwrap_err();
    assert!(err.contains("already has a return"), "got: {err}");
    assert_eq!(ledger.product_on_hand, 9);
}

#[test]
fn oversell_is_rejected_and_stock_untouched() {
    let customer = Uuid::new_v4();
    let widget = Uuid::new_v4();
    let mut ledger = Ledger::new(2, dec!(5.00));

    let err = ledger.create_cash_sale(customer, widget, 3).unwrap_err();
    assert!(matches!(err, StockError::InsufficientStock { .. }));
    assert_eq!(ledger.product_on_hand, 2);
    assert!(ledger.documents.is_empty());
}

#[test]
fn return_cannot_exceed_sold_quantity() {
    let customer = Uuid::new_v4();
    let widget = Uuid::new_v4();
    let mut ledger = Ledger::new(10, dec!(5.00));

    let sale = ledger.create_cash_sale(customer, widget, 3).unwrap();
    let err = ledger.create_return(customer, sale, widget, 4).unwrap_err();
    assert!(err.contains("exceeds the original sale"), "got: {err}");
    assert_eq!(ledger.product_on_hand, 7);
}

#[test]
fn deleting_a_document_compacts_the_series() {
    let customer = Uuid::new_v4();
    let widget = Uuid::new_v4();
    let mut ledger = Ledger::new(100, dec!(1.00));

    let _first = ledger.create_cash_sale(customer, widget, 1).unwrap();
    let second = ledger.create_cash_sale(customer, widget, 1).unwrap();
    let _third = ledger.create_cash_sale(customer, widget, 1).unwrap();
    assert_eq!(
        ledger.numbers_of(DocumentKind::Cash),
        vec!["ТЧ-1", "ТЧ-2", "ТЧ-3"]
    );

    ledger.delete_document(second);
    assert_eq!(
        ledger.numbers_of(DocumentKind::Cash),
        vec!["ТЧ-1", "ТЧ-2"]
    );
    // Stock from the deleted sale came back.
    assert_eq!(ledger.product_on_hand, 98);

    // The next cash sale takes the freed tail number.
    ledger.create_cash_sale(customer, widget, 1).unwrap();
    assert_eq!(
        ledger.numbers_of(DocumentKind::Cash),
        vec!["ТЧ-1", "ТЧ-2", "ТЧ-3"]
    );
}

#[test]
fn paying_an_invoice_spawns_exactly_one_document() {
    let customer = Uuid::new_v4();

    // Unpaid: nothing to spawn.
    let mut invoice = InvoiceRef {
        id: Uuid::new_v4(),
        number: "СЧ-1".to_string(),
        customer_id: customer,
        is_paid: false,
        total: dec!(250.00),
        has_linked_document: false,
    };
    assert!(!DocumentValidator::payment_spawns_document(&invoice));

    // Paid and unlinked: spawn once.
    invoice.is_paid = true;
    assert!(DocumentValidator::payment_spawns_document(&invoice));

    // A repeated save sees the link and does nothing.
    invoice.has_linked_document = true;
    assert!(!DocumentValidator::payment_spawns_document(&invoice));
}
