//! Invoice repository.
//!
//! Invoices are pre-sale bills issued to company customers. Creating one
//! assigns the next "СЧ" number, debits stock for every line, and derives
//! the total; marking one paid spawns its cashless sale document exactly
//! once. All compound operations run inside a single transaction.

use std::collections::HashSet;

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::debug;
use uuid::Uuid;

use lavka_core::documents::{
    DocumentError, DocumentValidator, InvoiceRef, ItemInput, LineAmount, document_total,
};
use lavka_core::numbering::{Series, next_number};
use lavka_core::stock::{StockError, StockService};
use lavka_shared::AppError;
use lavka_shared::types::PageRequest;

use crate::entities::{
    customers, invoice_items, invoices, products, sale_documents,
    sea_orm_active_enums::DocType,
};

/// Error types for invoice operations.
#[derive(Debug, thiserror::Error)]
pub enum InvoiceError {
    /// Invoice not found.
    #[error("Invoice not found: {0}")]
    NotFound(Uuid),

    /// Invoice line item not found.
    #[error("Invoice item not found: {0}")]
    ItemNotFound(Uuid),

    /// Customer not found.
    #[error("Customer not found: {0}")]
    CustomerNotFound(Uuid),

    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    /// A product may appear on an invoice only once.
    #[error("Product {0} is already on this invoice")]
    DuplicateProduct(Uuid),

    /// Document validation failed.
    #[error(transparent)]
    Validation(#[from] DocumentError),

    /// Stock adjustment failed.
    #[error(transparent)]
    Stock(#[from] StockError),

    /// Invoice is referenced by a sale document and cannot be deleted.
    #[error("Cannot delete invoice {0}: a sale document references it")]
    Referenced(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<InvoiceError> for AppError {
    fn from(err: InvoiceError) -> Self {
        match err {
            InvoiceError::NotFound(_)
            | InvoiceError::ItemNotFound(_)
            | InvoiceError::CustomerNotFound(_)
            | InvoiceError::ProductNotFound(_) => Self::NotFound(err.to_string()),
            InvoiceError::DuplicateProduct(_) => Self::Conflict(err.to_string()),
            InvoiceError::Validation(e) => e.into(),
            InvoiceError::Stock(e) => e.into(),
            InvoiceError::Referenced(_) => Self::Protected(err.to_string()),
            InvoiceError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating an invoice.
#[derive(Debug, Clone)]
pub struct CreateInvoiceInput {
    /// The customer billed (must be a company).
    pub customer_id: Uuid,
    /// Invoice date; defaults to today.
    pub date: Option<NaiveDate>,
    /// Line items.
    pub items: Vec<ItemInput>,
}

/// An invoice together with its line items.
#[derive(Debug, Clone)]
pub struct InvoiceWithItems {
    /// Invoice header.
    pub invoice: invoices::Model,
    /// Line items.
    pub items: Vec<invoice_items::Model>,
}

/// Invoice repository.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    db: DatabaseConnection,
}

impl InvoiceRepository {
    /// Creates a new invoice repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an invoice with its line items.
    ///
    /// Assigns the next number in the "СЧ" series, debits stock for every
    /// line, and derives the total, all in one transaction.
    pub async fn create(&self, input: CreateInvoiceInput) -> Result<InvoiceWithItems, InvoiceError> {
        let txn = self.db.begin().await?;

        let customer = customers::Entity::find_by_id(input.customer_id)
            .one(&txn)
            .await?
            .ok_or(InvoiceError::CustomerNotFound(input.customer_id))?;
        DocumentValidator::validate_invoice_customer(customer.is_company)?;

        let numbers: Vec<String> = invoices::Entity::find()
            .select_only()
            .column(invoices::Column::Number)
            .into_tuple()
            .all(&txn)
            .await?;
        let number = next_number(Series::Invoice, numbers.iter().map(String::as_str));

        let invoice_id = Uuid::new_v4();
        let now = chrono::Utc::now();
        let invoice = invoices::ActiveModel {
            id: Set(invoice_id),
            number: Set(number),
            date: Set(input.date.unwrap_or_else(|| now.date_naive())),
            customer_id: Set(customer.id),
            is_paid: Set(false),
            total: Set(rust_decimal::Decimal::new(0, 2)),
            created_at: Set(now.into()),
        };
        let invoice = invoice.insert(&txn).await?;

        let mut seen = HashSet::new();
        let mut items = Vec::with_capacity(input.items.len());
        for item in &input.items {
            if !seen.insert(item.product_id) {
                return Err(InvoiceError::DuplicateProduct(item.product_id));
            }
            items.push(insert_invoice_item(&txn, invoice_id, item).await?);
        }

        let invoice = recompute_total(&txn, invoice).await?;

        txn.commit().await?;
        Ok(InvoiceWithItems { invoice, items })
    }

    /// Finds an invoice with its line items.
    pub async fn find_with_items(&self, id: Uuid) -> Result<Option<InvoiceWithItems>, InvoiceError> {
        let Some(invoice) = invoices::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        let items = invoice_items::Entity::find()
            .filter(invoice_items::Column::InvoiceId.eq(id))
            .order_by_asc(invoice_items::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(Some(InvoiceWithItems { invoice, items }))
    }

    /// Lists invoices, newest first, with the total count.
    pub async fn list(
        &self,
        page: &PageRequest,
    ) -> Result<(Vec<invoices::Model>, u64), InvoiceError> {
        let total = invoices::Entity::find().count(&self.db).await?;
        let rows = invoices::Entity::find()
            .order_by_desc(invoices::Column::Date)
            .order_by_desc(invoices::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;
        Ok((rows, total))
    }

    /// Lists a customer's unpaid invoices, oldest first.
    pub async fn unpaid_for_customer(
        &self,
        customer_id: Uuid,
    ) -> Result<Vec<invoices::Model>, InvoiceError> {
        Ok(invoices::Entity::find()
            .filter(invoices::Column::CustomerId.eq(customer_id))
            .filter(invoices::Column::IsPaid.eq(false))
            .order_by_asc(invoices::Column::Date)
            .order_by_asc(invoices::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Marks an invoice paid and spawns its cashless sale document.
    ///
    /// The document is created at most once per invoice: the existence check
    /// runs inside the same transaction as the flag update, so paying an
    /// already-paid invoice again returns the invoice unchanged with no new
    /// document.
    pub async fn mark_paid(
        &self,
        id: Uuid,
    ) -> Result<(invoices::Model, Option<sale_documents::Model>), InvoiceError> {
        let txn = self.db.begin().await?;

        let invoice = invoices::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(InvoiceError::NotFound(id))?;

        let has_linked_document = sale_documents::Entity::find()
            .filter(sale_documents::Column::InvoiceId.eq(id))
            .count(&txn)
            .await?
            > 0;

        let invoice = if invoice.is_paid {
            invoice
        } else {
            let mut paid: invoices::ActiveModel = invoice.into();
            paid.is_paid = Set(true);
            paid.update(&txn).await?
        };

        let invoice_ref = InvoiceRef {
            id: invoice.id,
            number: invoice.number.clone(),
            customer_id: invoice.customer_id,
            is_paid: invoice.is_paid,
            total: invoice.total,
            has_linked_document,
        };

        let document = if DocumentValidator::payment_spawns_document(&invoice_ref) {
            let numbers: Vec<String> = sale_documents::Entity::find()
                .filter(sale_documents::Column::DocType.eq(DocType::Cashless))
                .select_only()
                .column(sale_documents::Column::Number)
                .into_tuple()
                .all(&txn)
                .await?;
            let number = next_number(Series::Cashless, numbers.iter().map(String::as_str));
            debug!(invoice = %invoice.number, document = %number, "spawning cashless sale for paid invoice");

            let now = chrono::Utc::now();
            let document = sale_documents::ActiveModel {
                id: Set(Uuid::new_v4()),
                doc_type: Set(DocType::Cashless),
                number: Set(number),
                date: Set(now.date_naive()),
                // Copied from the invoice; stands until items change.
                total: Set(invoice.total),
                customer_id: Set(invoice.customer_id),
                invoice_id: Set(Some(invoice.id)),
                cash_register: Set(None),
                original_sale_id: Set(None),
                reason: Set(None),
                created_at: Set(now.into()),
            };
            Some(document.insert(&txn).await?)
        } else {
            None
        };

        txn.commit().await?;
        Ok((invoice, document))
    }

    /// Adds a line item to an invoice.
    pub async fn add_item(
        &self,
        invoice_id: Uuid,
        item: ItemInput,
    ) -> Result<InvoiceWithItems, InvoiceError> {
        let txn = self.db.begin().await?;

        let invoice = invoices::Entity::find_by_id(invoice_id)
            .one(&txn)
            .await?
            .ok_or(InvoiceError::NotFound(invoice_id))?;

        let duplicate = invoice_items::Entity::find()
            .filter(invoice_items::Column::InvoiceId.eq(invoice_id))
            .filter(invoice_items::Column::ProductId.eq(item.product_id))
            .count(&txn)
            .await?
            > 0;
        if duplicate {
            return Err(InvoiceError::DuplicateProduct(item.product_id));
        }

        insert_invoice_item(&txn, invoice_id, &item).await?;
        let invoice = recompute_total(&txn, invoice).await?;
        let items = items_of(&txn, invoice_id).await?;

        txn.commit().await?;
        Ok(InvoiceWithItems { invoice, items })
    }

    /// Changes the quantity of an invoice line item.
    ///
    /// The previous quantity's stock effect is reversed, then the new one is
    /// validated and applied as if the line were freshly created.
    pub async fn update_item_quantity(
        &self,
        invoice_id: Uuid,
        item_id: Uuid,
        quantity: i32,
    ) -> Result<InvoiceWithItems, InvoiceError> {
        let txn = self.db.begin().await?;

        let invoice = invoices::Entity::find_by_id(invoice_id)
            .one(&txn)
            .await?
            .ok_or(InvoiceError::NotFound(invoice_id))?;
        let item = invoice_items::Entity::find_by_id(item_id)
            .one(&txn)
            .await?
            .filter(|item| item.invoice_id == invoice_id)
            .ok_or(InvoiceError::ItemNotFound(item_id))?;

        let product = load_product(&txn, item.product_id).await?;
        let on_hand =
            StockService::change_sale_item(product.id, product.quantity, item.quantity, quantity)?;
        set_product_quantity(&txn, product, on_hand).await?;

        let mut item: invoice_items::ActiveModel = item.into();
        item.quantity = Set(quantity);
        item.update(&txn).await?;

        let invoice = recompute_total(&txn, invoice).await?;
        let items = items_of(&txn, invoice_id).await?;

        txn.commit().await?;
        Ok(InvoiceWithItems { invoice, items })
    }

    /// Removes a line item from an invoice, returning its stock.
    pub async fn remove_item(
        &self,
        invoice_id: Uuid,
        item_id: Uuid,
    ) -> Result<InvoiceWithItems, InvoiceError> {
        let txn = self.db.begin().await?;

        let invoice = invoices::Entity::find_by_id(invoice_id)
            .one(&txn)
            .await?
            .ok_or(InvoiceError::NotFound(invoice_id))?;
        let item = invoice_items::Entity::find_by_id(item_id)
            .one(&txn)
            .await?
            .filter(|item| item.invoice_id == invoice_id)
            .ok_or(InvoiceError::ItemNotFound(item_id))?;

        let product = load_product(&txn, item.product_id).await?;
        let on_hand = StockService::revert_sale_item(product.quantity, item.quantity);
        set_product_quantity(&txn, product, on_hand).await?;

        invoice_items::Entity::delete_by_id(item.id).exec(&txn).await?;

        let invoice = recompute_total(&txn, invoice).await?;
        let items = items_of(&txn, invoice_id).await?;

        txn.commit().await?;
        Ok(InvoiceWithItems { invoice, items })
    }

    /// Deletes an invoice, reversing its items' stock debits.
    ///
    /// Invoice numbers are not compacted on delete; only sale document
    /// series are.
    pub async fn delete(&self, id: Uuid) -> Result<(), InvoiceError> {
        let txn = self.db.begin().await?;

        let invoice = invoices::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(InvoiceError::NotFound(id))?;

        let referenced = sale_documents::Entity::find()
            .filter(sale_documents::Column::InvoiceId.eq(id))
            .count(&txn)
            .await?
            > 0;
        if referenced {
            return Err(InvoiceError::Referenced(id));
        }

        let items = items_of(&txn, id).await?;
        for item in &items {
            let product = load_product(&txn, item.product_id).await?;
            let on_hand = StockService::revert_sale_item(product.quantity, item.quantity);
            set_product_quantity(&txn, product, on_hand).await?;
        }

        // Items cascade with the invoice.
        invoices::Entity::delete_by_id(invoice.id).exec(&txn).await?;

        txn.commit().await?;
        Ok(())
    }
}

/// Validates and inserts one invoice line, debiting stock.
async fn insert_invoice_item(
    txn: &DatabaseTransaction,
    invoice_id: Uuid,
    item: &ItemInput,
) -> Result<invoice_items::Model, InvoiceError> {
    let product = load_product(txn, item.product_id).await?;
    let on_hand = StockService::apply_sale_item(product.id, product.quantity, item.quantity)?;
    let price = item.price.unwrap_or(product.price);
    set_product_quantity(txn, product, on_hand).await?;

    let row = invoice_items::ActiveModel {
        id: Set(Uuid::new_v4()),
        invoice_id: Set(invoice_id),
        product_id: Set(item.product_id),
        quantity: Set(item.quantity),
        price: Set(price),
        created_at: Set(chrono::Utc::now().into()),
    };
    Ok(row.insert(txn).await?)
}

async fn load_product(
    txn: &DatabaseTransaction,
    product_id: Uuid,
) -> Result<products::Model, InvoiceError> {
    products::Entity::find_by_id(product_id)
        .one(txn)
        .await?
        .ok_or(InvoiceError::ProductNotFound(product_id))
}

async fn set_product_quantity(
    txn: &DatabaseTransaction,
    product: products::Model,
    quantity: i32,
) -> Result<(), InvoiceError> {
    let mut product: products::ActiveModel = product.into();
    product.quantity = Set(quantity);
    product.updated_at = Set(chrono::Utc::now().into());
    product.update(txn).await?;
    Ok(())
}

async fn items_of(
    txn: &DatabaseTransaction,
    invoice_id: Uuid,
) -> Result<Vec<invoice_items::Model>, InvoiceError> {
    Ok(invoice_items::Entity::find()
        .filter(invoice_items::Column::InvoiceId.eq(invoice_id))
        .order_by_asc(invoice_items::Column::CreatedAt)
        .all(txn)
        .await?)
}

/// Recomputes and persists the invoice total from its current items.
async fn recompute_total(
    txn: &DatabaseTransaction,
    invoice: invoices::Model,
) -> Result<invoices::Model, InvoiceError> {
    let lines: Vec<LineAmount> = items_of(txn, invoice.id)
        .await?
        .iter()
        .map(|item| LineAmount {
            price: item.price,
            quantity: item.quantity,
        })
        .collect();
    let total = document_total(&lines);

    let mut invoice: invoices::ActiveModel = invoice.into();
    invoice.total = Set(total);
    Ok(invoice.update(txn).await?)
}
