//! Sale document repository.
//!
//! A document save is one logical unit: per-variant validation, numbering,
//! stock adjustment for every line, and total recalculation land in a single
//! transaction or not at all. Deleting a document reverses its stock effects
//! and compacts the number series.

use std::collections::HashSet;

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::debug;
use uuid::Uuid;

use lavka_core::documents::{
    DocumentDetails, DocumentError, DocumentKind, DocumentValidator, InvoiceRef, ItemInput,
    LineAmount, NewSaleDocument, OriginalSaleRef, document_total,
};
use lavka_core::numbering::{compaction_plan, next_number};
use lavka_core::stock::{StockError, StockService};
use lavka_shared::AppError;
use lavka_shared::types::PageRequest;

use crate::entities::{
    customers, document_items, invoices, products, sale_documents,
    sea_orm_active_enums::DocType,
};

/// Error types for sale document operations.
#[derive(Debug, thiserror::Error)]
pub enum SaleDocumentError {
    /// Document not found.
    #[error("Sale document not found: {0}")]
    NotFound(Uuid),

    /// Document line item not found.
    #[error("Document item not found: {0}")]
    ItemNotFound(Uuid),

    /// Customer not found.
    #[error("Customer not found: {0}")]
    CustomerNotFound(Uuid),

    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    /// Invoice not found.
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(Uuid),

    /// Original sale not found.
    #[error("Original sale not found: {0}")]
    OriginalSaleNotFound(Uuid),

    /// A product may appear on a document only once.
    #[error("Product {0} is already on this document")]
    DuplicateProduct(Uuid),

    /// Document validation failed.
    #[error(transparent)]
    Validation(#[from] DocumentError),

    /// Stock adjustment failed.
    #[error(transparent)]
    Stock(#[from] StockError),

    /// A return references this sale; it cannot be deleted.
    #[error("Cannot delete sale {number}: a return references it")]
    HasReturn {
        /// The protected document's number.
        number: String,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<SaleDocumentError> for AppError {
    fn from(err: SaleDocumentError) -> Self {
        match err {
            SaleDocumentError::NotFound(_)
            | SaleDocumentError::ItemNotFound(_)
            | SaleDocumentError::CustomerNotFound(_)
            | SaleDocumentError::ProductNotFound(_)
            | SaleDocumentError::InvoiceNotFound(_)
            | SaleDocumentError::OriginalSaleNotFound(_) => Self::NotFound(err.to_string()),
            SaleDocumentError::DuplicateProduct(_) => Self::Conflict(err.to_string()),
            SaleDocumentError::Validation(e) => e.into(),
            SaleDocumentError::Stock(e) => e.into(),
            SaleDocumentError::HasReturn { .. } => Self::Protected(err.to_string()),
            SaleDocumentError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating a sale document.
#[derive(Debug, Clone)]
pub struct CreateSaleDocumentInput {
    /// The customer on the document.
    pub customer_id: Uuid,
    /// Document date; defaults to today.
    pub date: Option<NaiveDate>,
    /// Type-specific details.
    pub details: DocumentDetails,
    /// Line items.
    pub items: Vec<ItemInput>,
}

/// A sale document together with its line items.
#[derive(Debug, Clone)]
pub struct DocumentWithItems {
    /// Document header.
    pub document: sale_documents::Model,
    /// Line items.
    pub items: Vec<document_items::Model>,
}

/// Filters for the document journal.
#[derive(Debug, Clone, Default)]
pub struct JournalFilter {
    /// Restrict to one document type.
    pub doc_type: Option<DocumentKind>,
    /// Inclusive range start.
    pub date_from: Option<NaiveDate>,
    /// Inclusive range end.
    pub date_to: Option<NaiveDate>,
    /// Case-insensitive customer name fragment.
    pub customer: Option<String>,
}

/// Sale document repository.
#[derive(Debug, Clone)]
pub struct SaleDocumentRepository {
    db: DatabaseConnection,
}

impl SaleDocumentRepository {
    /// Creates a new sale document repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a sale document with its line items.
    ///
    /// Validates the variant against its referenced records, assigns the
    /// next number of the type's series, adjusts stock line by line (each
    /// line sees the quantity already adjusted by earlier lines of the same
    /// document), and derives the total.
    pub async fn create(
        &self,
        input: CreateSaleDocumentInput,
    ) -> Result<DocumentWithItems, SaleDocumentError> {
        let txn = self.db.begin().await?;

        let customer = customers::Entity::find_by_id(input.customer_id)
            .one(&txn)
            .await?
            .ok_or(SaleDocumentError::CustomerNotFound(input.customer_id))?;

        let invoice_ref = match &input.details {
            DocumentDetails::Cashless { invoice_id } => {
                Some(load_invoice_ref(&txn, *invoice_id).await?)
            }
            _ => None,
        };
        let original_ref = match &input.details {
            DocumentDetails::Return {
                original_sale_id, ..
            } => Some(load_original_ref(&txn, *original_sale_id).await?),
            _ => None,
        };

        let now = chrono::Utc::now();
        let draft = NewSaleDocument {
            customer_id: customer.id,
            date: input.date.unwrap_or_else(|| now.date_naive()),
            details: input.details.clone(),
        };
        DocumentValidator::validate(&draft, invoice_ref.as_ref(), original_ref.as_ref())?;

        let kind = draft.details.kind();
        let number = next_series_number(&txn, kind).await?;

        let (invoice_id, cash_register, original_sale_id, reason) = match input.details {
            DocumentDetails::Cashless { invoice_id } => (Some(invoice_id), None, None, None),
            DocumentDetails::Cash { cash_register } => (None, Some(cash_register), None, None),
            DocumentDetails::Return {
                original_sale_id,
                reason,
            } => (None, None, Some(original_sale_id), reason),
        };

        let document_id = Uuid::new_v4();
        let document = sale_documents::ActiveModel {
            id: Set(document_id),
            doc_type: Set(kind.into()),
            number: Set(number),
            date: Set(draft.date),
            total: Set(rust_decimal::Decimal::new(0, 2)),
            customer_id: Set(customer.id),
            invoice_id: Set(invoice_id),
            cash_register: Set(cash_register),
            original_sale_id: Set(original_sale_id),
            reason: Set(reason),
            created_at: Set(now.into()),
        };
        let document = document.insert(&txn).await?;

        let mut seen = HashSet::new();
        let mut items = Vec::with_capacity(input.items.len());
        for item in &input.items {
            if !seen.insert(item.product_id) {
                return Err(SaleDocumentError::DuplicateProduct(item.product_id));
            }
            items.push(insert_document_item(&txn, &document, item).await?);
        }

        let document = recompute_total(&txn, document).await?;

        txn.commit().await?;
        Ok(DocumentWithItems { document, items })
    }

    /// Finds a document with its line items.
    pub async fn find_with_items(
        &self,
        id: Uuid,
    ) -> Result<Option<DocumentWithItems>, SaleDocumentError> {
        let Some(document) = sale_documents::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        let items = document_items::Entity::find()
            .filter(document_items::Column::DocumentId.eq(id))
            .order_by_asc(document_items::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(Some(DocumentWithItems { document, items }))
    }

    /// Lists the document journal with filters, newest first.
    ///
    /// Returns `(document, customer_name)` pairs and the filtered total.
    pub async fn journal(
        &self,
        filter: &JournalFilter,
        page: &PageRequest,
    ) -> Result<(Vec<(sale_documents::Model, String)>, u64), SaleDocumentError> {
        let mut query = sale_documents::Entity::find();

        if let Some(kind) = filter.doc_type {
            query = query.filter(sale_documents::Column::DocType.eq(DocType::from(kind)));
        }
        if let Some(from) = filter.date_from {
            query = query.filter(sale_documents::Column::Date.gte(from));
        }
        if let Some(to) = filter.date_to {
            query = query.filter(sale_documents::Column::Date.lte(to));
        }
        if let Some(customer) = &filter.customer {
            let ids: Vec<Uuid> = customers::Entity::find()
                .filter(customers::Column::Name.contains(customer))
                .select_only()
                .column(customers::Column::Id)
                .into_tuple()
                .all(&self.db)
                .await?;
            query = query.filter(sale_documents::Column::CustomerId.is_in(ids));
        }

        let total = query.clone().count(&self.db).await?;

        let rows = query
            .find_also_related(customers::Entity)
            .order_by_desc(sale_documents::Column::Date)
            .order_by_asc(sale_documents::Column::DocType)
            .order_by_asc(sale_documents::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        let entries = rows
            .into_iter()
            .map(|(document, customer)| {
                let name = customer.map(|c| c.name).unwrap_or_default();
                (document, name)
            })
            .collect();
        Ok((entries, total))
    }

    /// Adds a line item to a document.
    pub async fn add_item(
        &self,
        document_id: Uuid,
        item: ItemInput,
    ) -> Result<DocumentWithItems, SaleDocumentError> {
        let txn = self.db.begin().await?;

        let document = sale_documents::Entity::find_by_id(document_id)
            .one(&txn)
            .await?
            .ok_or(SaleDocumentError::NotFound(document_id))?;

        let duplicate = document_items::Entity::find()
            .filter(document_items::Column::DocumentId.eq(document_id))
            .filter(document_items::Column::ProductId.eq(item.product_id))
            .count(&txn)
            .await?
            > 0;
        if duplicate {
            return Err(SaleDocumentError::DuplicateProduct(item.product_id));
        }

        insert_document_item(&txn, &document, &item).await?;
        let document = recompute_total(&txn, document).await?;
        let items = items_of(&txn, document_id).await?;

        txn.commit().await?;
        Ok(DocumentWithItems { document, items })
    }

    /// Changes the quantity of a document line item.
    ///
    /// The previous quantity's stock effect is reversed, then the new one is
    /// validated and applied as if freshly created.
    pub async fn update_item_quantity(
        &self,
        document_id: Uuid,
        item_id: Uuid,
        quantity: i32,
    ) -> Result<DocumentWithItems, SaleDocumentError> {
        let txn = self.db.begin().await?;

        let document = sale_documents::Entity::find_by_id(document_id)
            .one(&txn)
            .await?
            .ok_or(SaleDocumentError::NotFound(document_id))?;
        let item = document_items::Entity::find_by_id(item_id)
            .one(&txn)
            .await?
            .filter(|item| item.document_id == document_id)
            .ok_or(SaleDocumentError::ItemNotFound(item_id))?;

        let product = load_product(&txn, item.product_id).await?;
        let on_hand = match DocumentKind::from(document.doc_type.clone()) {
            DocumentKind::Return => {
                let sold = original_sold_quantity(&txn, &document, item.product_id).await?;
                StockService::change_return_item(
                    product.id,
                    product.quantity,
                    item.quantity,
                    quantity,
                    sold,
                )?
            }
            _ => StockService::change_sale_item(
                product.id,
                product.quantity,
                item.quantity,
                quantity,
            )?,
        };
        set_product_quantity(&txn, product, on_hand).await?;

        let mut item: document_items::ActiveModel = item.into();
        item.quantity = Set(quantity);
        item.update(&txn).await?;

        let document = recompute_total(&txn, document).await?;
        let items = items_of(&txn, document_id).await?;

        txn.commit().await?;
        Ok(DocumentWithItems { document, items })
    }

    /// Removes a line item from a document, reversing its stock effect.
    pub async fn remove_item(
        &self,
        document_id: Uuid,
        item_id: Uuid,
    ) -> Result<DocumentWithItems, SaleDocumentError> {
        let txn = self.db.begin().await?;

        let document = sale_documents::Entity::find_by_id(document_id)
            .one(&txn)
            .await?
            .ok_or(SaleDocumentError::NotFound(document_id))?;
        let item = document_items::Entity::find_by_id(item_id)
            .one(&txn)
            .await?
            .filter(|item| item.document_id == document_id)
            .ok_or(SaleDocumentError::ItemNotFound(item_id))?;

        let product = load_product(&txn, item.product_id).await?;
        let on_hand = match DocumentKind::from(document.doc_type.clone()) {
            DocumentKind::Return => {
                StockService::revert_return_item(product.id, product.quantity, item.quantity)?
            }
            _ => StockService::revert_sale_item(product.quantity, item.quantity),
        };
        set_product_quantity(&txn, product, on_hand).await?;

        document_items::Entity::delete_by_id(item.id).exec(&txn).await?;

        let document = recompute_total(&txn, document).await?;
        let items = items_of(&txn, document_id).await?;

        txn.commit().await?;
        Ok(DocumentWithItems { document, items })
    }

    /// Deletes a sale document.
    ///
    /// Refused while a return references it. Otherwise every item's stock
    /// effect is reversed, the row (and, by cascade, its items) is deleted,
    /// and later numbers of the same series are shifted down to keep the
    /// sequence dense.
    pub async fn delete(&self, id: Uuid) -> Result<(), SaleDocumentError> {
        let txn = self.db.begin().await?;

        let document = sale_documents::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(SaleDocumentError::NotFound(id))?;

        let has_return = sale_documents::Entity::find()
            .filter(sale_documents::Column::OriginalSaleId.eq(id))
            .count(&txn)
            .await?
            > 0;
        if has_return {
            return Err(SaleDocumentError::HasReturn {
                number: document.number,
            });
        }

        let kind = DocumentKind::from(document.doc_type.clone());
        let items = items_of(&txn, id).await?;
        for item in &items {
            let product = load_product(&txn, item.product_id).await?;
            let on_hand = match kind {
                DocumentKind::Return => {
                    StockService::revert_return_item(product.id, product.quantity, item.quantity)?
                }
                _ => StockService::revert_sale_item(product.quantity, item.quantity),
            };
            set_product_quantity(&txn, product, on_hand).await?;
        }

        // Items cascade with the document.
        sale_documents::Entity::delete_by_id(document.id)
            .exec(&txn)
            .await?;

        let survivors: Vec<(Uuid, String)> = sale_documents::Entity::find()
            .filter(sale_documents::Column::DocType.eq(document.doc_type.clone()))
            .select_only()
            .column(sale_documents::Column::Id)
            .column(sale_documents::Column::Number)
            .into_tuple()
            .all(&txn)
            .await?;
        let plan = compaction_plan(kind.series(), &document.number, &survivors);
        debug!(
            deleted = %document.number,
            renumbered = plan.len(),
            "compacting document series after delete"
        );
        for (doc_id, new_number) in plan {
            let survivor = sale_documents::ActiveModel {
                id: ActiveValue::Unchanged(doc_id),
                number: Set(new_number),
                ..Default::default()
            };
            survivor.update(&txn).await?;
        }

        txn.commit().await?;
        Ok(())
    }
}

/// Loads the validation slice of an invoice, including whether a sale
/// document is already linked to it.
async fn load_invoice_ref(
    txn: &DatabaseTransaction,
    invoice_id: Uuid,
) -> Result<InvoiceRef, SaleDocumentError> {
    let invoice = invoices::Entity::find_by_id(invoice_id)
        .one(txn)
        .await?
        .ok_or(SaleDocumentError::InvoiceNotFound(invoice_id))?;
    let has_linked_document = sale_documents::Entity::find()
        .filter(sale_documents::Column::InvoiceId.eq(invoice_id))
        .count(txn)
        .await?
        > 0;
    Ok(InvoiceRef {
        id: invoice.id,
        number: invoice.number,
        customer_id: invoice.customer_id,
        is_paid: invoice.is_paid,
        total: invoice.total,
        has_linked_document,
    })
}

/// Loads the validation slice of an original sale, including whether a
/// return already exists against it.
async fn load_original_ref(
    txn: &DatabaseTransaction,
    original_sale_id: Uuid,
) -> Result<OriginalSaleRef, SaleDocumentError> {
    let original = sale_documents::Entity::find_by_id(original_sale_id)
        .one(txn)
        .await?
        .ok_or(SaleDocumentError::OriginalSaleNotFound(original_sale_id))?;
    let has_return = sale_documents::Entity::find()
        .filter(sale_documents::Column::OriginalSaleId.eq(original_sale_id))
        .count(txn)
        .await?
        > 0;
    Ok(OriginalSaleRef {
        id: original.id,
        number: original.number,
        kind: original.doc_type.into(),
        customer_id: original.customer_id,
        has_return,
    })
}

/// Computes the next number of a document type's series.
async fn next_series_number(
    txn: &DatabaseTransaction,
    kind: DocumentKind,
) -> Result<String, SaleDocumentError> {
    let numbers: Vec<String> = sale_documents::Entity::find()
        .filter(sale_documents::Column::DocType.eq(DocType::from(kind)))
        .select_only()
        .column(sale_documents::Column::Number)
        .into_tuple()
        .all(txn)
        .await?;
    Ok(next_number(kind.series(), numbers.iter().map(String::as_str)))
}

/// The quantity of a product on the original sale of a return document.
async fn original_sold_quantity(
    txn: &DatabaseTransaction,
    document: &sale_documents::Model,
    product_id: Uuid,
) -> Result<Option<i32>, SaleDocumentError> {
    let Some(original_sale_id) = document.original_sale_id else {
        return Ok(None);
    };
    let sold = document_items::Entity::find()
        .filter(document_items::Column::DocumentId.eq(original_sale_id))
        .filter(document_items::Column::ProductId.eq(product_id))
        .one(txn)
        .await?
        .map(|item| item.quantity);
    Ok(sold)
}

/// Validates and inserts one document line, adjusting stock by the
/// document's type.
async fn insert_document_item(
    txn: &DatabaseTransaction,
    document: &sale_documents::Model,
    item: &ItemInput,
) -> Result<document_items::Model, SaleDocumentError> {
    let product = load_product(txn, item.product_id).await?;
    let on_hand = match DocumentKind::from(document.doc_type.clone()) {
        DocumentKind::Return => {
            let sold = original_sold_quantity(txn, document, item.product_id).await?;
            StockService::apply_return_item(product.id, product.quantity, item.quantity, sold)?
        }
        _ => StockService::apply_sale_item(product.id, product.quantity, item.quantity)?,
    };
    let price = item.price.unwrap_or(product.price);
    set_product_quantity(txn, product, on_hand).await?;

    let row = document_items::ActiveModel {
        id: Set(Uuid::new_v4()),
        document_id: Set(document.id),
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
) -> Result<products::Model, SaleDocumentError> {
    products::Entity::find_by_id(product_id)
        .one(txn)
        .await?
        .ok_or(SaleDocumentError::ProductNotFound(product_id))
}

async fn set_product_quantity(
    txn: &DatabaseTransaction,
    product: products::Model,
    quantity: i32,
) -> Result<(), SaleDocumentError> {
    let mut product: products::ActiveModel = product.into();
    product.quantity = Set(quantity);
    product.updated_at = Set(chrono::Utc::now().into());
    product.update(txn).await?;
    Ok(())
}

async fn items_of(
    txn: &DatabaseTransaction,
    document_id: Uuid,
) -> Result<Vec<document_items::Model>, SaleDocumentError> {
    Ok(document_items::Entity::find()
        .filter(document_items::Column::DocumentId.eq(document_id))
        .order_by_asc(document_items::Column::CreatedAt)
        .all(txn)
        .await?)
}

/// Recomputes and persists the document total from its current items.
async fn recompute_total(
    txn: &DatabaseTransaction,
    document: sale_documents::Model,
) -> Result<sale_documents::Model, SaleDocumentError> {
    let lines: Vec<LineAmount> = items_of(txn, document.id)
        .await?
        .iter()
        .map(|item| LineAmount {
            price: item.price,
            quantity: item.quantity,
        })
        .collect();
    let total = document_total(&lines);

    let mut document: sale_documents::ActiveModel = document.into();
    document.total = Set(total);
    Ok(document.update(txn).await?)
}
