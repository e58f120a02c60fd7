//! Product repository.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use lavka_shared::AppError;
use lavka_shared::types::PageRequest;

use crate::entities::{document_items, invoice_items, products};

/// Error types for product operations.
#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    /// Product not found.
    #[error("Product not found: {0}")]
    NotFound(Uuid),

    /// Product is referenced by line items and cannot be deleted.
    #[error("Cannot delete product {0}: referenced by invoice or document items")]
    Referenced(Uuid),

    /// Price must not be negative.
    #[error("Product price must not be negative, got {0}")]
    NegativePrice(Decimal),

    /// Stock quantity must not be negative.
    #[error("Product quantity must not be negative, got {0}")]
    NegativeQuantity(i32),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(_) => Self::NotFound(err.to_string()),
            ProductError::Referenced(_) => Self::Protected(err.to_string()),
            ProductError::NegativePrice(_) | ProductError::NegativeQuantity(_) => {
                Self::Validation(err.to_string())
            }
            ProductError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating a product.
#[derive(Debug, Clone)]
pub struct CreateProductInput {
    /// Product name.
    pub name: String,
    /// Unit price.
    pub price: Decimal,
    /// Initial stock quantity.
    pub quantity: i32,
}

/// Input for updating a product.
#[derive(Debug, Clone, Default)]
pub struct UpdateProductInput {
    /// New name, if changing.
    pub name: Option<String>,
    /// New price, if changing.
    pub price: Option<Decimal>,
    /// New stock quantity, if correcting by hand.
    pub quantity: Option<i32>,
}

/// Product repository for CRUD operations and availability lookups.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    db: DatabaseConnection,
}

impl ProductRepository {
    /// Creates a new product repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a product.
    pub async fn create(&self, input: CreateProductInput) -> Result<products::Model, ProductError> {
        if input.price < Decimal::ZERO {
            return Err(ProductError::NegativePrice(input.price));
        }
        if input.quantity < 0 {
            return Err(ProductError::NegativeQuantity(input.quantity));
        }

        let now = chrono::Utc::now();
        let product = products::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            price: Set(input.price),
            quantity: Set(input.quantity),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        Ok(product.insert(&self.db).await?)
    }

    /// Finds a product by ID.
    ///
    /// Doubles as the "price and quantity of product by id" lookup.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<products::Model>, ProductError> {
        Ok(products::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Lists products ordered by name, with the total count.
    pub async fn list(
        &self,
        page: &PageRequest,
    ) -> Result<(Vec<products::Model>, u64), ProductError> {
        let total = products::Entity::find().count(&self.db).await?;
        let rows = products::Entity::find()
            .order_by_asc(products::Column::Name)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;
        Ok((rows, total))
    }

    /// Updates a product.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateProductInput,
    ) -> Result<products::Model, ProductError> {
        if let Some(price) = input.price {
            if price < Decimal::ZERO {
                return Err(ProductError::NegativePrice(price));
            }
        }
        if let Some(quantity) = input.quantity {
            if quantity < 0 {
                return Err(ProductError::NegativeQuantity(quantity));
            }
        }

        let product = products::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        let mut product: products::ActiveModel = product.into();
        if let Some(name) = input.name {
            product.name = Set(name);
        }
        if let Some(price) = input.price {
            product.price = Set(price);
        }
        if let Some(quantity) = input.quantity {
            product.quantity = Set(quantity);
        }
        product.updated_at = Set(chrono::Utc::now().into());
        Ok(product.update(&self.db).await?)
    }

    /// Deletes a product.
    ///
    /// # Errors
    ///
    /// `Referenced` while any invoice or document line item points at the
    /// product; `NotFound` when it does not exist.
    pub async fn delete(&self, id: Uuid) -> Result<(), ProductError> {
        let product = products::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        let invoice_item_refs = invoice_items::Entity::find()
            .filter(invoice_items::Column::ProductId.eq(id))
            .count(&self.db)
            .await?;
        let document_item_refs = document_items::Entity::find()
            .filter(document_items::Column::ProductId.eq(id))
            .count(&self.db)
            .await?;
        if invoice_item_refs > 0 || document_item_refs > 0 {
            return Err(ProductError::Referenced(id));
        }

        products::Entity::delete_by_id(product.id)
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
