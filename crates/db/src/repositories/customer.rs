//! Customer repository.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use lavka_shared::AppError;
use lavka_shared::types::PageRequest;

use crate::entities::{customers, invoices, sale_documents};

/// Error types for customer operations.
#[derive(Debug, thiserror::Error)]
pub enum CustomerError {
    /// Customer not found.
    #[error("Customer not found: {0}")]
    NotFound(Uuid),

    /// Customer is referenced and cannot be deleted.
    #[error("Cannot delete customer {0}: referenced by invoices or sale documents")]
    Referenced(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<CustomerError> for AppError {
    fn from(err: CustomerError) -> Self {
        match err {
            CustomerError::NotFound(_) => Self::NotFound(err.to_string()),
            CustomerError::Referenced(_) => Self::Protected(err.to_string()),
            CustomerError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating a customer.
#[derive(Debug, Clone)]
pub struct CreateCustomerInput {
    /// Company name or personal name.
    pub name: String,
    /// Whether this is a legal entity.
    pub is_company: bool,
    /// Free-form contact info.
    pub contact: String,
}

/// Input for updating a customer.
#[derive(Debug, Clone, Default)]
pub struct UpdateCustomerInput {
    /// New name, if changing.
    pub name: Option<String>,
    /// New company flag, if changing.
    pub is_company: Option<bool>,
    /// New contact info, if changing.
    pub contact: Option<String>,
}

/// Customer repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    db: DatabaseConnection,
}

impl CustomerRepository {
    /// Creates a new customer repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a customer.
    pub async fn create(&self, input: CreateCustomerInput) -> Result<customers::Model, CustomerError> {
        let customer = customers::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            is_company: Set(input.is_company),
            contact: Set(input.contact),
            created_at: Set(chrono::Utc::now().into()),
        };
        Ok(customer.insert(&self.db).await?)
    }

    /// Finds a customer by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<customers::Model>, CustomerError> {
        Ok(customers::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Lists customers ordered by name, with the total count.
    pub async fn list(
        &self,
        page: &PageRequest,
    ) -> Result<(Vec<customers::Model>, u64), CustomerError> {
        let total = customers::Entity::find().count(&self.db).await?;
        let rows = customers::Entity::find()
            .order_by_asc(customers::Column::Name)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;
        Ok((rows, total))
    }

    /// Updates a customer.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateCustomerInput,
    ) -> Result<customers::Model, CustomerError> {
        let customer = customers::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CustomerError::NotFound(id))?;

        let mut customer: customers::ActiveModel = customer.into();
        if let Some(name) = input.name {
            customer.name = Set(name);
        }
        if let Some(is_company) = input.is_company {
            customer.is_company = Set(is_company);
        }
        if let Some(contact) = input.contact {
            customer.contact = Set(contact);
        }
        Ok(customer.update(&self.db).await?)
    }

    /// Deletes a customer.
    ///
    /// # Errors
    ///
    /// `Referenced` while any invoice or sale document points at the
    /// customer; `NotFound` when it does not exist.
    pub async fn delete(&self, id: Uuid) -> Result<(), CustomerError> {
        let customer = customers::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CustomerError::NotFound(id))?;

        let invoice_refs = invoices::Entity::find()
            .filter(invoices::Column::CustomerId.eq(id))
            .count(&self.db)
            .await?;
        let document_refs = sale_documents::Entity::find()
            .filter(sale_documents::Column::CustomerId.eq(id))
            .count(&self.db)
            .await?;
        if invoice_refs > 0 || document_refs > 0 {
            return Err(CustomerError::Referenced(id));
        }

        customers::Entity::delete_by_id(customer.id)
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
