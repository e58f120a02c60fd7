//! `SeaORM` Entity for the sale_documents table.
//!
//! One row per document; the type-specific columns are nullable here and
//! folded into the `DocumentDetails` variant enum at the domain boundary.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::DocType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "sale_documents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub doc_type: DocType,
    #[sea_orm(unique)]
    pub number: String,
    pub date: Date,
    pub total: Decimal,
    pub customer_id: Uuid,
    /// Set for cashless sales; unique (one document per invoice).
    #[sea_orm(unique)]
    pub invoice_id: Option<Uuid>,
    /// Set for cash sales.
    pub cash_register: Option<String>,
    /// Set for returns; unique (one return per original sale).
    #[sea_orm(unique)]
    pub original_sale_id: Option<Uuid>,
    /// Optional return reason.
    pub reason: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::CustomerId",
        to = "super::customers::Column::Id"
    )]
    Customers,
    #[sea_orm(
        belongs_to = "super::invoices::Entity",
        from = "Column::InvoiceId",
        to = "super::invoices::Column::Id"
    )]
    Invoices,
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::OriginalSaleId",
        to = "Column::Id"
    )]
    OriginalSale,
    #[sea_orm(has_many = "super::document_items::Entity")]
    DocumentItems,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customers.def()
    }
}

impl Related<super::invoices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoices.def()
    }
}

impl Related<super::document_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DocumentItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
