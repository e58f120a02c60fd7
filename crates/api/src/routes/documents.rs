//! Sale document routes.

use std::str::FromStr;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lavka_core::documents::{DocumentDetails, DocumentKind, ItemInput};
use lavka_db::entities::{document_items, sale_documents};
use lavka_db::repositories::{
    CreateSaleDocumentInput, DocumentWithItems, JournalFilter, SaleDocumentRepository,
};
use lavka_shared::AppError;
use lavka_shared::types::{PageRequest, PageResponse};

use super::ApiError;
use crate::AppState;

/// Creates the sale document routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/documents", get(journal).post(create_document))
        .route("/documents/{id}", get(get_document).delete(delete_document))
        .route("/documents/{id}/items", axum::routing::post(add_item))
        .route(
            "/documents/{id}/items/{item_id}",
            axum::routing::put(update_item).delete(remove_item),
        )
}

/// Request body for creating a sale document.
///
/// The type-specific fields ride on the `type` tag:
/// `{"type": "cash", "cash_register": "Касса 1", ...}`.
#[derive(Debug, Deserialize)]
pub struct CreateDocumentRequest {
    /// The customer on the document.
    pub customer_id: Uuid,
    /// Document date; defaults to today.
    pub date: Option<NaiveDate>,
    /// Type-specific details.
    #[serde(flatten)]
    pub details: DocumentDetails,
    /// Line items.
    #[serde(default)]
    pub items: Vec<ItemInput>,
}

/// Request body for adding a line item.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    /// The product to add.
    pub product_id: Uuid,
    /// Quantity, at least 1.
    pub quantity: i32,
    /// Unit price snapshot; defaults to the product's current price.
    pub price: Option<Decimal>,
}

/// Request body for changing a line item's quantity.
#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    /// The new quantity.
    pub quantity: i32,
}

/// Query parameters for the document journal.
#[derive(Debug, Deserialize)]
pub struct JournalQuery {
    /// Document type filter: cash, cashless, or return.
    #[serde(rename = "type")]
    pub doc_type: Option<String>,
    /// Inclusive range start.
    pub from: Option<NaiveDate>,
    /// Inclusive range end.
    pub to: Option<NaiveDate>,
    /// Case-insensitive customer name fragment.
    pub customer: Option<String>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

/// A sale document with its line items.
#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    /// Document header.
    #[serde(flatten)]
    pub document: sale_documents::Model,
    /// Line items.
    pub items: Vec<document_items::Model>,
}

impl From<DocumentWithItems> for DocumentResponse {
    fn from(value: DocumentWithItems) -> Self {
        Self {
            document: value.document,
            items: value.items,
        }
    }
}

/// A journal entry.
#[derive(Debug, Serialize)]
pub struct JournalEntryResponse {
    /// Document header.
    #[serde(flatten)]
    pub document: sale_documents::Model,
    /// Customer name.
    pub customer_name: String,
}

/// GET /documents
async fn journal(
    State(state): State<AppState>,
    Query(query): Query<JournalQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let doc_type = query
        .doc_type
        .as_deref()
        .map(DocumentKind::from_str)
        .transpose()
        .map_err(AppError::Validation)?;

    let filter = JournalFilter {
        doc_type,
        date_from: query.from,
        date_to: query.to,
        customer: query.customer,
    };
    let page = PageRequest {
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(20),
    };

    let repo = SaleDocumentRepository::new((*state.db).clone());
    let (entries, total) = repo.journal(&filter, &page).await?;
    let entries: Vec<JournalEntryResponse> = entries
        .into_iter()
        .map(|(document, customer_name)| JournalEntryResponse {
            document,
            customer_name,
        })
        .collect();
    Ok(Json(PageResponse::new(
        entries,
        page.page,
        page.per_page,
        total,
    )))
}

/// POST /documents
async fn create_document(
    State(state): State<AppState>,
    Json(request): Json<CreateDocumentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = SaleDocumentRepository::new((*state.db).clone());
    let document = repo
        .create(CreateSaleDocumentInput {
            customer_id: request.customer_id,
            date: request.date,
            details: request.details,
            items: request.items,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(DocumentResponse::from(document))))
}

/// GET /documents/{id}
async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = SaleDocumentRepository::new((*state.db).clone());
    let document = repo
        .find_with_items(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Sale document not found: {id}")))?;
    Ok(Json(DocumentResponse::from(document)))
}

/// DELETE /documents/{id}
async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = SaleDocumentRepository::new((*state.db).clone());
    repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /documents/{id}/items
async fn add_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AddItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = SaleDocumentRepository::new((*state.db).clone());
    let document = repo
        .add_item(
            id,
            ItemInput {
                product_id: request.product_id,
                quantity: request.quantity,
                price: request.price,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(DocumentResponse::from(document))))
}

/// PUT /documents/{id}/items/{item_id}
async fn update_item(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = SaleDocumentRepository::new((*state.db).clone());
    let document = repo
        .update_item_quantity(id, item_id, request.quantity)
        .await?;
    Ok(Json(DocumentResponse::from(document)))
}

/// DELETE /documents/{id}/items/{item_id}
async fn remove_item(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = SaleDocumentRepository::new((*state.db).clone());
    let document = repo.remove_item(id, item_id).await?;
    Ok(Json(DocumentResponse::from(document)))
}
