//! Invoice routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lavka_core::documents::ItemInput;
use lavka_db::entities::{invoice_items, invoices, sale_documents};
use lavka_db::repositories::{CreateInvoiceInput, InvoiceRepository, InvoiceWithItems};
use lavka_shared::AppError;
use lavka_shared::types::{PageRequest, PageResponse};

use super::ApiError;
use crate::AppState;

/// Creates the invoice routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/invoices", get(list_invoices).post(create_invoice))
        .route("/invoices/{id}", get(get_invoice).delete(delete_invoice))
        .route("/invoices/{id}/pay", axum::routing::post(pay_invoice))
        .route("/invoices/{id}/items", axum::routing::post(add_item))
        .route(
            "/invoices/{id}/items/{item_id}",
            axum::routing::put(update_item).delete(remove_item),
        )
}

/// Request body for creating an invoice.
#[derive(Debug, Deserialize)]
pub struct CreateInvoiceRequest {
    /// The customer billed (must be a company).
    pub customer_id: Uuid,
    /// Invoice date; defaults to today.
    pub date: Option<NaiveDate>,
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
    pub price: Option<rust_decimal::Decimal>,
}

/// Request body for changing a line item's quantity.
#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    /// The new quantity.
    pub quantity: i32,
}

/// An invoice with its line items.
#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    /// Invoice header.
    #[serde(flatten)]
    pub invoice: invoices::Model,
    /// Line items.
    pub items: Vec<invoice_items::Model>,
}

/// Response for the payment transition.
#[derive(Debug, Serialize)]
pub struct PayInvoiceResponse {
    /// The invoice after the transition.
    pub invoice: invoices::Model,
    /// The cashless sale document, present when this call created it.
    pub sale_document: Option<sale_documents::Model>,
}

impl From<InvoiceWithItems> for InvoiceResponse {
    fn from(value: InvoiceWithItems) -> Self {
        Self {
            invoice: value.invoice,
            items: value.items,
        }
    }
}

/// GET /invoices
async fn list_invoices(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = InvoiceRepository::new((*state.db).clone());
    let (rows, total) = repo.list(&page).await?;
    Ok(Json(PageResponse::new(rows, page.page, page.per_page, total)))
}

/// POST /invoices
async fn create_invoice(
    State(state): State<AppState>,
    Json(request): Json<CreateInvoiceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = InvoiceRepository::new((*state.db).clone());
    let invoice = repo
        .create(CreateInvoiceInput {
            customer_id: request.customer_id,
            date: request.date,
            items: request.items,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(InvoiceResponse::from(invoice))))
}

/// GET /invoices/{id}
async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = InvoiceRepository::new((*state.db).clone());
    let invoice = repo
        .find_with_items(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Invoice not found: {id}")))?;
    Ok(Json(InvoiceResponse::from(invoice)))
}

/// DELETE /invoices/{id}
async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = InvoiceRepository::new((*state.db).clone());
    repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /invoices/{id}/pay
///
/// Marks the invoice paid; the first call spawns its cashless sale
/// document, repeated calls change nothing.
async fn pay_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = InvoiceRepository::new((*state.db).clone());
    let (invoice, sale_document) = repo.mark_paid(id).await?;
    Ok(Json(PayInvoiceResponse {
        invoice,
        sale_document,
    }))
}

/// POST /invoices/{id}/items
async fn add_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AddItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = InvoiceRepository::new((*state.db).clone());
    let invoice = repo
        .add_item(
            id,
            ItemInput {
                product_id: request.product_id,
                quantity: request.quantity,
                price: request.price,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(InvoiceResponse::from(invoice))))
}

/// PUT /invoices/{id}/items/{item_id}
async fn update_item(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = InvoiceRepository::new((*state.db).clone());
    let invoice = repo
        .update_item_quantity(id, item_id, request.quantity)
        .await?;
    Ok(Json(InvoiceResponse::from(invoice)))
}

/// DELETE /invoices/{id}/items/{item_id}
async fn remove_item(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = InvoiceRepository::new((*state.db).clone());
    let invoice = repo.remove_item(id, item_id).await?;
    Ok(Json(InvoiceResponse::from(invoice)))
}
