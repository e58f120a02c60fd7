//! Customer routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lavka_db::repositories::{
    CreateCustomerInput, CustomerRepository, InvoiceRepository, UpdateCustomerInput,
};
use lavka_shared::AppError;
use lavka_shared::types::{PageRequest, PageResponse};

use super::ApiError;
use crate::AppState;

/// Creates the customer routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/customers", get(list_customers).post(create_customer))
        .route(
            "/customers/{id}",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
        .route("/customers/{id}/unpaid-invoices", get(unpaid_invoices))
}

/// Request body for creating a customer.
#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    /// Company name or personal name.
    pub name: String,
    /// Whether this is a legal entity.
    #[serde(default)]
    pub is_company: bool,
    /// Free-form contact info.
    #[serde(default)]
    pub contact: String,
}

/// Request body for updating a customer.
#[derive(Debug, Deserialize)]
pub struct UpdateCustomerRequest {
    /// New name, if changing.
    pub name: Option<String>,
    /// New company flag, if changing.
    pub is_company: Option<bool>,
    /// New contact info, if changing.
    pub contact: Option<String>,
}

/// An unpaid invoice in the lookup response.
#[derive(Debug, Serialize)]
pub struct UnpaidInvoiceResponse {
    /// Invoice ID.
    pub id: Uuid,
    /// Invoice number.
    pub number: String,
    /// Invoice total.
    pub total: Decimal,
}

/// GET /customers
async fn list_customers(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = CustomerRepository::new((*state.db).clone());
    let (rows, total) = repo.list(&page).await?;
    Ok(Json(PageResponse::new(rows, page.page, page.per_page, total)))
}

/// POST /customers
async fn create_customer(
    State(state): State<AppState>,
    Json(request): Json<CreateCustomerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = CustomerRepository::new((*state.db).clone());
    let customer = repo
        .create(CreateCustomerInput {
            name: request.name,
            is_company: request.is_company,
            contact: request.contact,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

/// GET /customers/{id}
async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = CustomerRepository::new((*state.db).clone());
    let customer = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Customer not found: {id}")))?;
    Ok(Json(customer))
}

/// PUT /customers/{id}
async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCustomerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = CustomerRepository::new((*state.db).clone());
    let customer = repo
        .update(
            id,
            UpdateCustomerInput {
                name: request.name,
                is_company: request.is_company,
                contact: request.contact,
            },
        )
        .await?;
    Ok(Json(customer))
}

/// DELETE /customers/{id}
async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = CustomerRepository::new((*state.db).clone());
    repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /customers/{id}/unpaid-invoices
///
/// Lookup used by the cashless sale form: the customer's open invoices.
async fn unpaid_invoices(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let customers = CustomerRepository::new((*state.db).clone());
    customers
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Customer not found: {id}")))?;

    let invoices = InvoiceRepository::new((*state.db).clone());
    let unpaid = invoices.unpaid_for_customer(id).await?;
    let response: Vec<UnpaidInvoiceResponse> = unpaid
        .into_iter()
        .map(|invoice| UnpaidInvoiceResponse {
            id: invoice.id,
            number: invoice.number,
            total: invoice.total,
        })
        .collect();
    Ok(Json(response))
}
