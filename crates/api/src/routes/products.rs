//! Product routes.

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

use lavka_db::repositories::{CreateProductInput, ProductRepository, UpdateProductInput};
use lavka_shared::AppError;
use lavka_shared::types::{PageRequest, PageResponse};

use super::ApiError;
use crate::AppState;

/// Creates the product routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/products/{id}/availability", get(availability))
}

/// Request body for creating a product.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    /// Product name.
    pub name: String,
    /// Unit price.
    pub price: Decimal,
    /// Initial stock quantity.
    #[serde(default)]
    pub quantity: i32,
}

/// Request body for updating a product.
#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    /// New name, if changing.
    pub name: Option<String>,
    /// New price, if changing.
    pub price: Option<Decimal>,
    /// New stock quantity, if correcting by hand.
    pub quantity: Option<i32>,
}

/// Response for the availability lookup.
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    /// Current unit price.
    pub price: Decimal,
    /// Quantity available for sale.
    pub quantity: i32,
}

/// GET /products
async fn list_products(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = ProductRepository::new((*state.db).clone());
    let (rows, total) = repo.list(&page).await?;
    Ok(Json(PageResponse::new(rows, page.page, page.per_page, total)))
}

/// POST /products
async fn create_product(
    State(state): State<AppState>,
    Json(request): Json<CreateProductRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = ProductRepository::new((*state.db).clone());
    let product = repo
        .create(CreateProductInput {
            name: request.name,
            price: request.price,
            quantity: request.quantity,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /products/{id}
async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = ProductRepository::new((*state.db).clone());
    let product = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product not found: {id}")))?;
    Ok(Json(product))
}

/// PUT /products/{id}
async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateProductRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = ProductRepository::new((*state.db).clone());
    let product = repo
        .update(
            id,
            UpdateProductInput {
                name: request.name,
                price: request.price,
                quantity: request.quantity,
            },
        )
        .await?;
    Ok(Json(product))
}

/// DELETE /products/{id}
async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = ProductRepository::new((*state.db).clone());
    repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /products/{id}/availability
///
/// Lookup used by the line item forms: price and quantity by product id.
async fn availability(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = ProductRepository::new((*state.db).clone());
    let product = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product not found: {id}")))?;
    Ok(Json(AvailabilityResponse {
        price: product.price,
        quantity: product.quantity,
    }))
}
