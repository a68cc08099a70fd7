//! Catalog HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::handlers::store::ListQuery;
use crate::middleware::CurrentUser;
use crate::services::product::{CreateProductInput, ProductService, UpdateProductInput};
use crate::AppState;
use shared::models::UserRole;

/// List products: sellers see their own catalog, students see everything
pub async fn list_products(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let service = ProductService::new(state.db.clone());

    let result = match current_user.0.role {
        UserRole::Seller => {
            service
                .list_by_store(current_user.0.profile_id, query.limit)
                .await
        }
        UserRole::Student => service.list_all(query.limit).await,
    };

    match result {
        Ok(products) => {
            (StatusCode::OK, Json(serde_json::json!({ "products": products }))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// List a specific store's products
pub async fn list_store_products(
    State(state): State<AppState>,
    Path(store_id): Path<Uuid>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let service = ProductService::new(state.db.clone());

    match service.list_by_store(store_id, query.limit).await {
        Ok(products) => {
            (StatusCode::OK, Json(serde_json::json!({ "products": products }))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Get a product by id
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = ProductService::new(state.db.clone());

    match service.get_product(product_id).await {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Create a product in the seller's catalog
pub async fn create_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateProductInput>,
) -> impl IntoResponse {
    let store_id = match current_user.0.store_id() {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };
    let service = ProductService::new(state.db.clone());

    match service.create_product(store_id, input).await {
        Ok(product) => (StatusCode::CREATED, Json(product)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Update a product in the seller's catalog
pub async fn update_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
    Json(input): Json<UpdateProductInput>,
) -> impl IntoResponse {
    let store_id = match current_user.0.store_id() {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };
    let service = ProductService::new(state.db.clone());

    match service.update_product(store_id, product_id, input).await {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Delete a product from the seller's catalog
pub async fn delete_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> impl IntoResponse {
    let store_id = match current_user.0.store_id() {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };
    let service = ProductService::new(state.db.clone());

    match service.delete_product(store_id, product_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
