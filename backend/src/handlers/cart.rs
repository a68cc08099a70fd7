//! Cart HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::middleware::CurrentUser;
use crate::services::cart::{AddCartItemInput, CartService, UpdateCartItemInput};
use crate::AppState;

/// The student's cart with offers applied and the running summary
pub async fn get_cart(State(state): State<AppState>, current_user: CurrentUser) -> impl IntoResponse {
    let student_id = match current_user.0.student_id() {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };
    let service = CartService::new(state.db.clone());

    match service.view_cart(student_id).await {
        Ok(cart) => (StatusCode::OK, Json(cart)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Add a product to the cart
pub async fn add_to_cart(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<AddCartItemInput>,
) -> impl IntoResponse {
    let student_id = match current_user.0.student_id() {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };
    let service = CartService::new(state.db.clone());

    match service.add_item(student_id, input).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "message": "Product added to cart" })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Change a cart line's quantity (zero removes it)
pub async fn update_cart_item(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(item_id): Path<Uuid>,
    Json(input): Json<UpdateCartItemInput>,
) -> impl IntoResponse {
    let student_id = match current_user.0.student_id() {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };
    let service = CartService::new(state.db.clone());

    match service.update_item(student_id, item_id, input).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "message": "Cart updated" })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Remove a cart line
pub async fn remove_cart_item(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(item_id): Path<Uuid>,
) -> impl IntoResponse {
    let student_id = match current_user.0.student_id() {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };
    let service = CartService::new(state.db.clone());

    match service.remove_item(student_id, item_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "message": "Item removed from cart" })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Empty the cart; required before switching to another store
pub async fn clear_cart(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> impl IntoResponse {
    let student_id = match current_user.0.student_id() {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };
    let service = CartService::new(state.db.clone());

    match service.clear_cart(student_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "message": "Cart cleared" })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
