//! Order HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::middleware::CurrentUser;
use crate::services::order::{OrderService, PlaceOrderInput, TransitionInput};
use crate::AppState;
use shared::models::OrderStatus;

#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<OrderStatus>,
}

/// Place an order from the student's cart
pub async fn place_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<PlaceOrderInput>,
) -> impl IntoResponse {
    let student_id = match current_user.0.student_id() {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };
    let service = OrderService::new(state.db.clone(), &state.config);

    match service.place_order(student_id, input).await {
        Ok(order) => (StatusCode::CREATED, Json(order)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// The student's order history
pub async fn list_my_orders(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> impl IntoResponse {
    let student_id = match current_user.0.student_id() {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };
    let service = OrderService::new(state.db.clone(), &state.config);

    match service.list_for_student(student_id).await {
        Ok(orders) => {
            (StatusCode::OK, Json(serde_json::json!({ "orders": orders }))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// One of the student's orders
pub async fn get_my_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
) -> impl IntoResponse {
    let student_id = match current_user.0.student_id() {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };
    let service = OrderService::new(state.db.clone(), &state.config);

    match service.get_for_student(student_id, order_id).await {
        Ok(order) => (StatusCode::OK, Json(order)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// The seller's incoming orders, optionally filtered by status tab
pub async fn list_store_orders(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<OrderListQuery>,
) -> impl IntoResponse {
    let store_id = match current_user.0.store_id() {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };
    let service = OrderService::new(state.db.clone(), &state.config);

    match service.list_for_store(store_id, query.status).await {
        Ok(orders) => {
            (StatusCode::OK, Json(serde_json::json!({ "orders": orders }))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// One of the seller's orders
pub async fn get_store_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
) -> impl IntoResponse {
    let store_id = match current_user.0.store_id() {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };
    let service = OrderService::new(state.db.clone(), &state.config);

    match service.get_for_store(store_id, order_id).await {
        Ok(order) => (StatusCode::OK, Json(order)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Advance an order's status (seller only)
pub async fn update_order_status(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
    Json(input): Json<TransitionInput>,
) -> impl IntoResponse {
    let store_id = match current_user.0.store_id() {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };
    let service = OrderService::new(state.db.clone(), &state.config);

    match service.transition(store_id, order_id, input).await {
        Ok(order) => (StatusCode::OK, Json(order)).into_response(),
        Err(e) => e.into_response(),
    }
}
