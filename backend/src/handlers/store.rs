//! Store and seller-profile HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::middleware::CurrentUser;
use crate::services::store::{AddDeliveryPersonInput, StoreService, UpdateStoreInput};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

/// List all stores (student browsing)
pub async fn list_stores(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let service = StoreService::new(state.db.clone());

    match service.list_stores(query.limit).await {
        Ok(stores) => {
            (StatusCode::OK, Json(serde_json::json!({ "stores": stores }))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Get a store by id
pub async fn get_store(
    State(state): State<AppState>,
    Path(store_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = StoreService::new(state.db.clone());

    match service.get_store(store_id).await {
        Ok(store) => (StatusCode::OK, Json(store)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get the seller's own store profile
pub async fn get_my_store(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> impl IntoResponse {
    let store_id = match current_user.0.store_id() {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };
    let service = StoreService::new(state.db.clone());

    match service.get_store(store_id).await {
        Ok(store) => (StatusCode::OK, Json(store)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Update the seller's store profile
pub async fn update_my_store(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<UpdateStoreInput>,
) -> impl IntoResponse {
    let store_id = match current_user.0.store_id() {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };
    let service = StoreService::new(state.db.clone());

    match service.update_store(store_id, input).await {
        Ok(store) => (StatusCode::OK, Json(store)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// The seller's delivery-person roster
pub async fn get_roster(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> impl IntoResponse {
    let store_id = match current_user.0.store_id() {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };
    let service = StoreService::new(state.db.clone());

    match service.get_roster(store_id).await {
        Ok(roster) => {
            (StatusCode::OK, Json(serde_json::json!({ "deliveryPersons": roster }))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Add a delivery person to the roster
pub async fn add_delivery_person(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<AddDeliveryPersonInput>,
) -> impl IntoResponse {
    let store_id = match current_user.0.store_id() {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };
    let service = StoreService::new(state.db.clone());

    match service.add_delivery_person(store_id, input).await {
        Ok(roster) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "deliveryPersons": roster })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Remove a delivery person from the roster
pub async fn remove_delivery_person(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(person_id): Path<Uuid>,
) -> impl IntoResponse {
    let store_id = match current_user.0.store_id() {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };
    let service = StoreService::new(state.db.clone());

    match service.remove_delivery_person(store_id, person_id).await {
        Ok(roster) => {
            (StatusCode::OK, Json(serde_json::json!({ "deliveryPersons": roster }))).into_response()
        }
        Err(e) => e.into_response(),
    }
}
