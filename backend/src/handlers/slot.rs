//! Delivery slot HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::middleware::CurrentUser;
use crate::services::slot::{SlotInput, SlotService};
use crate::AppState;

/// A store's published slots (checkout view)
pub async fn list_store_slots(
    State(state): State<AppState>,
    Path(store_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = SlotService::new(state.db.clone());

    match service.list_slots(store_id).await {
        Ok(slots) => {
            (StatusCode::OK, Json(serde_json::json!({ "deliverySlots": slots }))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// The seller's own slots
pub async fn list_my_slots(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> impl IntoResponse {
    let store_id = match current_user.0.store_id() {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };
    let service = SlotService::new(state.db.clone());

    match service.list_slots(store_id).await {
        Ok(slots) => {
            (StatusCode::OK, Json(serde_json::json!({ "deliverySlots": slots }))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Publish a new delivery slot
pub async fn create_slot(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<SlotInput>,
) -> impl IntoResponse {
    let store_id = match current_user.0.store_id() {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };
    let service = SlotService::new(state.db.clone());

    match service.create_slot(store_id, input).await {
        Ok(slot) => (StatusCode::CREATED, Json(slot)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Update a delivery slot
pub async fn update_slot(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(slot_id): Path<Uuid>,
    Json(input): Json<SlotInput>,
) -> impl IntoResponse {
    let store_id = match current_user.0.store_id() {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };
    let service = SlotService::new(state.db.clone());

    match service.update_slot(store_id, slot_id, input).await {
        Ok(slot) => (StatusCode::OK, Json(slot)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Delete a delivery slot
pub async fn delete_slot(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(slot_id): Path<Uuid>,
) -> impl IntoResponse {
    let store_id = match current_user.0.store_id() {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };
    let service = SlotService::new(state.db.clone());

    match service.delete_slot(store_id, slot_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
