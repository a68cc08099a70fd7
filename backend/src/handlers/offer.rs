//! Offer HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::handlers::store::ListQuery;
use crate::middleware::CurrentUser;
use crate::services::offer::{OfferInput, OfferService};
use crate::AppState;

/// Active offers across all stores (dashboard banners)
pub async fn list_active_offers(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let service = OfferService::new(state.db.clone());

    match service.list_active(query.limit).await {
        Ok(offers) => {
            (StatusCode::OK, Json(serde_json::json!({ "offers": offers }))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// A store's active offers (student store page)
pub async fn list_store_offers(
    State(state): State<AppState>,
    Path(store_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = OfferService::new(state.db.clone());

    match service.list_active_for_store(store_id).await {
        Ok(offers) => {
            (StatusCode::OK, Json(serde_json::json!({ "offers": offers }))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// All of the seller's offers, active or not
pub async fn list_my_offers(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> impl IntoResponse {
    let store_id = match current_user.0.store_id() {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };
    let service = OfferService::new(state.db.clone());

    match service.list_by_store(store_id).await {
        Ok(offers) => {
            (StatusCode::OK, Json(serde_json::json!({ "offers": offers }))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Post a new offer
pub async fn create_offer(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<OfferInput>,
) -> impl IntoResponse {
    let store_id = match current_user.0.store_id() {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };
    let service = OfferService::new(state.db.clone());

    match service.create_offer(store_id, input).await {
        Ok(offer) => (StatusCode::CREATED, Json(offer)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Update an offer
pub async fn update_offer(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(offer_id): Path<Uuid>,
    Json(input): Json<OfferInput>,
) -> impl IntoResponse {
    let store_id = match current_user.0.store_id() {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };
    let service = OfferService::new(state.db.clone());

    match service.update_offer(store_id, offer_id, input).await {
        Ok(offer) => (StatusCode::OK, Json(offer)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Delete an offer (the only way an offer ever disappears)
pub async fn delete_offer(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(offer_id): Path<Uuid>,
) -> impl IntoResponse {
    let store_id = match current_user.0.store_id() {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };
    let service = OfferService::new(state.db.clone());

    match service.delete_offer(store_id, offer_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
