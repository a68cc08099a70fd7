//! Notification HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::handlers::store::ListQuery;
use crate::middleware::CurrentUser;
use crate::services::NotificationService;
use crate::AppState;

/// The user's notifications
pub async fn get_notifications(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let service = NotificationService::new(state.db.clone());

    match service.list(current_user.0.user_id, query.limit).await {
        Ok(notifications) => (
            StatusCode::OK,
            Json(serde_json::json!({ "notifications": notifications })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Count of unread notifications
pub async fn get_unread_count(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> impl IntoResponse {
    let service = NotificationService::new(state.db.clone());

    match service.unread_count(current_user.0.user_id).await {
        Ok(count) => {
            (StatusCode::OK, Json(serde_json::json!({ "unreadCount": count }))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Mark one notification as read
pub async fn mark_as_read(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(notification_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = NotificationService::new(state.db.clone());

    match service.mark_read(current_user.0.user_id, notification_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "message": "Notification marked as read" })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Mark all notifications as read
pub async fn mark_all_as_read(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> impl IntoResponse {
    let service = NotificationService::new(state.db.clone());

    match service.mark_all_read(current_user.0.user_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "message": "All notifications marked as read" })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
