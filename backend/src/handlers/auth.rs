//! Authentication HTTP handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::middleware::CurrentUser;
use crate::services::auth::{AuthService, LoginInput, RegisterSellerInput, RegisterStudentInput};
use crate::AppState;

/// Register a student account
pub async fn register_student(
    State(state): State<AppState>,
    Json(input): Json<RegisterStudentInput>,
) -> impl IntoResponse {
    let service = AuthService::new(state.db.clone(), &state.config);

    match service.register_student(input).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Register a seller account with their store
pub async fn register_seller(
    State(state): State<AppState>,
    Json(input): Json<RegisterSellerInput>,
) -> impl IntoResponse {
    let service = AuthService::new(state.db.clone(), &state.config);

    match service.register_seller(input).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Log in with email and password
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> impl IntoResponse {
    let service = AuthService::new(state.db.clone(), &state.config);

    match service.login(input).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Who am I (session check)
pub async fn me(current_user: CurrentUser) -> impl IntoResponse {
    Json(serde_json::json!({
        "userId": current_user.0.user_id,
        "role": current_user.0.role,
        "profileId": current_user.0.profile_id,
    }))
}
