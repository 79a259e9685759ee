//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::UserId,
    infrastructure::dto::http::{OnlineUsersDto, UnreadCountDto, UserSummaryDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Roster source: every user who has connected, sorted by id
pub async fn get_users(State(state): State<Arc<AppState>>) -> Json<Vec<UserSummaryDto>> {
    let users = state.list_users_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(users.into_iter().map(UserSummaryDto::from).collect())
}

/// The presence set
pub async fn get_online_users(State(state): State<Arc<AppState>>) -> Json<OnlineUsersDto> {
    let users = state.get_online_users_usecase.execute().await;

    Json(OnlineUsersDto {
        users: users.into_iter().map(UserId::into_string).collect(),
    })
}

/// Non-zero unread counters addressed to `user_id`
pub async fn get_unread_counts(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<UnreadCountDto>>, StatusCode> {
    let user_id = match UserId::new(user_id) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("Invalid user id in unread query: {}", e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    let counters = state.unread_counts_usecase.snapshot(&user_id).await;
    Ok(Json(counters.into_iter().map(UnreadCountDto::from).collect()))
}
