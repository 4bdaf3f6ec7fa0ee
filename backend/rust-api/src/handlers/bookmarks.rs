use axum::{
    extract::{Path, State},
    Extension, Json,
};
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;

use crate::{
    handlers::ApiError,
    middlewares::auth::JwtClaims,
    models::{BookmarkToggleResponse, ResolvedBookmark},
    services::{bookmark_service::BookmarkService, AppState},
};

pub async fn toggle_bookmark(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<JwtClaims>,
    Path(question_id): Path<String>,
) -> Result<Json<BookmarkToggleResponse>, ApiError> {
    let user_id = current_user(&claims)?;
    let question_id = ObjectId::parse_str(&question_id)
        .map_err(|_| ApiError::bad_request("Invalid question id"))?;

    let service = BookmarkService::new(state.quizzes.clone(), state.users.clone());
    let action = service
        .toggle(user_id, question_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(action.into()))
}

pub async fn list_bookmarks(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<JwtClaims>,
) -> Result<Json<Vec<ResolvedBookmark>>, ApiError> {
    let user_id = current_user(&claims)?;

    let service = BookmarkService::new(state.quizzes.clone(), state.users.clone());
    let bookmarks = service
        .list(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    tracing::info!("Resolved {} bookmarks for user {}", bookmarks.len(), user_id);

    Ok(Json(bookmarks))
}

fn current_user(claims: &JwtClaims) -> Result<ObjectId, ApiError> {
    claims.user_id().ok_or_else(|| {
        tracing::warn!("Token subject is not a user id: {}", claims.sub);
        ApiError::unauthorized("Invalid user identity")
    })
}
