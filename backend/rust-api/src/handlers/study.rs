use axum::{extract::State, Json};
use std::sync::Arc;
use validator::Validate;

use crate::{
    extractors::AppJson,
    handlers::ApiError,
    models::{CreateStudySessionRequest, StudyFilters, StudySession},
    services::{study_service::StudyService, AppState},
};

pub async fn create_session(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<CreateStudySessionRequest>,
) -> Result<Json<StudySession>, ApiError> {
    req.validate()
        .map_err(|e| ApiError::bad_request(format!("Validation error: {}", e)))?;

    tracing::info!(
        "Composing study session: tags={:?}, mode={:?}, difficulties={:?}, count={:?}",
        req.tags,
        req.tag_filter_mode,
        req.difficulties,
        req.number_of_questions
    );

    let service = StudyService::new(state.quizzes.clone(), &state.config);
    let session = service.create_session(&req).await?;

    tracing::info!("Study session composed with {} questions", session.questions.len());

    Ok(Json(session))
}

pub async fn get_filters(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StudyFilters>, ApiError> {
    let service = StudyService::new(state.quizzes.clone(), &state.config);
    let filters = service.available_filters().await?;
    Ok(Json(filters))
}
