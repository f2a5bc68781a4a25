use axum::{extract::State, response::Response, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::AppPath;
use crate::library::export::text_download;
use crate::library::{compute_analytics, AssessmentSummary, LibraryAnalytics};
use crate::models::assessment::AssessmentRecord;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct LibraryResponse {
    pub count: usize,
    pub assessments: Vec<AssessmentSummary>,
}

/// GET /api/v1/sessions/:session_id/assessments
pub async fn handle_list_assessments(
    State(state): State<AppState>,
    AppPath(session_id): AppPath<Uuid>,
) -> Result<Json<LibraryResponse>, AppError> {
    let assessments = state
        .sessions
        .read(session_id, |s| {
            s.assessments()
                .iter()
                .map(AssessmentSummary::from)
                .collect::<Vec<_>>()
        })
        .await?;

    Ok(Json(LibraryResponse {
        count: assessments.len(),
        assessments,
    }))
}

/// GET /api/v1/sessions/:session_id/assessments/:id
pub async fn handle_get_assessment(
    State(state): State<AppState>,
    AppPath((session_id, id)): AppPath<(Uuid, u32)>,
) -> Result<Json<AssessmentRecord>, AppError> {
    let record = find_record(&state, session_id, id).await?;
    Ok(Json(record))
}

/// GET /api/v1/sessions/:session_id/assessments/:id/download
pub async fn handle_download_assessment(
    State(state): State<AppState>,
    AppPath((session_id, id)): AppPath<(Uuid, u32)>,
) -> Result<Response, AppError> {
    let record = find_record(&state, session_id, id).await?;
    text_download(&record)
}

/// GET /api/v1/sessions/:session_id/analytics
pub async fn handle_analytics(
    State(state): State<AppState>,
    AppPath(session_id): AppPath<Uuid>,
) -> Result<Json<LibraryAnalytics>, AppError> {
    let analytics = state
        .sessions
        .read(session_id, |s| compute_analytics(s.assessments()))
        .await?;
    Ok(Json(analytics))
}

async fn find_record(
    state: &AppState,
    session_id: Uuid,
    id: u32,
) -> Result<AssessmentRecord, AppError> {
    state
        .sessions
        .read(session_id, |s| s.assessment(id).cloned())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Assessment {id} not found")))
}
