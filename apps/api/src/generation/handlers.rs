//! Axum route handlers for the Generation API.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::{AppJson, AppPath};
use crate::generation::generator::generate_assessment;
use crate::generation::samples::SamplePreset;
use crate::models::assessment::{
    AssessmentRecord, AssessmentRequest, Criterion, Difficulty, MypLevel, ProviderKind, Topic,
};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub assessment: AssessmentRecord,
    pub library_size: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CriterionOption {
    pub code: Criterion,
    pub label: String,
}

/// Everything a client needs to render the form.
#[derive(Debug, Serialize, Deserialize)]
pub struct FormOptions {
    pub levels: Vec<MypLevel>,
    pub topics: Vec<Topic>,
    pub criteria: Vec<CriterionOption>,
    pub difficulties: Vec<Difficulty>,
    pub providers: Vec<ProviderKind>,
    pub presets: Vec<SamplePreset>,
    pub defaults: FormDefaults,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FormDefaults {
    pub level: MypLevel,
    pub criteria: Vec<Criterion>,
    pub difficulty: Difficulty,
    pub provider: ProviderKind,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions/:session_id/assessments
///
/// Submits the form. On success exactly one record is appended to the session library.
pub async fn handle_generate(
    State(state): State<AppState>,
    AppPath(session_id): AppPath<Uuid>,
    AppJson(request): AppJson<AssessmentRequest>,
) -> Result<(StatusCode, Json<GenerateResponse>), AppError> {
    let assessment = generate_assessment(&state.sessions, &state.llm, session_id, request).await?;
    let library_size = state
        .sessions
        .read(session_id, |s| s.assessments().len())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(GenerateResponse {
            assessment,
            library_size,
        }),
    ))
}

/// GET /api/v1/options
pub async fn handle_form_options() -> Json<FormOptions> {
    Json(FormOptions {
        levels: MypLevel::all().collect(),
        topics: Topic::ALL.to_vec(),
        criteria: Criterion::ALL
            .iter()
            .map(|&code| CriterionOption {
                code,
                label: code.label().to_string(),
            })
            .collect(),
        difficulties: Difficulty::ALL.to_vec(),
        providers: vec![ProviderKind::Canned, ProviderKind::Remote],
        presets: SamplePreset::ALL.to_vec(),
        defaults: FormDefaults {
            level: MypLevel::default(),
            criteria: vec![Criterion::InvestigatingPatterns],
            difficulty: Difficulty::default(),
            provider: ProviderKind::default(),
        },
    })
}
