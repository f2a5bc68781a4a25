//! Axum route handlers for session lifecycle and per-session settings.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::{AppJson, AppPath};
use crate::generation::samples::SamplePreset;
use crate::models::assessment::ProviderKind;
use crate::session::SessionView;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CredentialRequest {
    pub api_key: String,
}

#[derive(Debug, Deserialize)]
pub struct ProviderRequest {
    pub provider: ProviderKind,
}

#[derive(Debug, Deserialize)]
pub struct PresetRequest {
    pub preset: Option<SamplePreset>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConnectionTestResponse {
    pub connected: bool,
    pub reply: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionView>) {
    let view = state.sessions.create().await;
    info!("Created session {}", view.session_id);
    (StatusCode::CREATED, Json(view))
}

/// GET /api/v1/sessions/:session_id
pub async fn handle_get_session(
    State(state): State<AppState>,
    AppPath(session_id): AppPath<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let view = state.sessions.read(session_id, |s| s.view()).await?;
    Ok(Json(view))
}

/// DELETE /api/v1/sessions/:session_id
///
/// Tears the session down along with its library and credential.
pub async fn handle_delete_session(
    State(state): State<AppState>,
    AppPath(session_id): AppPath<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(session_id).await?;
    info!("Removed session {session_id}");
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/sessions/:session_id/credential
pub async fn handle_set_credential(
    State(state): State<AppState>,
    AppPath(session_id): AppPath<Uuid>,
    AppJson(request): AppJson<CredentialRequest>,
) -> Result<Json<SessionView>, AppError> {
    let api_key = request.api_key.trim().to_string();
    if api_key.is_empty() {
        return Err(AppError::Validation("api_key cannot be empty".to_string()));
    }

    let view = state
        .sessions
        .with_session(session_id, |s| {
            s.set_api_key(api_key);
            s.view()
        })
        .await?;
    Ok(Json(view))
}

/// DELETE /api/v1/sessions/:session_id/credential
pub async fn handle_clear_credential(
    State(state): State<AppState>,
    AppPath(session_id): AppPath<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .with_session(session_id, |s| {
            s.clear_api_key();
            s.view()
        })
        .await?;
    Ok(Json(view))
}

/// POST /api/v1/sessions/:session_id/connection-test
///
/// Confirms the stored credential with one tiny completion. Only marks the
/// session as tested if the same key is still stored when the call returns.
pub async fn handle_connection_test(
    State(state): State<AppState>,
    AppPath(session_id): AppPath<Uuid>,
) -> Result<Json<ConnectionTestResponse>, AppError> {
    let api_key = state
        .sessions
        .read(session_id, |s| s.api_key().map(str::to_string))
        .await?
        .ok_or(AppError::MissingCredential)?;

    let reply = state.llm.test_connection(&api_key).await?;

    state
        .sessions
        .with_session(session_id, |s| {
            if s.api_key() == Some(api_key.as_str()) {
                s.mark_connection_tested();
            }
        })
        .await?;
    info!("Connection confirmed for session {session_id}");

    Ok(Json(ConnectionTestResponse {
        connected: true,
        reply,
    }))
}

/// PUT /api/v1/sessions/:session_id/provider
pub async fn handle_set_provider(
    State(state): State<AppState>,
    AppPath(session_id): AppPath<Uuid>,
    AppJson(request): AppJson<ProviderRequest>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .with_session(session_id, |s| {
            s.set_provider(request.provider);
            s.view()
        })
        .await?;
    Ok(Json(view))
}

/// PUT /api/v1/sessions/:session_id/preset
///
/// Arms (or with `null`, disarms) a quick-start sample for the next canned generation.
pub async fn handle_set_preset(
    State(state): State<AppState>,
    AppPath(session_id): AppPath<Uuid>,
    AppJson(request): AppJson<PresetRequest>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .with_session(session_id, |s| {
            s.arm_preset(request.preset);
            s.view()
        })
        .await?;
    Ok(Json(view))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use super::*;
    use crate::test_support::{spawn_fake_llm, spawn_gated_fake_llm, test_server, FakeReply};

    #[tokio::test]
    async fn test_session_lifecycle() {
        let server = test_server("http://127.0.0.1:9");

        let created = server.post("/api/v1/sessions").await;
        created.assert_status(StatusCode::CREATED);
        let view: SessionView = created.json();
        assert_eq!(view.assessment_count, 0);
        assert!(!view.has_api_key);

        let path = format!("/api/v1/sessions/{}", view.session_id);
        server.get(&path).await.assert_status_ok();
        server.delete(&path).await.assert_status(StatusCode::NO_CONTENT);
        server.get(&path).await.assert_status_not_found();
    }

    #[tokio::test]
    async fn test_blank_credential_is_rejected() {
        let server = test_server("http://127.0.0.1:9");
        let view: SessionView = server.post("/api/v1/sessions").await.json();

        let response = server
            .put(&format!("/api/v1/sessions/{}/credential", view.session_id))
            .json(&json!({ "api_key": "   " }))
            .await;
        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_connection_test_requires_credential() {
        let server = test_server("http://127.0.0.1:9");
        let view: SessionView = server.post("/api/v1/sessions").await.json();

        let response = server
            .post(&format!("/api/v1/sessions/{}/connection-test", view.session_id))
            .await;
        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"]["code"], "MISSING_CREDENTIAL");
    }

    #[tokio::test]
    async fn test_connection_test_marks_session_and_new_key_resets_it() {
        let fake = spawn_fake_llm(FakeReply::Text("CONNECTED and ready".into())).await;
        let server = test_server(&fake.base_url);
        let view: SessionView = server.post("/api/v1/sessions").await.json();
        let base = format!("/api/v1/sessions/{}", view.session_id);

        server
            .put(&format!("{base}/credential"))
            .json(&json!({ "api_key": "sk-good" }))
            .await
            .assert_status_ok();

        let response = server.post(&format!("{base}/connection-test")).await;
        response.assert_status_ok();
        let result: ConnectionTestResponse = response.json();
        assert!(result.connected);
        assert_eq!(result.reply, "CONNECTED and ready");

        let sent = fake.last_request().await.unwrap();
        assert_eq!(sent["max_tokens"], 10);
        assert_eq!(sent["messages"][0]["content"], "Say 'CONNECTED' in 3 words");

        let view: SessionView = server.get(&base).await.json();
        assert!(view.connection_tested);

        let view: SessionView = server
            .put(&format!("{base}/credential"))
            .json(&json!({ "api_key": "sk-other" }))
            .await
            .json();
        assert!(view.has_api_key);
        assert!(!view.connection_tested);
    }

    #[tokio::test]
    async fn test_failed_connection_test_reports_provider_message() {
        let fake = spawn_fake_llm(FakeReply::Error {
            status: 401,
            message: "Incorrect API key provided".into(),
        })
        .await;
        let server = test_server(&fake.base_url);
        let view: SessionView = server.post("/api/v1/sessions").await.json();
        let base = format!("/api/v1/sessions/{}", view.session_id);

        server
            .put(&format!("{base}/credential"))
            .json(&json!({ "api_key": "sk-bad" }))
            .await
            .assert_status_ok();

        let response = server.post(&format!("{base}/connection-test")).await;
        response.assert_status(StatusCode::BAD_GATEWAY);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"]["code"], "PROVIDER_ERROR");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("Incorrect API key provided"));

        let view: SessionView = server.get(&base).await.json();
        assert!(!view.connection_tested);
    }

    #[tokio::test]
    async fn test_provider_toggle_and_preset() {
        let server = test_server("http://127.0.0.1:9");
        let view: SessionView = server.post("/api/v1/sessions").await.json();
        let base = format!("/api/v1/sessions/{}", view.session_id);

        let view: SessionView = server
            .put(&format!("{base}/provider"))
            .json(&json!({ "provider": "remote" }))
            .await
            .json();
        assert_eq!(view.provider, ProviderKind::Remote);

        let view: SessionView = server
            .put(&format!("{base}/preset"))
            .json(&json!({ "preset": "stats" }))
            .await
            .json();
        assert_eq!(view.preset, Some(SamplePreset::Stats));

        let view: SessionView = server
            .put(&format!("{base}/preset"))
            .json(&json!({ "preset": null }))
            .await
            .json();
        assert!(view.preset.is_none());
    }

    #[tokio::test]
    async fn test_key_swapped_during_connection_test_stays_unconfirmed() {
        let fake = spawn_gated_fake_llm(FakeReply::Text("CONNECTED".into())).await;
        let server = test_server(&fake.base_url);
        let view: SessionView = server.post("/api/v1/sessions").await.json();
        let base = format!("/api/v1/sessions/{}", view.session_id);

        server
            .put(&format!("{base}/credential"))
            .json(&json!({ "api_key": "sk-first" }))
            .await
            .assert_status_ok();

        let connection_test = async { server.post(&format!("{base}/connection-test")).await };
        let swap_key = async {
            fake.wait_for_requests(1).await;
            server
                .put(&format!("{base}/credential"))
                .json(&json!({ "api_key": "sk-second" }))
                .await
                .assert_status_ok();
            fake.release();
        };
        let (response, ()) = tokio::join!(connection_test, swap_key);
        response.assert_status_ok();

        assert_eq!(fake.authorization().await.as_deref(), Some("Bearer sk-first"));
        let view: SessionView = server.get(&base).await.json();
        assert!(view.has_api_key);
        assert!(!view.connection_tested);
    }
}
