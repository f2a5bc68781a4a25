pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::generation::handlers as generation;
use crate::library::handlers as library;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/options", get(generation::handle_form_options))
        // Session lifecycle and settings
        .route("/api/v1/sessions", post(session::handle_create_session))
        .route(
            "/api/v1/sessions/:session_id",
            get(session::handle_get_session).delete(session::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:session_id/credential",
            put(session::handle_set_credential).delete(session::handle_clear_credential),
        )
        .route(
            "/api/v1/sessions/:session_id/connection-test",
            post(session::handle_connection_test),
        )
        .route(
            "/api/v1/sessions/:session_id/provider",
            put(session::handle_set_provider),
        )
        .route(
            "/api/v1/sessions/:session_id/preset",
            put(session::handle_set_preset),
        )
        // Generation and library
        .route(
            "/api/v1/sessions/:session_id/assessments",
            post(generation::handle_generate).get(library::handle_list_assessments),
        )
        .route(
            "/api/v1/sessions/:session_id/assessments/:id",
            get(library::handle_get_assessment),
        )
        .route(
            "/api/v1/sessions/:session_id/assessments/:id/download",
            get(library::handle_download_assessment),
        )
        .route(
            "/api/v1/sessions/:session_id/analytics",
            get(library::handle_analytics),
        )
        .with_state(state)
}
