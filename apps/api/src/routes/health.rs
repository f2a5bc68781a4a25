use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status, version, and the number of live sessions.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "assessment-api",
        "llm_endpoint": state.config.openai_base_url,
        "sessions": state.sessions.count().await
    }))
}

#[cfg(test)]
mod tests {
    use crate::test_support::test_server;

    #[tokio::test]
    async fn test_health_reports_live_sessions() {
        let server = test_server("http://127.0.0.1:9");
        server.post("/api/v1/sessions").await;

        let response = server.get("/health").await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["sessions"], 1);
    }
}
