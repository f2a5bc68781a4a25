//! Assessment generation: the submit path of the form.
//!
//! Flow: normalize request → resolve strategy against session preconditions →
//!       provider.produce() → append record to the session library.
//!
//! The session lock is released while the provider runs. A failed action
//! leaves the session exactly as it was.

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::provider::{CannedProvider, ContentProvider, RemoteProvider};
use crate::generation::samples::SamplePreset;
use crate::llm_client::LlmClient;
use crate::models::assessment::{
    AssessmentMetadata, AssessmentRecord, AssessmentRequest, ProviderKind,
};
use crate::session::{Session, SessionStore};

/// What a submission will run with, decided while holding the session lock.
#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    Remote { api_key: String },
    Canned { preset: Option<SamplePreset> },
}

impl Strategy {
    fn into_provider(self, llm: &LlmClient) -> Box<dyn ContentProvider> {
        match self {
            Strategy::Remote { api_key } => Box::new(RemoteProvider::new(llm.clone(), api_key)),
            Strategy::Canned { preset } => Box::new(CannedProvider::new(preset)),
        }
    }
}

/// Checks the remote-strategy preconditions and snapshots what the provider needs.
///
/// Under the canned strategy this consumes the armed preset, so at most one
/// submission ever runs with it. A failed precondition leaves the session untouched.
pub fn resolve_strategy(session: &mut Session) -> Result<Strategy, AppError> {
    match session.provider() {
        ProviderKind::Remote => {
            let api_key = session.api_key().ok_or(AppError::MissingCredential)?;
            if !session.connection_tested() {
                return Err(AppError::ConnectionUntested);
            }
            Ok(Strategy::Remote {
                api_key: api_key.to_string(),
            })
        }
        ProviderKind::Canned => Ok(Strategy::Canned {
            preset: session.take_preset(),
        }),
    }
}

/// Runs one submission end to end and returns the appended record.
pub async fn generate_assessment(
    sessions: &SessionStore,
    llm: &LlmClient,
    session_id: Uuid,
    request: AssessmentRequest,
) -> Result<AssessmentRecord, AppError> {
    let request = request.normalized();

    let strategy = sessions.with_session(session_id, resolve_strategy).await??;
    let provider = strategy.into_provider(llm);
    let kind = provider.kind();

    let generated = provider.produce(&request).await.map_err(|e| {
        warn!("Generation failed for session {session_id}: {e}");
        e
    })?;

    let metadata = AssessmentMetadata {
        level: request.level,
        topic: request.topic,
        criteria: request.criteria,
        difficulty: request.difficulty,
        context: request.context,
        provider: kind,
        created_at: Utc::now(),
    };

    let record = sessions
        .with_session(session_id, |session| {
            session.append(generated.title, generated.content, metadata)
        })
        .await
        .map_err(|e| {
            warn!("Session {session_id} ended before its assessment could be stored");
            e
        })?;

    info!(
        "Appended assessment {} ({:?}) to session {session_id}",
        record.id, kind
    );

    Ok(record)
}
