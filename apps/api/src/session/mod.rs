//! Per-session state: credential, strategy toggle, and the assessment library.
//!
//! A session is created explicitly, addressed by id on every route, and torn
//! down explicitly. Nothing outlives the process.

pub mod handlers;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::samples::SamplePreset;
use crate::models::assessment::{AssessmentMetadata, AssessmentRecord, ProviderKind};

/// State owned by one user session.
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    api_key: Option<String>,
    connection_tested: bool,
    provider: ProviderKind,
    preset: Option<SamplePreset>,
    assessments: Vec<AssessmentRecord>,
    created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            api_key: None,
            connection_tested: false,
            provider: ProviderKind::default(),
            preset: None,
            assessments: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Stores a new credential. A new key has not been verified yet.
    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
        self.connection_tested = false;
    }

    pub fn clear_api_key(&mut self) {
        self.api_key = None;
        self.connection_tested = false;
    }

    pub fn connection_tested(&self) -> bool {
        self.connection_tested
    }

    pub fn mark_connection_tested(&mut self) {
        self.connection_tested = true;
    }

    pub fn provider(&self) -> ProviderKind {
        self.provider
    }

    pub fn set_provider(&mut self, provider: ProviderKind) {
        self.provider = provider;
    }

    pub fn preset(&self) -> Option<SamplePreset> {
        self.preset
    }

    pub fn arm_preset(&mut self, preset: Option<SamplePreset>) {
        self.preset = preset;
    }

    /// Consumes the armed preset, if any.
    pub fn take_preset(&mut self) -> Option<SamplePreset> {
        self.preset.take()
    }

    pub fn assessments(&self) -> &[AssessmentRecord] {
        &self.assessments
    }

    pub fn assessment(&self, id: u32) -> Option<&AssessmentRecord> {
        self.assessments.iter().find(|a| a.id == id)
    }

    /// Appends a record with the next sequential id and returns a copy of it.
    ///
    /// The list never shrinks, so `len + 1` is unique for the life of the session.
    pub fn append(
        &mut self,
        title: String,
        content: String,
        metadata: AssessmentMetadata,
    ) -> AssessmentRecord {
        let record = AssessmentRecord {
            id: self.assessments.len() as u32 + 1,
            title,
            content,
            metadata,
        };
        self.assessments.push(record.clone());
        record
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            session_id: self.id,
            has_api_key: self.api_key.is_some(),
            connection_tested: self.connection_tested,
            provider: self.provider,
            preset: self.preset,
            assessment_count: self.assessments.len(),
            created_at: self.created_at,
        }
    }
}

/// Client-facing snapshot of a session. Never carries the credential itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub has_api_key: bool,
    pub connection_tested: bool,
    pub provider: ProviderKind,
    pub preset: Option<SamplePreset>,
    pub assessment_count: usize,
    pub created_at: DateTime<Utc>,
}

/// In-memory registry of live sessions.
///
/// Cheap to clone; all clones share the same map.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> SessionView {
        let id = Uuid::new_v4();
        let session = Session::new(id);
        let view = session.view();
        self.sessions.write().await.insert(id, session);
        view
    }

    /// Runs `f` against a shared borrow of the session.
    pub async fn read<F, R>(&self, id: Uuid, f: F) -> Result<R, AppError>
    where
        F: FnOnce(&Session) -> R,
    {
        let sessions = self.sessions.read().await;
        let session = sessions.get(&id).ok_or_else(|| session_not_found(id))?;
        Ok(f(session))
    }

    /// Runs `f` against a mutable borrow of the session.
    /// Uses the callback pattern so the lock guard never escapes.
    pub async fn with_session<F, R>(&self, id: Uuid, f: F) -> Result<R, AppError>
    where
        F: FnOnce(&mut Session) -> R,
    {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or_else(|| session_not_found(id))?;
        Ok(f(session))
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        if self.sessions.write().await.remove(&id).is_none() {
            return Err(session_not_found(id));
        }
        Ok(())
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

fn session_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}
