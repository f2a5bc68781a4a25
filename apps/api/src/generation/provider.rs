//! Content providers: two interchangeable strategies behind one trait.
//!
//! `RemoteProvider` makes one chat-completion call; `CannedProvider` returns a
//! static sample block. The generator picks one per request from the session's
//! strategy toggle and never falls back from one to the other.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::generation::prompts::{
    ASSESSMENT_MAX_TOKENS, ASSESSMENT_PROMPT_TEMPLATE, ASSESSMENT_TEMPERATURE,
};
use crate::generation::samples::SamplePreset;
use crate::llm_client::prompts::{DEFAULT_CONTEXT, MYP_TEACHER_SYSTEM};
use crate::llm_client::{ChatMessage, CompletionOptions, LlmClient};
use crate::models::assessment::{AssessmentRequest, ProviderKind};

/// Title and body produced by a provider, before it becomes a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub title: String,
    pub content: String,
}

#[async_trait]
pub trait ContentProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    async fn produce(&self, request: &AssessmentRequest) -> Result<GeneratedContent, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// RemoteProvider
// ────────────────────────────────────────────────────────────────────────────

/// Generates content through the hosted chat-completion API using the
/// session's own credential.
pub struct RemoteProvider {
    llm: LlmClient,
    api_key: String,
}

impl RemoteProvider {
    pub fn new(llm: LlmClient, api_key: String) -> Self {
        Self { llm, api_key }
    }
}

#[async_trait]
impl ContentProvider for RemoteProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Remote
    }

    async fn produce(&self, request: &AssessmentRequest) -> Result<GeneratedContent, AppError> {
        let prompt = build_assessment_prompt(request);
        let messages = [
            ChatMessage::system(MYP_TEACHER_SYSTEM),
            ChatMessage::user(prompt),
        ];

        info!(
            "Requesting remote assessment: MYP {} {}",
            request.level, request.topic
        );

        let content = self
            .llm
            .complete_text(
                &self.api_key,
                &messages,
                CompletionOptions {
                    temperature: Some(ASSESSMENT_TEMPERATURE),
                    max_tokens: ASSESSMENT_MAX_TOKENS,
                },
            )
            .await?;

        Ok(GeneratedContent {
            title: format!("MYP {} {} Assessment", request.level, request.topic),
            content,
        })
    }
}

/// Fills the assessment template with the form inputs.
pub fn build_assessment_prompt(request: &AssessmentRequest) -> String {
    let criteria = request
        .criteria
        .iter()
        .map(|c| c.label())
        .collect::<Vec<_>>()
        .join(", ");

    ASSESSMENT_PROMPT_TEMPLATE
        .replace("{level}", &request.level.to_string())
        .replace("{topic}", request.topic.as_str())
        .replace("{criteria}", &criteria)
        .replace("{difficulty}", request.difficulty.as_str())
        .replace(
            "{context}",
            request.context.as_deref().unwrap_or(DEFAULT_CONTEXT),
        )
}

// ────────────────────────────────────────────────────────────────────────────
// CannedProvider
// ────────────────────────────────────────────────────────────────────────────

/// Serves static sample content keyed by topic. Always succeeds.
///
/// An armed quick-start preset overrides the topic lookup and supplies its own title.
pub struct CannedProvider {
    preset: Option<SamplePreset>,
}

impl CannedProvider {
    pub fn new(preset: Option<SamplePreset>) -> Self {
        Self { preset }
    }
}

#[async_trait]
impl ContentProvider for CannedProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Canned
    }

    async fn produce(&self, request: &AssessmentRequest) -> Result<GeneratedContent, AppError> {
        let generated = match self.preset {
            Some(preset) => {
                let sample = preset.sample();
                GeneratedContent {
                    title: sample.title.to_string(),
                    content: sample.content.to_string(),
                }
            }
            None => GeneratedContent {
                title: format!("{} Assessment - MYP {}", request.topic, request.level),
                content: SamplePreset::for_topic(request.topic)
                    .sample()
                    .content
                    .to_string(),
            },
        };
        Ok(generated)
    }
}
