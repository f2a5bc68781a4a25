//! LLM Client: the single point of entry for chat-completion calls.
//!
//! No other module may call the hosted API directly. The client holds no
//! credential of its own: each call carries the API key of the session that
//! issued it.
//!
//! One request per call. Failures are returned to the caller as-is; there is
//! no retry and no backoff.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

/// The model used for all completion calls.
pub const MODEL: &str = "gpt-3.5-turbo";
const REQUEST_TIMEOUT_SECS: u64 = 120;

const CONNECTION_TEST_PROMPT: &str = "Say 'CONNECTED' in 3 words";
const CONNECTION_TEST_MAX_TOKENS: u32 = 10;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Sampling knobs for a single call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionOptions {
    pub temperature: Option<f32>,
    pub max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatCompletionResponse {
    /// Extracts the text of the first choice.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Wraps the chat-completions endpoint of an OpenAI-compatible API.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    base_url: String,
}

impl LlmClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Makes one call to the chat-completions endpoint and returns the full response.
    pub async fn call(
        &self,
        api_key: &str,
        messages: &[ChatMessage],
        options: CompletionOptions,
    ) -> Result<ChatCompletionResponse, LlmError> {
        let request_body = ChatCompletionRequest {
            model: MODEL,
            messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: extract_error_message(body),
            });
        }

        let body = response.text().await?;
        let completion: ChatCompletionResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &completion.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(completion)
    }

    /// Calls the model and returns the completion text, failing on an empty reply.
    pub async fn complete_text(
        &self,
        api_key: &str,
        messages: &[ChatMessage],
        options: CompletionOptions,
    ) -> Result<String, LlmError> {
        let response = self.call(api_key, messages, options).await?;
        response
            .text()
            .filter(|t| !t.trim().is_empty())
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }

    /// Issues a tiny completion to confirm the credential works. Returns the reply.
    pub async fn test_connection(&self, api_key: &str) -> Result<String, LlmError> {
        let messages = [ChatMessage::user(CONNECTION_TEST_PROMPT)];
        self.complete_text(
            api_key,
            &messages,
            CompletionOptions {
                temperature: None,
                max_tokens: CONNECTION_TEST_MAX_TOKENS,
            },
        )
        .await
    }
}

/// Pulls `error.message` out of an API error body, falling back to the raw body.
fn extract_error_message(body: String) -> String {
    serde_json::from_str::<ApiErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{spawn_fake_llm, FakeReply};

    fn options() -> CompletionOptions {
        CompletionOptions {
            temperature: None,
            max_tokens: 10,
        }
    }

    #[test]
    fn test_extract_error_message_from_envelope() {
        let body = serde_json::json!({
            "error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}
        });
        assert_eq!(
            extract_error_message(body.to_string()),
            "Incorrect API key provided"
        );
    }

    #[test]
    fn test_extract_error_message_falls_back_to_raw_body() {
        assert_eq!(extract_error_message("bad gateway".to_string()), "bad gateway");
    }

    #[test]
    fn test_request_omits_temperature_when_unset() {
        let messages = [ChatMessage::user("hi")];
        let body = ChatCompletionRequest {
            model: MODEL,
            messages: &messages,
            temperature: None,
            max_tokens: 10,
        };
        let value = serde_json::to_value(&body).unwrap();

        assert!(value.get("temperature").is_none());
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["max_tokens"], 10);
    }

    #[test]
    fn test_response_text_reads_first_choice() {
        let response: ChatCompletionResponse = serde_json::from_value(serde_json::json!({
            "choices": [
                {"message": {"role": "assistant", "content": "first"}},
                {"message": {"role": "assistant", "content": "second"}}
            ]
        }))
        .unwrap();

        assert_eq!(response.text(), Some("first"));
        assert!(response.usage.is_none());
    }

    #[test]
    fn test_response_text_none_without_choices() {
        let response: ChatCompletionResponse =
            serde_json::from_value(serde_json::json!({ "choices": [] })).unwrap();
        assert!(response.text().is_none());
    }

    #[tokio::test]
    async fn test_unreadable_completion_is_parse_error() {
        let fake = spawn_fake_llm(FakeReply::Raw("not json at all".into())).await;
        let client = LlmClient::new(fake.base_url.clone()).unwrap();

        let err = client
            .call("sk-test", &[ChatMessage::user("hi")], options())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Parse(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_blank_completion_is_empty_content() {
        let fake = spawn_fake_llm(FakeReply::Text(" \n\t ".into())).await;
        let client = LlmClient::new(fake.base_url.clone()).unwrap();

        let err = client
            .complete_text("sk-test", &[ChatMessage::user("hi")], options())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::EmptyContent), "got {err:?}");
    }
}
