//! Split or Steal between two LLM agents.
//!
//! Two agents, each driven by its own model and its own system prompt, hold a
//! short negotiation over the [OpenRouter](https://openrouter.ai/) chat
//! completions API. When the chat ends, each agent is asked in private for a
//! final decision, SPLIT or STEAL, and the pot is paid out according to the
//! classic payoff matrix.
//!
//! # Getting started
//!
//! ```ignore
//! use split_or_steal::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), GameError> {
//!     let api_key = std::env::var("OPENROUTER_KEY").map_err(|_| GameError::MissingApiKey)?;
//!     let client = OpenRouterClient::new(api_key)?;
//!
//!     let config = GameConfig::default()
//!         .with_chat_rounds(3)
//!         .with_buy_in(1_000);
//!
//!     let report = GameRunner::new(&client, config)?
//!         .with_event_handler(&LoggingHandler)
//!         .run()
//!         .await?;
//!
//!     println!("{}", report.outcome.headline(&report.agent_a.name, &report.agent_b.name));
//!     Ok(())
//! }
//! ```
//!
//! # Where to find things
//!
//! - **Game flow:** [`GameRunner`](game::runner::GameRunner) sequences the
//!   negotiation, the private decisions and the payout.
//! - **Negotiation:** [`game::negotiation`] relays each agent's turn into the
//!   other agent's [`ConversationHistory`](game::history::ConversationHistory).
//! - **Decisions and payouts:** [`parse_decision`](game::decision::parse_decision)
//!   and [`resolve`](game::payoff::resolve).
//! - **Prompts:** [`game::prompt`] renders the per-agent system prompt and the
//!   fixed host messages.
//! - **Backends:** implement [`GenerationBackend`](api::backend::GenerationBackend)
//!   to plug in anything that turns a conversation into a reply.
//!   [`OpenRouterClient`] is the HTTP implementation.
//! - **Observing a game:** implement [`GameEventHandler`](game::events::GameEventHandler).

pub mod api;
pub mod game;
pub mod prelude;

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

use crate::api::backend::BackendError;

// ── Constants ──────────────────────────────────────────────────────

pub const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

// ── Request types ──────────────────────────────────────────────────

/// Chat completion request body. Unset optional fields are omitted from
/// serialization so the API applies its own defaults.
#[derive(Serialize, Debug, Default)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "is_zero_u32")]
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

fn is_zero_u32(v: &u32) -> bool {
    *v == 0
}

// ── Message types ──────────────────────────────────────────────────

/// Role of a message in the conversation.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// A message in the conversation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

// ── Response types ─────────────────────────────────────────────────

/// Raw API response (internal deserialization target).
#[derive(Deserialize, Debug)]
struct RawChatResponse {
    choices: Option<Vec<RawChoice>>,
    error: Option<ApiErrorResponse>,
    #[serde(default)]
    usage: Option<UsageInfo>,
}

#[derive(Deserialize, Debug)]
struct RawChoice {
    message: RawResponseMessage,
}

#[derive(Deserialize, Debug)]
struct RawResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ApiErrorResponse {
    message: String,
}

/// Clean return type from [`OpenRouterClient::chat()`].
#[derive(Debug)]
pub struct ChatCompletion {
    pub content: Option<String>,
    pub usage: Option<UsageInfo>,
}

/// Token usage statistics.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsageInfo {
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
}

// ── Client ─────────────────────────────────────────────────────────

/// Async HTTP client for the OpenRouter chat completions API.
pub struct OpenRouterClient {
    pub(crate) client: reqwest::Client,
    pub(crate) api_key: String,
    pub(crate) referer: String,
    pub(crate) title: String,
}

impl OpenRouterClient {
    /// Create a new client with the given API key and default headers.
    pub fn new(api_key: impl Into<String>) -> Result<Self, BackendError> {
        Self::with_headers(api_key, "https://crates.io/crates/split-or-steal", "split-or-steal")
    }

    /// Create a new client with custom Referer and X-Title headers.
    pub fn with_headers(
        api_key: impl Into<String>,
        referer: impl Into<String>,
        title: impl Into<String>,
    ) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .user_agent("split-or-steal/0.1")
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(BackendError::Client)?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            referer: referer.into(),
            title: title.into(),
        })
    }

    /// Send a chat completion request.
    pub async fn chat(&self, body: &ChatRequest) -> Result<ChatCompletion, BackendError> {
        debug!(
            "LLM request: model={}, messages={}, max_tokens={}",
            body.model,
            body.messages.len(),
            body.max_tokens,
        );
        trace!(
            "Request payload size: {} bytes",
            serde_json::to_string(body).map_or(0, |s| s.len())
        );

        let start = Instant::now();

        let resp = self
            .client
            .post(OPENROUTER_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.title)
            .json(body)
            .send()
            .await
            .map_err(BackendError::Request)?;

        let status = resp.status();
        let text = resp.text().await.map_err(BackendError::Body)?;

        debug!(
            "LLM response: HTTP {} in {:.1}s ({} bytes)",
            status,
            start.elapsed().as_secs_f64(),
            text.len()
        );

        if !status.is_success() {
            return Err(BackendError::Status { status, body: text });
        }

        parse_chat_response(&text)
    }
}

/// Decode a chat completions response body into a [`ChatCompletion`].
fn parse_chat_response(text: &str) -> Result<ChatCompletion, BackendError> {
    let parsed: RawChatResponse = serde_json::from_str(text)?;

    if let Some(err) = parsed.error {
        return Err(BackendError::Api(err.message));
    }

    if let Some(ref usage) = parsed.usage {
        debug!(
            "Token usage: prompt={}, completion={}, total={}",
            usage.prompt_tokens.unwrap_or(0),
            usage.completion_tokens.unwrap_or(0),
            usage.total_tokens.unwrap_or(0),
        );
    }

    match parsed.choices.and_then(|c| c.into_iter().next()) {
        Some(c) => Ok(ChatCompletion {
            content: c.message.content,
            usage: parsed.usage,
        }),
        None => {
            debug!("LLM output: empty (no choices)");
            Ok(ChatCompletion {
                content: None,
                usage: parsed.usage,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_constructors() {
        let sys = Message::system("hello");
        assert_eq!(sys.role, MessageRole::System);
        assert_eq!(sys.content, "hello");

        let user = Message::user("world");
        assert_eq!(user.role, MessageRole::User);

        let assist = Message::assistant("reply");
        assert_eq!(assist.role, MessageRole::Assistant);
        assert_eq!(assist.content, "reply");
    }

    #[test]
    fn chat_request_skips_unset_fields() {
        let req = ChatRequest {
            model: "test-model".into(),
            messages: vec![Message::user("hi")],
            ..Default::default()
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["model"], "test-model");
        assert_eq!(json["messages"][0]["role"], "user");
        assert!(json.get("max_tokens").is_none());
        assert!(json.get("temperature").is_none());
    }

    #[test]
    fn parse_response_takes_first_choice() {
        let body = r#"{
            "choices": [
                {"message": {"content": "SPLIT"}, "finish_reason": "stop"},
                {"message": {"content": "STEAL"}, "finish_reason": "stop"}
            ],
            "usage": {"prompt_tokens": 12, "completion_tokens": 1, "total_tokens": 13}
        }"#;
        let completion = parse_chat_response(body).unwrap();
        assert_eq!(completion.content.as_deref(), Some("SPLIT"));
        assert_eq!(completion.usage.unwrap().prompt_tokens, Some(12));
    }

    #[test]
    fn parse_response_surfaces_api_error() {
        let body = r#"{"error": {"message": "invalid api key"}}"#;
        let err = parse_chat_response(body).unwrap_err();
        assert!(matches!(err, BackendError::Api(ref m) if m == "invalid api key"));
    }

    #[test]
    fn parse_response_without_choices_is_empty() {
        let completion = parse_chat_response(r#"{"choices": []}"#).unwrap();
        assert!(completion.content.is_none());
    }

    #[test]
    fn parse_response_rejects_garbage() {
        let err = parse_chat_response("not json").unwrap_err();
        assert!(matches!(err, BackendError::Parse(_)));
    }
}
