//! The generation capability the game is played through.
//!
//! [`GenerationBackend`] is the only seam between the game logic and the
//! outside world: given a model, a system prompt and a conversation, return
//! one reply. [`OpenRouterClient`] implements it over HTTP; tests substitute a
//! scripted fake.

use futures::future::BoxFuture;
use thiserror::Error;

use crate::game::history::Turn;
use crate::{ChatCompletion, ChatRequest, Message, OpenRouterClient, UsageInfo};

/// Errors from a generation backend.
///
/// Every variant is fatal to the game in progress. Nothing is retried.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("failed to read response: {0}")]
    Body(#[source] reqwest::Error),
    #[error("OpenRouter API HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("OpenRouter API error: {0}")]
    Api(String),
    #[error("failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("model {model} returned no text")]
    EmptyResponse { model: String },
}

/// One request to the backend: who is speaking and what they have seen.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    /// Model identifier, e.g. `"anthropic/claude-sonnet-4.5"`.
    pub model: &'a str,
    /// The agent's fixed system prompt.
    pub system: &'a str,
    /// The agent's conversation so far, oldest first.
    pub turns: &'a [Turn],
    /// Upper bound on the reply length in tokens.
    pub max_tokens: u32,
    /// Sampling temperature. `None` leaves it to the provider.
    pub temperature: Option<f32>,
}

impl GenerationRequest<'_> {
    /// Render the request as chat messages: the system prompt first, then
    /// every turn mapped to its wire role.
    pub fn to_messages(&self) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.turns.len() + 1);
        messages.push(Message::system(self.system));
        messages.extend(self.turns.iter().map(Turn::to_message));
        messages
    }
}

/// A single reply from the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub text: String,
    pub usage: Option<UsageInfo>,
}

impl Generation {
    /// A reply with no usage information attached.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: None,
        }
    }
}

/// Boxed future returned by [`GenerationBackend::generate`].
pub type GenerationFuture<'a> = BoxFuture<'a, Result<Generation, BackendError>>;

/// Anything that can turn a conversation into the next reply.
///
/// Calls are awaited one at a time; implementations need not be reentrant.
pub trait GenerationBackend: Send + Sync {
    fn generate<'a>(&'a self, request: GenerationRequest<'a>) -> GenerationFuture<'a>;
}

impl GenerationBackend for OpenRouterClient {
    fn generate<'a>(&'a self, request: GenerationRequest<'a>) -> GenerationFuture<'a> {
        Box::pin(async move {
            let body = ChatRequest {
                model: request.model.to_string(),
                messages: request.to_messages(),
                max_tokens: request.max_tokens,
                temperature: request.temperature,
            };
            let completion = self.chat(&body).await?;
            into_generation(completion, request.model)
        })
    }
}

/// A completion without text is an error, never an empty utterance.
fn into_generation(completion: ChatCompletion, model: &str) -> Result<Generation, BackendError> {
    match completion.content {
        Some(text) if !text.is_empty() => Ok(Generation {
            text,
            usage: completion.usage,
        }),
        _ => Err(BackendError::EmptyResponse {
            model: model.to_string(),
        }),
    }
}
