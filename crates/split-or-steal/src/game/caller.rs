//! One backend call on behalf of one agent.

use crate::api::backend::{GenerationBackend, GenerationRequest};
use crate::game::config::AgentIdentity;
use crate::game::error::GameError;
use crate::game::events::{GameEvent, GameEventHandler, GamePhase};
use crate::game::history::ConversationHistory;
use crate::game::usage::{Rate, Usage};

/// Which chair an agent sits in. A speaks first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    A,
    B,
}

/// An agent at the table: its chair, who it is and its system prompt.
#[derive(Debug, Clone, Copy)]
pub struct Seat<'a> {
    pub side: Side,
    pub identity: &'a AgentIdentity,
    pub system: &'a str,
}

/// Issues backend calls for both agents and accounts for each one's usage.
///
/// Every call goes through [`speak`](Self::speak), so usage is recorded
/// and failures are tagged with the agent and phase in one place.
pub struct AgentCaller<'a> {
    backend: &'a dyn GenerationBackend,
    handler: &'a dyn GameEventHandler,
    max_tokens: u32,
    temperature: Option<f32>,
    usage_a: Usage,
    usage_b: Usage,
}

impl<'a> AgentCaller<'a> {
    pub fn new(
        backend: &'a dyn GenerationBackend,
        handler: &'a dyn GameEventHandler,
        max_tokens: u32,
        temperature: Option<f32>,
    ) -> Self {
        Self {
            backend,
            handler,
            max_tokens,
            temperature,
            usage_a: Usage::default(),
            usage_b: Usage::default(),
        }
    }

    /// Ask `seat`'s model for its next reply given `history`.
    ///
    /// A backend failure is returned as [`GameError::Backend`] naming the
    /// agent and `phase`. Nothing is retried.
    pub async fn speak(
        &mut self,
        seat: Seat<'_>,
        history: &ConversationHistory,
        phase: GamePhase,
    ) -> Result<String, GameError> {
        let request = GenerationRequest {
            model: &seat.identity.model,
            system: seat.system,
            turns: history.turns(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let generation = self
            .backend
            .generate(request)
            .await
            .map_err(|source| GameError::Backend {
                agent: seat.identity.name.clone(),
                phase,
                source,
            })?;

        let usage = match seat.side {
            Side::A => &mut self.usage_a,
            Side::B => &mut self.usage_b,
        };
        usage.record(
            generation.usage.as_ref(),
            Rate::for_model(&seat.identity.model),
        );

        if let Some(reported) = generation.usage {
            self.emit(&GameEvent::TokenUsage {
                agent: seat.identity,
                prompt_tokens: reported.prompt_tokens.unwrap_or(0),
                completion_tokens: reported.completion_tokens.unwrap_or(0),
            });
        }

        Ok(generation.text)
    }

    pub fn emit(&self, event: &GameEvent<'_>) {
        self.handler.on_event(event);
    }

    /// Usage for A and B, in that order.
    pub fn into_usage(self) -> (Usage, Usage) {
        (self.usage_a, self.usage_b)
    }
}
