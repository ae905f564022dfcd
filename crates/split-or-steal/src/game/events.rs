//! Events and handlers for observing a game.
//!
//! The [`GameRunner`](super::runner::GameRunner) reports everything it does
//! through [`GameEvent`]s. It never prints; presentation belongs to whoever
//! implements [`GameEventHandler`].
//!
//! | Handler | Use case |
//! |---------|----------|
//! | [`NoopHandler`] | Tests or silent runs |
//! | [`LoggingHandler`] | Structured logging via `tracing` |
//! | [`FnEventHandler`] | Quick closures for simple callbacks |
//! | [`CompositeEventHandler`] | Compose multiple handlers in order |

use serde::Serialize;
use tracing::{debug, info};

use crate::game::config::{AgentIdentity, Economics};
use crate::game::decision::Decision;
use crate::game::report::GameReport;

/// Where a game is in its lifecycle.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    Setup,
    Negotiating,
    Deciding,
    Resolved,
}

impl std::fmt::Display for GamePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GamePhase::Setup => write!(f, "setup"),
            GamePhase::Negotiating => write!(f, "negotiation"),
            GamePhase::Deciding => write!(f, "decision"),
            GamePhase::Resolved => write!(f, "resolution"),
        }
    }
}

/// Events emitted by the runner during a game.
#[derive(Debug)]
pub enum GameEvent<'a> {
    /// The config is valid and the game is about to begin.
    GameStarted {
        game_id: &'a str,
        agent_a: &'a AgentIdentity,
        agent_b: &'a AgentIdentity,
        economics: &'a Economics,
        chat_rounds: u32,
    },
    /// The game moved to a new phase.
    PhaseChanged { phase: GamePhase },
    /// An agent said something during negotiation.
    Utterance {
        round: u32,
        speaker: &'a AgentIdentity,
        text: &'a str,
    },
    /// Token usage reported by the backend for one call.
    TokenUsage {
        agent: &'a AgentIdentity,
        prompt_tokens: u32,
        completion_tokens: u32,
    },
    /// A final reply named neither SPLIT nor STEAL; SPLIT was assumed.
    AmbiguousDecision {
        agent: &'a AgentIdentity,
        raw: &'a str,
    },
    /// An agent's final decision, reported once both have decided.
    DecisionMade {
        agent: &'a AgentIdentity,
        decision: Decision,
    },
    /// Payouts are settled.
    Resolved { report: &'a GameReport },
}

/// Handler for game events.
///
/// The default implementation ignores everything.
pub trait GameEventHandler: Send + Sync {
    fn on_event(&self, event: &GameEvent<'_>) {
        let _ = event;
    }
}

/// A handler that does nothing.
pub struct NoopHandler;
impl GameEventHandler for NoopHandler {}

/// An event handler backed by a closure.
pub struct FnEventHandler<F>(F)
where
    F: Fn(&GameEvent<'_>) + Send + Sync;

impl<F> FnEventHandler<F>
where
    F: Fn(&GameEvent<'_>) + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> GameEventHandler for FnEventHandler<F>
where
    F: Fn(&GameEvent<'_>) + Send + Sync,
{
    fn on_event(&self, event: &GameEvent<'_>) {
        (self.0)(event)
    }
}

/// An event handler that forwards every event to each inner handler in
/// registration order.
///
/// ```ignore
/// let handler = CompositeEventHandler::new()
///     .with(LoggingHandler)
///     .with(TranscriptPrinter);
/// ```
pub struct CompositeEventHandler {
    handlers: Vec<Box<dyn GameEventHandler>>,
}

impl CompositeEventHandler {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Add a handler to the chain. Handlers are called in registration order.
    pub fn with(mut self, handler: impl GameEventHandler + 'static) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    /// Conditionally add a handler to the chain.
    pub fn with_if(self, condition: bool, handler: impl GameEventHandler + 'static) -> Self {
        if condition { self.with(handler) } else { self }
    }
}

impl Default for CompositeEventHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl GameEventHandler for CompositeEventHandler {
    fn on_event(&self, event: &GameEvent<'_>) {
        for handler in &self.handlers {
            handler.on_event(event);
        }
    }
}

/// Logs game events through `tracing`.
pub struct LoggingHandler;

impl GameEventHandler for LoggingHandler {
    fn on_event(&self, event: &GameEvent<'_>) {
        match event {
            GameEvent::GameStarted {
                game_id,
                agent_a,
                agent_b,
                economics,
                chat_rounds,
            } => {
                info!(
                    "Game {game_id} created: {} ({}) vs {} ({}), pot: {}, rounds: {chat_rounds}",
                    agent_a.name,
                    agent_a.model,
                    agent_b.name,
                    agent_b.model,
                    economics.pot(),
                );
            }
            GameEvent::PhaseChanged { phase } => {
                info!("Entering {phase} phase");
            }
            GameEvent::Utterance {
                round,
                speaker,
                text,
            } => {
                let preview: String = text.chars().take(200).collect();
                debug!(
                    "[round {round}] {}: {preview}{}",
                    speaker.name,
                    if text.chars().count() > 200 { "..." } else { "" }
                );
            }
            GameEvent::TokenUsage {
                agent,
                prompt_tokens,
                completion_tokens,
            } => {
                debug!(
                    "Tokens for {} ({}): prompt={prompt_tokens}, completion={completion_tokens}",
                    agent.name, agent.model
                );
            }
            // The runner already warns; keep the raw reply at debug level.
            GameEvent::AmbiguousDecision { agent, raw } => {
                debug!("Ambiguous decision from {}: {raw:?}", agent.name);
            }
            GameEvent::DecisionMade { agent, decision } => {
                info!("{} chose {decision}", agent.name);
            }
            GameEvent::Resolved { report } => {
                info!(
                    "Game {} resolved: {}={}, {}={} -> {:?} ({})",
                    report.game_id,
                    report.agent_a.name,
                    report.agent_a.decision,
                    report.agent_b.name,
                    report.agent_b.decision,
                    report.outcome,
                    report.total_usage(),
                );
            }
        }
    }
}
