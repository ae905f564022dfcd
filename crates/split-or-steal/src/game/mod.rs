//! Game runtime: the [`GameRunner`] and everything it sequences.
//!
//! - [`runner::GameRunner`] plays one game end to end. Start here.
//! - [`config`] holds [`GameConfig`], the agent identities and the derived
//!   [`Economics`] (buy-in, pot, split share).
//! - [`negotiation`] runs the alternating chat rounds.
//! - [`history`] keeps each agent's private [`ConversationHistory`] and
//!   relays utterances between them.
//! - [`decision`] and [`payoff`] turn final replies into payouts.
//! - [`prompt`] renders system prompts with [`SystemPromptBuilder`].
//! - [`events`] is the [`GameEventHandler`] trait and its stock handlers.
//! - [`report`] is the [`GameReport`] a finished game produces, with each
//!   player's [`Usage`] from [`usage`].

pub mod caller;
pub mod config;
pub mod decision;
pub mod error;
pub mod events;
pub mod history;
pub mod negotiation;
pub mod payoff;
pub mod prompt;
pub mod report;
pub mod runner;
pub mod usage;

pub use config::{AgentIdentity, Economics, GameConfig};
pub use decision::{Decision, ParsedDecision, parse_decision};
pub use error::GameError;
pub use events::{
    CompositeEventHandler, FnEventHandler, GameEvent, GameEventHandler, GamePhase, LoggingHandler,
    NoopHandler,
};
pub use history::{ConversationHistory, Turn, TurnRole, relay};
pub use payoff::{Outcome, Resolution, resolve};
pub use prompt::{SystemPromptBuilder, game_system_prompt};
pub use report::{GameReport, PlayerReport, TranscriptEntry};
pub use runner::GameRunner;
pub use usage::Usage;
