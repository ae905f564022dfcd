//! Convenience re-exports for common `split-or-steal` types.
//!
//! Meant to be glob-imported when running games:
//!
//! ```ignore
//! use split_or_steal::prelude::*;
//! ```
//!
//! This pulls in the client, the game runner and its config, the result
//! types and the stock event handlers. Lower-level pieces (histories,
//! prompts, the negotiation loop) are left out; import those from
//! [`crate::game`] directly when needed.

// ── Core types ──────────────────────────────────────────────────────
pub use crate::{ChatRequest, Message, OpenRouterClient};

// ── Backend seam ────────────────────────────────────────────────────
pub use crate::api::{BackendError, Generation, GenerationBackend, GenerationRequest};

// ── Game runtime ────────────────────────────────────────────────────
pub use crate::game::{
    AgentIdentity, CompositeEventHandler, Decision, Economics, FnEventHandler, GameConfig,
    GameError, GameEvent, GameEventHandler, GamePhase, GameReport, GameRunner, LoggingHandler,
    NoopHandler, Outcome, PlayerReport, Usage,
};
