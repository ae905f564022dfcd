//! Errors that end a game.

use thiserror::Error;

use crate::api::backend::BackendError;
use crate::game::events::GamePhase;

/// Why a game could not be played to completion.
///
/// An ambiguous final decision is deliberately absent: it resolves to SPLIT
/// with a warning and never aborts the game.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid game config: {0}")]
    InvalidConfig(String),
    #[error("OPENROUTER_KEY environment variable is not set")]
    MissingApiKey,
    #[error("{agent} failed during {phase}: {source}")]
    Backend {
        agent: String,
        phase: GamePhase,
        #[source]
        source: BackendError,
    },
}

impl From<BackendError> for GameError {
    /// Backend errors raised outside a game (e.g. while building the client).
    fn from(source: BackendError) -> Self {
        GameError::Backend {
            agent: "client".to_string(),
            phase: GamePhase::Setup,
            source,
        }
    }
}
