//! The record a finished game leaves behind.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::game::config::{AgentIdentity, Economics};
use crate::game::decision::Decision;
use crate::game::payoff::Outcome;
use crate::game::usage::Usage;

/// One negotiation utterance, in the order it was spoken.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct TranscriptEntry {
    /// 1-based round number.
    pub round: u32,
    pub speaker: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// How one player fared.
#[derive(Serialize, Clone, Debug)]
pub struct PlayerReport {
    pub name: String,
    pub model: String,
    pub decision: Decision,
    /// The reply named neither token and fell back to SPLIT.
    pub ambiguous: bool,
    pub payout: u64,
    /// What this player's backend calls consumed.
    pub usage: Usage,
}

impl PlayerReport {
    pub(crate) fn new(
        identity: &AgentIdentity,
        decision: Decision,
        ambiguous: bool,
        payout: u64,
        usage: Usage,
    ) -> Self {
        Self {
            name: identity.name.clone(),
            model: identity.model.clone(),
            decision,
            ambiguous,
            payout,
            usage,
        }
    }
}

/// Everything worth knowing about a finished game.
#[derive(Serialize, Clone, Debug)]
pub struct GameReport {
    pub game_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub chat_rounds: u32,
    pub economics: Economics,
    pub agent_a: PlayerReport,
    pub agent_b: PlayerReport,
    pub outcome: Outcome,
    pub transcript: Vec<TranscriptEntry>,
}

impl GameReport {
    /// The one-line verdict, e.g. "Agent A betrayed Agent B and took the whole pot!".
    pub fn headline(&self) -> String {
        self.outcome.headline(&self.agent_a.name, &self.agent_b.name)
    }

    /// Usage across both players.
    pub fn total_usage(&self) -> Usage {
        self.agent_a.usage.combined(self.agent_b.usage)
    }
}
