//! Game configuration with the classic Sonnet-vs-Haiku defaults.
//!
//! [`GameConfig`] is built once and handed to
//! [`GameRunner::new`](super::runner::GameRunner::new), which validates it and
//! derives the [`Economics`]. Nothing is read from globals during a game.

use serde::Serialize;

use crate::game::error::GameError;

/// Default model for Agent A.
pub const DEFAULT_MODEL_A: &str = "anthropic/claude-sonnet-4.5";

/// Default model for Agent B.
pub const DEFAULT_MODEL_B: &str = "anthropic/claude-haiku-4.5";

/// Number of times each agent speaks during negotiation.
pub const DEFAULT_CHAT_ROUNDS: u32 = 5;

/// Amount each agent commits to enter the game.
pub const DEFAULT_BUY_IN: u64 = 500_000;

/// Reply length cap for every backend call.
pub const DEFAULT_MAX_TOKENS: u32 = 256;

/// Who a player is: a display name and the model that speaks for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentIdentity {
    pub name: String,
    pub model: String,
}

impl AgentIdentity {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// The money side of a game.
///
/// Only the buy-in is stored; the pot and the split share are derived, so
/// `pot == 2 * buy_in` and `split_amount == pot / 2` always hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "EconomicsView")]
pub struct Economics {
    buy_in: u64,
}

impl Economics {
    /// Validate a buy-in. Zero and buy-ins whose pot would overflow are rejected.
    pub fn new(buy_in: u64) -> Result<Self, GameError> {
        if buy_in == 0 {
            return Err(GameError::InvalidConfig(
                "buy-in must be greater than zero".to_string(),
            ));
        }
        if buy_in.checked_mul(2).is_none() {
            return Err(GameError::InvalidConfig(format!(
                "buy-in {buy_in} is too large: the pot would overflow"
            )));
        }
        Ok(Self { buy_in })
    }

    pub fn buy_in(&self) -> u64 {
        self.buy_in
    }

    /// Total pot: both buy-ins.
    pub fn pot(&self) -> u64 {
        self.buy_in * 2
    }

    /// Each player's share when both split.
    ///
    /// Integer division: an odd pot would lose one unit.
    pub fn split_amount(&self) -> u64 {
        self.pot() / 2
    }
}

impl Default for Economics {
    fn default() -> Self {
        Self {
            buy_in: DEFAULT_BUY_IN,
        }
    }
}

#[derive(Serialize)]
struct EconomicsView {
    buy_in: u64,
    pot: u64,
    split_amount: u64,
}

impl From<Economics> for EconomicsView {
    fn from(e: Economics) -> Self {
        Self {
            buy_in: e.buy_in(),
            pot: e.pot(),
            split_amount: e.split_amount(),
        }
    }
}

/// Configuration for a single game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// First speaker. Default: `"Agent A"` on [`DEFAULT_MODEL_A`].
    pub agent_a: AgentIdentity,
    /// Second speaker. Default: `"Agent B"` on [`DEFAULT_MODEL_B`].
    pub agent_b: AgentIdentity,
    /// Negotiation rounds; each agent speaks once per round. Default: `5`.
    pub chat_rounds: u32,
    /// Buy-in per agent. Default: `500_000`.
    pub buy_in: u64,
    /// Maximum tokens per reply. Default: `256`.
    pub max_tokens: u32,
    /// Sampling temperature. Default: provider default.
    pub temperature: Option<f32>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            agent_a: AgentIdentity::new("Agent A", DEFAULT_MODEL_A),
            agent_b: AgentIdentity::new("Agent B", DEFAULT_MODEL_B),
            chat_rounds: DEFAULT_CHAT_ROUNDS,
            buy_in: DEFAULT_BUY_IN,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: None,
        }
    }
}

impl GameConfig {
    pub fn with_agent_a(mut self, agent: AgentIdentity) -> Self {
        self.agent_a = agent;
        self
    }

    pub fn with_agent_b(mut self, agent: AgentIdentity) -> Self {
        self.agent_b = agent;
        self
    }

    pub fn with_chat_rounds(mut self, rounds: u32) -> Self {
        self.chat_rounds = rounds;
        self
    }

    pub fn with_buy_in(mut self, buy_in: u64) -> Self {
        self.buy_in = buy_in;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Check the config and derive the game's [`Economics`].
    pub fn validate(&self) -> Result<Economics, GameError> {
        if self.chat_rounds == 0 {
            return Err(GameError::InvalidConfig(
                "chat rounds must be at least 1".to_string(),
            ));
        }
        if self.max_tokens == 0 {
            return Err(GameError::InvalidConfig(
                "max tokens must be greater than zero".to_string(),
            ));
        }
        for agent in [&self.agent_a, &self.agent_b] {
            if agent.name.trim().is_empty() || agent.model.trim().is_empty() {
                return Err(GameError::InvalidConfig(format!(
                    "agent {agent:?} needs both a name and a model"
                )));
            }
        }
        // Relayed turns are attributed by name, so the names must differ.
        if self.agent_a.name == self.agent_b.name {
            return Err(GameError::InvalidConfig(format!(
                "both agents are named {:?}",
                self.agent_a.name
            )));
        }
        Economics::new(self.buy_in)
    }
}
