//! Per-agent conversation histories and the relay between them.
//!
//! Each agent owns one [`ConversationHistory`]. It only ever grows: turns are
//! appended, never edited or removed. The two histories never share storage;
//! [`relay`] copies an agent's latest utterance into the other history as a
//! new quoted turn.

use serde::{Deserialize, Serialize};

use crate::Message;
use crate::game::prompt::relay_message;

/// Who produced a turn, from the owning agent's point of view.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    /// Written by the agent that owns the history.
    Own,
    /// The other agent's utterance, quoted.
    Peer,
    /// A fixed instruction from the game host.
    Host,
}

/// One entry in a conversation history.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Turn {
    pub role: TurnRole,
    pub text: String,
}

impl Turn {
    pub fn own(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Own,
            text: text.into(),
        }
    }

    pub fn peer(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Peer,
            text: text.into(),
        }
    }

    pub fn host(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Host,
            text: text.into(),
        }
    }

    /// Map to a chat message. The owner's turns are the assistant side;
    /// everything it was told is the user side.
    pub fn to_message(&self) -> Message {
        match self.role {
            TurnRole::Own => Message::assistant(&self.text),
            TurnRole::Peer | TurnRole::Host => Message::user(&self.text),
        }
    }
}

/// Append-only list of turns seen by one agent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationHistory {
    turns: Vec<Turn>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_own(&mut self, text: impl Into<String>) {
        self.turns.push(Turn::own(text));
    }

    pub fn push_peer(&mut self, text: impl Into<String>) {
        self.turns.push(Turn::peer(text));
    }

    pub fn push_host(&mut self, text: impl Into<String>) {
        self.turns.push(Turn::host(text));
    }

    /// A copy of this history with one extra host turn at the end.
    ///
    /// Used for one-shot requests (the final decision) that must not leave a
    /// trace in the original.
    pub fn with_host(&self, text: impl Into<String>) -> Self {
        let mut copy = self.clone();
        copy.push_host(text);
        copy
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Number of turns exchanged with the peer (own + incoming), excluding
    /// host instructions.
    pub fn exchange_len(&self) -> usize {
        self.turns
            .iter()
            .filter(|t| t.role != TurnRole::Host)
            .count()
    }

    /// Text of the most recent turn this agent wrote.
    pub fn last_own(&self) -> Option<&str> {
        self.turns
            .iter()
            .rev()
            .find(|t| t.role == TurnRole::Own)
            .map(|t| t.text.as_str())
    }
}

/// Quote `from`'s latest own turn into `to` as an incoming turn attributed to
/// `speaker`.
///
/// `opening` selects the first-relay phrasing that announces the game start.
/// Leaves `to` untouched if `from` has not spoken yet.
pub fn relay(
    from: &ConversationHistory,
    speaker: &str,
    to: &mut ConversationHistory,
    opening: bool,
) {
    if let Some(text) = from.last_own() {
        to.push_peer(relay_message(speaker, text, opening));
    }
}
