//! Final decisions and how free text is turned into one.

use serde::{Deserialize, Serialize};

/// A player's private final choice.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision {
    Split,
    Steal,
}

impl Decision {
    /// The token an agent is told to answer with.
    pub const fn token(self) -> &'static str {
        match self {
            Decision::Split => "SPLIT",
            Decision::Steal => "STEAL",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

/// Result of classifying a raw reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedDecision {
    pub decision: Decision,
    /// The reply named neither token; `decision` is the SPLIT fallback.
    pub ambiguous: bool,
}

/// Classify a raw reply as SPLIT or STEAL.
///
/// The reply is trimmed and upper-cased, then checked for `STEAL` first and
/// `SPLIT` second. A reply that mentions both is therefore a STEAL. A reply
/// that mentions neither falls back to SPLIT and is flagged as ambiguous; the
/// caller is expected to warn about it.
pub fn parse_decision(raw: &str) -> ParsedDecision {
    let normalized = raw.trim().to_uppercase();

    if normalized.contains(Decision::Steal.token()) {
        ParsedDecision {
            decision: Decision::Steal,
            ambiguous: false,
        }
    } else if normalized.contains(Decision::Split.token()) {
        ParsedDecision {
            decision: Decision::Split,
            ambiguous: false,
        }
    } else {
        ParsedDecision {
            decision: Decision::Split,
            ambiguous: true,
        }
    }
}
