//! The negotiation phase: a fixed number of alternating rounds.
//!
//! Agent A always speaks first in a round and Agent B answers having seen A's
//! latest line. Each agent's [`ConversationHistory`] is owned here for the
//! duration of the phase; the only thing that crosses between them is the
//! quoted text produced by [`relay`].

use chrono::Utc;

use crate::game::caller::{AgentCaller, Seat};
use crate::game::error::GameError;
use crate::game::events::{GameEvent, GamePhase};
use crate::game::history::{ConversationHistory, relay};
use crate::game::prompt::OPENING_PROMPT;
use crate::game::report::TranscriptEntry;

/// Both agents' histories after the last round, plus the shared transcript.
#[derive(Debug, Clone)]
pub struct Negotiation {
    pub history_a: ConversationHistory,
    pub history_b: ConversationHistory,
    pub transcript: Vec<TranscriptEntry>,
}

/// Run `rounds` rounds of negotiation between `a` and `b`.
///
/// Per round: A speaks, A's line is relayed to B, B speaks, B's line is
/// relayed to A. Before the first round A's history is seeded with the
/// opening instruction. The first backend failure aborts the phase.
pub async fn negotiate(
    caller: &mut AgentCaller<'_>,
    a: Seat<'_>,
    b: Seat<'_>,
    rounds: u32,
) -> Result<Negotiation, GameError> {
    let mut history_a = ConversationHistory::new();
    let mut history_b = ConversationHistory::new();
    let mut transcript = Vec::new();

    for round in 0..rounds {
        let opening = round == 0;
        if opening {
            history_a.push_host(OPENING_PROMPT);
        }

        let text_a = caller
            .speak(a, &history_a, GamePhase::Negotiating)
            .await?;
        record(caller, &mut transcript, round + 1, a, &text_a);
        history_a.push_own(text_a);
        relay(&history_a, &a.identity.name, &mut history_b, opening);

        let text_b = caller
            .speak(b, &history_b, GamePhase::Negotiating)
            .await?;
        record(caller, &mut transcript, round + 1, b, &text_b);
        history_b.push_own(text_b);
        relay(&history_b, &b.identity.name, &mut history_a, false);
    }

    Ok(Negotiation {
        history_a,
        history_b,
        transcript,
    })
}

fn record(
    caller: &AgentCaller<'_>,
    transcript: &mut Vec<TranscriptEntry>,
    round: u32,
    seat: Seat<'_>,
    text: &str,
) {
    caller.emit(&GameEvent::Utterance {
        round,
        speaker: seat.identity,
        text,
    });
    transcript.push(TranscriptEntry {
        round,
        speaker: seat.identity.name.clone(),
        text: text.to_string(),
        timestamp: Utc::now(),
    });
}
