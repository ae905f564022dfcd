//! The game loop: setup, negotiation, private decisions, payout.
//!
//! [`GameRunner`] owns nothing but borrowed references and a validated
//! config. Calls to the backend are strictly sequential; at most one request
//! is in flight at any time.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::warn;

use crate::api::backend::GenerationBackend;
use crate::game::caller::{AgentCaller, Seat, Side};
use crate::game::config::{Economics, GameConfig};
use crate::game::decision::{ParsedDecision, parse_decision};
use crate::game::error::GameError;
use crate::game::events::{GameEvent, GameEventHandler, GamePhase, NoopHandler};
use crate::game::history::ConversationHistory;
use crate::game::negotiation::negotiate;
use crate::game::payoff::resolve;
use crate::game::prompt::{DECISION_PROMPT, game_system_prompt};
use crate::game::report::{GameReport, PlayerReport};

/// Plays one game of Split or Steal from start to finish.
///
/// ```ignore
/// let report = GameRunner::new(&client, GameConfig::default())?
///     .with_event_handler(&LoggingHandler)
///     .run()
///     .await?;
/// ```
pub struct GameRunner<'a> {
    backend: &'a dyn GenerationBackend,
    handler: &'a dyn GameEventHandler,
    config: GameConfig,
    economics: Economics,
}

impl<'a> GameRunner<'a> {
    /// Validate `config` and prepare a runner. No backend call is made.
    pub fn new(backend: &'a dyn GenerationBackend, config: GameConfig) -> Result<Self, GameError> {
        let economics = config.validate()?;
        Ok(Self {
            backend,
            handler: &NoopHandler,
            config,
            economics,
        })
    }

    /// Report game events to `handler` instead of discarding them.
    pub fn with_event_handler(mut self, handler: &'a dyn GameEventHandler) -> Self {
        self.handler = handler;
        self
    }

    /// Play the game.
    ///
    /// Issues exactly `2 * chat_rounds + 2` backend calls on success. The
    /// first backend failure aborts the game and no report is produced.
    pub async fn run(&self) -> Result<GameReport, GameError> {
        let config = &self.config;
        let started_at = Utc::now();
        let game_id = game_id(started_at);

        self.handler.on_event(&GameEvent::GameStarted {
            game_id: &game_id,
            agent_a: &config.agent_a,
            agent_b: &config.agent_b,
            economics: &self.economics,
            chat_rounds: config.chat_rounds,
        });

        let system_a = game_system_prompt(
            &config.agent_a.name,
            &config.agent_b.name,
            &self.economics,
        );
        let system_b = game_system_prompt(
            &config.agent_b.name,
            &config.agent_a.name,
            &self.economics,
        );
        let seat_a = Seat {
            side: Side::A,
            identity: &config.agent_a,
            system: &system_a,
        };
        let seat_b = Seat {
            side: Side::B,
            identity: &config.agent_b,
            system: &system_b,
        };

        let mut caller = AgentCaller::new(
            self.backend,
            self.handler,
            config.max_tokens,
            config.temperature,
        );

        self.phase(GamePhase::Negotiating);
        let negotiation = negotiate(&mut caller, seat_a, seat_b, config.chat_rounds).await?;

        self.phase(GamePhase::Deciding);
        let parsed_a = decide(&mut caller, seat_a, &negotiation.history_a).await?;
        let parsed_b = decide(&mut caller, seat_b, &negotiation.history_b).await?;

        // Announced only once both are in, so neither can be seen early.
        caller.emit(&GameEvent::DecisionMade {
            agent: &config.agent_a,
            decision: parsed_a.decision,
        });
        caller.emit(&GameEvent::DecisionMade {
            agent: &config.agent_b,
            decision: parsed_b.decision,
        });

        let resolution = resolve(parsed_a.decision, parsed_b.decision, &self.economics);
        let (usage_a, usage_b) = caller.into_usage();

        let report = GameReport {
            game_id,
            started_at,
            finished_at: Utc::now(),
            chat_rounds: config.chat_rounds,
            economics: self.economics,
            agent_a: PlayerReport::new(
                &config.agent_a,
                parsed_a.decision,
                parsed_a.ambiguous,
                resolution.payout_a,
                usage_a,
            ),
            agent_b: PlayerReport::new(
                &config.agent_b,
                parsed_b.decision,
                parsed_b.ambiguous,
                resolution.payout_b,
                usage_b,
            ),
            outcome: resolution.outcome,
            transcript: negotiation.transcript,
        };

        self.phase(GamePhase::Resolved);
        self.handler.on_event(&GameEvent::Resolved { report: &report });

        Ok(report)
    }

    fn phase(&self, phase: GamePhase) {
        self.handler.on_event(&GameEvent::PhaseChanged { phase });
    }
}

/// `game-<UTC start time>-<sequence>`; the sequence keeps games started in
/// the same second apart.
fn game_id(started_at: DateTime<Utc>) -> String {
    static SEQUENCE: AtomicU32 = AtomicU32::new(0);
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("game-{}-{seq:04}", started_at.format("%Y%m%dT%H%M%SZ"))
}

/// Ask one agent for its final decision.
///
/// The decision prompt goes into a copy of the agent's history, so the
/// negotiation histories stay as they were and the other agent never sees it.
/// The raw reply is dropped once parsed.
async fn decide(
    caller: &mut AgentCaller<'_>,
    seat: Seat<'_>,
    history: &ConversationHistory,
) -> Result<ParsedDecision, GameError> {
    let prompt = history.with_host(DECISION_PROMPT);
    let raw = caller.speak(seat, &prompt, GamePhase::Deciding).await?;
    let parsed = parse_decision(&raw);

    if parsed.ambiguous {
        warn!(
            "{} gave unclear response: '{raw}'. Defaulting to SPLIT.",
            seat.identity.name
        );
        caller.emit(&GameEvent::AmbiguousDecision {
            agent: seat.identity,
            raw: &raw,
        });
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::backend::{BackendError, Generation, GenerationFuture, GenerationRequest};
    use crate::game::config::AgentIdentity;
    use crate::game::decision::Decision;
    use crate::game::events::FnEventHandler;
    use crate::game::history::{Turn, TurnRole};
    use crate::game::payoff::Outcome;
    use crate::UsageInfo;
    use std::sync::Mutex;

    /// Chats generically, then answers the decision prompt with a fixed reply
    /// per model.
    struct Scripted {
        final_a: &'static str,
        final_b: &'static str,
        calls: Mutex<Vec<(String, Vec<Turn>)>>,
    }

    impl Scripted {
        fn new(final_a: &'static str, final_b: &'static str) -> Self {
            Self {
                final_a,
                final_b,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl GenerationBackend for Scripted {
        fn generate<'a>(&'a self, request: GenerationRequest<'a>) -> GenerationFuture<'a> {
            let mut calls = self.calls.lock().unwrap();
            calls.push((request.model.to_string(), request.turns.to_vec()));
            let deciding = request
                .turns
                .last()
                .is_some_and(|t| t.text == DECISION_PROMPT);
            let text = match (deciding, request.model) {
                (true, "model-a") => self.final_a.to_string(),
                (true, _) => self.final_b.to_string(),
                (false, model) => format!("{model} proposes we both split"),
            };
            let generation = Generation {
                text,
                usage: Some(UsageInfo {
                    prompt_tokens: Some(100),
                    completion_tokens: Some(10),
                    total_tokens: Some(110),
                }),
            };
            Box::pin(async move { Ok(generation) })
        }
    }

    struct Failing;

    impl GenerationBackend for Failing {
        fn generate<'a>(&'a self, _request: GenerationRequest<'a>) -> GenerationFuture<'a> {
            Box::pin(async { Err(BackendError::Api("upstream unavailable".into())) })
        }
    }

    fn config(rounds: u32) -> GameConfig {
        GameConfig::default()
            .with_agent_a(AgentIdentity::new("Agent A", "model-a"))
            .with_agent_b(AgentIdentity::new("Agent B", "model-b"))
            .with_chat_rounds(rounds)
    }

    #[tokio::test]
    async fn both_split_pays_half_each() {
        let backend = Scripted::new("SPLIT", "SPLIT");
        let report = GameRunner::new(&backend, config(5)).unwrap().run().await.unwrap();

        assert_eq!(report.outcome, Outcome::BothSplit);
        assert_eq!(report.agent_a.payout, 500_000);
        assert_eq!(report.agent_b.payout, 500_000);
        assert_eq!(backend.calls.lock().unwrap().len(), 12);
    }

    #[tokio::test]
    async fn stealer_takes_the_pot() {
        let backend = Scripted::new("STEAL", "I choose to split.");
        let report = GameRunner::new(&backend, config(2)).unwrap().run().await.unwrap();

        assert_eq!(report.outcome, Outcome::ASteals);
        assert_eq!(report.agent_a.decision, Decision::Steal);
        assert_eq!(report.agent_b.decision, Decision::Split);
        assert_eq!(report.agent_a.payout, 1_000_000);
        assert_eq!(report.agent_b.payout, 0);
    }

    #[tokio::test]
    async fn decision_prompt_is_private_and_last() {
        let backend = Scripted::new("SPLIT", "STEAL");
        GameRunner::new(&backend, config(3)).unwrap().run().await.unwrap();
        let calls = backend.calls.lock().unwrap();

        let (negotiation, decisions) = calls.split_at(calls.len() - 2);
        for (_, turns) in negotiation {
            assert!(turns.iter().all(|t| t.text != DECISION_PROMPT));
        }
        for (_, turns) in decisions {
            let last = turns.last().unwrap();
            assert_eq!(last.role, TurnRole::Host);
            assert_eq!(last.text, DECISION_PROMPT);
            assert_eq!(
                turns.iter().filter(|t| t.text == DECISION_PROMPT).count(),
                1,
                "the peer's decision request never leaks"
            );
        }
        // A's decision request: opening seed + 2N exchange turns + prompt.
        assert_eq!(decisions[0].1.len(), 1 + 6 + 1);
        assert_eq!(decisions[1].1.len(), 6 + 1);
    }

    #[tokio::test]
    async fn unclear_reply_defaults_to_split_and_is_flagged() {
        let backend = Scripted::new("I'll cooperate", "STEAL");
        let ambiguous = Mutex::new(Vec::new());
        let handler = FnEventHandler::new(|event: &GameEvent<'_>| {
            if let GameEvent::AmbiguousDecision { agent, raw } = event {
                ambiguous
                    .lock()
                    .unwrap()
                    .push((agent.name.clone(), raw.to_string()));
            }
        });

        let report = GameRunner::new(&backend, config(1))
            .unwrap()
            .with_event_handler(&handler)
            .run()
            .await
            .unwrap();

        assert!(report.agent_a.ambiguous);
        assert!(!report.agent_b.ambiguous);
        assert_eq!(report.outcome, Outcome::BSteals);
        assert_eq!(
            *ambiguous.lock().unwrap(),
            vec![("Agent A".to_string(), "I'll cooperate".to_string())]
        );
    }

    #[tokio::test]
    async fn events_follow_the_game_lifecycle() {
        let backend = Scripted::new("SPLIT", "SPLIT");
        let phases = Mutex::new(Vec::new());
        let handler = FnEventHandler::new(|event: &GameEvent<'_>| {
            let label = match event {
                GameEvent::GameStarted { .. } => "started".to_string(),
                GameEvent::PhaseChanged { phase } => phase.to_string(),
                GameEvent::DecisionMade { .. } => "decided".to_string(),
                GameEvent::Resolved { .. } => "resolved".to_string(),
                _ => return,
            };
            phases.lock().unwrap().push(label);
        });

        GameRunner::new(&backend, config(1))
            .unwrap()
            .with_event_handler(&handler)
            .run()
            .await
            .unwrap();

        assert_eq!(
            *phases.lock().unwrap(),
            vec![
                "started",
                "negotiation",
                "decision",
                "decided",
                "decided",
                "resolution",
                "resolved"
            ]
        );
    }

    #[tokio::test]
    async fn usage_is_kept_per_player() {
        let backend = Scripted::new("SPLIT", "SPLIT");
        let report = GameRunner::new(&backend, config(2)).unwrap().run().await.unwrap();

        for player in [&report.agent_a, &report.agent_b] {
            assert_eq!(player.usage.calls, 3, "{}", player.name);
            assert_eq!(player.usage.prompt_tokens, 300);
            assert_eq!(player.usage.completion_tokens, 30);
        }
        let total = report.total_usage();
        assert_eq!(total.calls, 6);
        assert_eq!(total.total_tokens(), 660);
        assert_eq!(report.transcript.len(), 4);
    }

    #[tokio::test]
    async fn huge_round_count_still_fails_cleanly() {
        let config = config(1).with_chat_rounds(u32::MAX);
        let err = GameRunner::new(&Failing, config)
            .unwrap()
            .run()
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GameError::Backend {
                phase: GamePhase::Negotiating,
                ..
            }
        ));
    }

    #[test]
    fn game_ids_are_unique_and_stamped() {
        let now = Utc::now();
        let first = game_id(now);
        let second = game_id(now);
        assert_ne!(first, second);
        assert!(first.starts_with(&format!("game-{}", now.format("%Y%m%d"))));
    }

    #[tokio::test]
    async fn backend_failure_names_the_agent() {
        let err = GameRunner::new(&Failing, config(1))
            .unwrap()
            .run()
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Agent A failed during negotiation: OpenRouter API error: upstream unavailable"
        );
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let err = GameRunner::new(&Failing, config(0)).err().unwrap();
        assert!(matches!(err, GameError::InvalidConfig(_)));
    }
}
