//! Play one game of Split or Steal between two models and print the result.
//!
//! Reads the API key from the `OPENROUTER_KEY` environment variable.
//!
//! # Examples
//!
//! ```sh
//! # Classic setup: Sonnet vs Haiku, 5 rounds, $500,000 buy-in each
//! split-or-steal
//!
//! # Shorter game between two other models
//! split-or-steal --model-a openai/gpt-4o --model-b google/gemini-2.0-flash-001 \
//!   --name-a GPT --name-b Gemini --rounds 3
//!
//! # Machine-readable report, debug logs on stderr
//! split-or-steal --json -v > report.json
//! ```

use clap::Parser;
use split_or_steal::game::config::{
    DEFAULT_BUY_IN, DEFAULT_CHAT_ROUNDS, DEFAULT_MAX_TOKENS, DEFAULT_MODEL_A, DEFAULT_MODEL_B,
};
use split_or_steal::prelude::*;
use std::process;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const RULE_WIDTH: usize = 60;

/// Play Split or Steal between two LLM agents.
///
/// Reads the API key from the OPENROUTER_KEY environment variable.
#[derive(Parser)]
#[command(name = "split-or-steal", version)]
struct Cli {
    // ── Players ────────────────────────────────────────────────
    /// Model for Agent A, who speaks first
    #[arg(long, env = "GAME_MODEL_A", default_value = DEFAULT_MODEL_A)]
    model_a: String,

    /// Model for Agent B
    #[arg(long, env = "GAME_MODEL_B", default_value = DEFAULT_MODEL_B)]
    model_b: String,

    /// Display name for Agent A
    #[arg(long, default_value = "Agent A")]
    name_a: String,

    /// Display name for Agent B
    #[arg(long, default_value = "Agent B")]
    name_b: String,

    // ── Game ───────────────────────────────────────────────────
    /// Negotiation rounds (each agent speaks once per round)
    #[arg(long, env = "GAME_CHAT_ROUNDS", default_value_t = DEFAULT_CHAT_ROUNDS)]
    rounds: u32,

    /// Buy-in per agent; the pot is twice this
    #[arg(long, env = "GAME_BUY_IN", default_value_t = DEFAULT_BUY_IN)]
    buy_in: u64,

    // ── Sampling ───────────────────────────────────────────────
    /// Maximum tokens per reply
    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
    max_tokens: u32,

    /// Sampling temperature (provider default if unset)
    #[arg(long)]
    temperature: Option<f32>,

    // ── Output ─────────────────────────────────────────────────
    /// Print the full game report as JSON instead of the transcript
    #[arg(long)]
    json: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn game_config(&self) -> GameConfig {
        let config = GameConfig::default()
            .with_agent_a(AgentIdentity::new(&self.name_a, &self.model_a))
            .with_agent_b(AgentIdentity::new(&self.name_b, &self.model_b))
            .with_chat_rounds(self.rounds)
            .with_buy_in(self.buy_in)
            .with_max_tokens(self.max_tokens);
        match self.temperature {
            Some(t) => config.with_temperature(t),
            None => config,
        }
    }
}

/// Prints the game to stdout as it happens.
struct TranscriptPrinter;

impl GameEventHandler for TranscriptPrinter {
    fn on_event(&self, event: &GameEvent<'_>) {
        match event {
            GameEvent::GameStarted {
                agent_a,
                agent_b,
                economics,
                chat_rounds,
                ..
            } => {
                banner(&format!("SPLIT OR STEAL: {} vs {}", agent_a.name, agent_b.name));
                println!();
                println!("  {}: {}", agent_a.name, agent_a.model);
                println!("  {}: {}", agent_b.name, agent_b.model);
                println!("  Buy-in:  ${} each", with_commas(economics.buy_in()));
                println!("  Pot:     ${}", with_commas(economics.pot()));
                println!("  Rounds:  {chat_rounds}");
            }
            GameEvent::PhaseChanged { phase } => match phase {
                GamePhase::Negotiating => {
                    banner("NEGOTIATION PHASE");
                    println!();
                }
                GamePhase::Deciding => {
                    println!();
                    println!("{}", "-".repeat(RULE_WIDTH));
                    println!("  Negotiation complete.");
                    println!("{}", "-".repeat(RULE_WIDTH));
                    banner("DECISION PHASE");
                    println!();
                }
                GamePhase::Setup | GamePhase::Resolved => {}
            },
            GameEvent::Utterance { speaker, text, .. } => {
                println!("  {}:  {text}", speaker.name);
            }
            GameEvent::AmbiguousDecision { agent, raw } => {
                println!(
                    "  WARNING: {} gave unclear response: '{raw}'. Defaulting to SPLIT.",
                    agent.name
                );
            }
            GameEvent::DecisionMade { agent, decision } => {
                println!("  {} chose:  {decision}", agent.name);
            }
            GameEvent::TokenUsage { .. } | GameEvent::Resolved { .. } => {}
        }
    }
}

fn banner(title: &str) {
    println!();
    println!("{}", "=".repeat(RULE_WIDTH));
    println!("        {title}");
    println!("{}", "=".repeat(RULE_WIDTH));
}

fn print_results(report: &GameReport) {
    banner("RESULTS");
    println!();
    for player in [&report.agent_a, &report.agent_b] {
        println!(
            "  {}:  {} → ${}",
            player.name,
            player.decision,
            with_commas(player.payout)
        );
    }
    println!();
    println!("  {}", report.headline());
    println!();
}

/// Render `n` with comma thousands separators.
fn with_commas(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn init_logging(verbose: bool) {
    let default = if verbose { "warn,split_or_steal=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn play(cli: &Cli) -> Result<GameReport, GameError> {
    let api_key = std::env::var("OPENROUTER_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty())
        .ok_or(GameError::MissingApiKey)?;
    let client = OpenRouterClient::new(api_key)?;

    let handler = CompositeEventHandler::new()
        .with(LoggingHandler)
        .with_if(!cli.json, TranscriptPrinter);

    GameRunner::new(&client, cli.game_config())?
        .with_event_handler(&handler)
        .run()
        .await
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match play(&cli).await {
        Ok(report) if cli.json => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        },
        Ok(report) => print_results(&report),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn thousands_separators() {
        assert_eq!(with_commas(0), "0");
        assert_eq!(with_commas(999), "999");
        assert_eq!(with_commas(1_000), "1,000");
        assert_eq!(with_commas(500_000), "500,000");
        assert_eq!(with_commas(1_000_000), "1,000,000");
    }

    /// Declared defaults, read from the command definition so that
    /// `GAME_*` variables in the environment cannot change the outcome.
    fn declared_default(id: &str) -> Option<String> {
        Cli::command()
            .get_arguments()
            .find(|arg| arg.get_id() == id)
            .and_then(|arg| arg.get_default_values().first())
            .map(|value| value.to_string_lossy().into_owned())
    }

    #[test]
    fn cli_defaults_match_classic_game() {
        assert_eq!(declared_default("model_a").as_deref(), Some(DEFAULT_MODEL_A));
        assert_eq!(declared_default("model_b").as_deref(), Some(DEFAULT_MODEL_B));
        assert_eq!(declared_default("rounds"), Some(DEFAULT_CHAT_ROUNDS.to_string()));
        assert_eq!(declared_default("buy_in"), Some(DEFAULT_BUY_IN.to_string()));
        assert_eq!(declared_default("name_b").as_deref(), Some("Agent B"));
        assert_eq!(declared_default("temperature"), None);
    }

    #[test]
    fn cli_flags_reach_the_config() {
        let cli = Cli::parse_from([
            "split-or-steal",
            "--rounds",
            "2",
            "--buy-in",
            "10",
            "--name-a",
            "Sonnet",
            "--temperature",
            "0.5",
        ]);
        let config = cli.game_config();
        assert_eq!(config.chat_rounds, 2);
        assert_eq!(config.buy_in, 10);
        assert_eq!(config.agent_a.name, "Sonnet");
        assert_eq!(config.temperature, Some(0.5));
    }
}
