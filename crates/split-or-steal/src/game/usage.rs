//! Token usage and estimated spend, kept per player.
//!
//! Each [`PlayerReport`](super::report::PlayerReport) carries the [`Usage`]
//! of its own backend calls, so a report shows what each model cost.

use serde::Serialize;

use crate::UsageInfo;

/// USD per million tokens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rate {
    pub input: f64,
    pub output: f64,
}

/// Rough list prices, matched in order against the model name.
const RATES: &[(&str, Rate)] = &[
    ("opus", Rate { input: 15.0, output: 75.0 }),
    ("sonnet", Rate { input: 3.0, output: 15.0 }),
    ("haiku-4", Rate { input: 1.0, output: 5.0 }),
    ("haiku", Rate { input: 0.25, output: 1.25 }),
    ("gpt-4o-mini", Rate { input: 0.15, output: 0.60 }),
    ("gpt-4o", Rate { input: 2.50, output: 10.0 }),
];

const FALLBACK_RATE: Rate = Rate {
    input: 3.0,
    output: 15.0,
};

impl Rate {
    /// Look up the rate for `model`, ignoring any `org/` prefix.
    pub fn for_model(model: &str) -> Rate {
        let name = model.rsplit('/').next().unwrap_or(model).to_lowercase();
        RATES
            .iter()
            .find(|(needle, _)| name.contains(needle))
            .map_or(FALLBACK_RATE, |(_, rate)| *rate)
    }

    fn cost(self, prompt_tokens: u64, completion_tokens: u64) -> f64 {
        (prompt_tokens as f64 * self.input + completion_tokens as f64 * self.output) / 1_000_000.0
    }
}

/// What one player's backend calls consumed.
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct Usage {
    pub calls: u32,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub cost_usd: f64,
}

impl Usage {
    /// Count one call. Token counts the backend did not report count as zero.
    pub fn record(&mut self, reported: Option<&UsageInfo>, rate: Rate) {
        self.calls += 1;
        let Some(info) = reported else {
            return;
        };
        let prompt = u64::from(info.prompt_tokens.unwrap_or(0));
        let completion = u64::from(info.completion_tokens.unwrap_or(0));
        self.prompt_tokens += prompt;
        self.completion_tokens += completion;
        self.cost_usd += rate.cost(prompt, completion);
    }

    pub fn total_tokens(&self) -> u64 {
        self.prompt_tokens + self.completion_tokens
    }

    /// Both players together.
    pub fn combined(self, other: Usage) -> Usage {
        Usage {
            calls: self.calls + other.calls,
            prompt_tokens: self.prompt_tokens + other.prompt_tokens,
            completion_tokens: self.completion_tokens + other.completion_tokens,
            cost_usd: self.cost_usd + other.cost_usd,
        }
    }
}

impl std::fmt::Display for Usage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} calls, {} tokens ({} in / {} out), ~${:.4}",
            self.calls,
            self.total_tokens(),
            self.prompt_tokens,
            self.completion_tokens,
            self.cost_usd
        )
    }
}
