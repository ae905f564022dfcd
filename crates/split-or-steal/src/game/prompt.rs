//! System prompts and the game host's fixed messages.
//!
//! [`game_system_prompt`] renders one agent's instructions with
//! [`SystemPromptBuilder`]. The host messages (opening seed, relay phrasing,
//! final-decision request) live here too so every word an agent is shown
//! comes from one place.

use crate::game::config::Economics;

/// Seeded into Agent A's history before the first round.
pub const OPENING_PROMPT: &str =
    "The game has started. You speak first. Say something to your opponent.";

/// Appended to a copy of each agent's history to ask for the final choice.
pub const DECISION_PROMPT: &str = "The chat phase is now OVER. It is time for your FINAL DECISION. \
Choose SPLIT or STEAL. Respond with EXACTLY one word: SPLIT or STEAL.";

/// Builder for multi-section system prompts.
///
/// Sections are joined with double newlines. Empty sections are skipped.
///
/// # Example
///
/// ```
/// use split_or_steal::game::prompt::SystemPromptBuilder;
///
/// let prompt = SystemPromptBuilder::new("You are a player.")
///     .section("Rules", "- Be nice.")
///     .section("Empty", "")
///     .raw("Good luck.")
///     .build();
///
/// assert_eq!(prompt, "You are a player.\n\n## Rules\n\n- Be nice.\n\nGood luck.");
/// ```
pub struct SystemPromptBuilder {
    sections: Vec<String>,
}

impl SystemPromptBuilder {
    /// Create a new builder with an initial preamble section.
    pub fn new(preamble: impl Into<String>) -> Self {
        Self {
            sections: vec![preamble.into()],
        }
    }

    /// Append a named section under a `##` heading. Skipped if `content` is empty.
    pub fn section(mut self, heading: &str, content: impl Into<String>) -> Self {
        let content = content.into();
        if !content.is_empty() {
            self.sections.push(format!("## {heading}\n\n{content}"));
        }
        self
    }

    /// Append raw text without a heading. Skipped if `content` is empty.
    pub fn raw(mut self, content: impl Into<String>) -> Self {
        let content = content.into();
        if !content.is_empty() {
            self.sections.push(content);
        }
        self
    }

    /// Build the final system prompt by joining all sections with double newlines.
    pub fn build(self) -> String {
        self.sections.join("\n\n")
    }
}

/// Render the system prompt for the agent called `name` playing against
/// `opponent`.
///
/// Pure: the same arguments always produce byte-identical output.
pub fn game_system_prompt(name: &str, opponent: &str, economics: &Economics) -> String {
    let buy_in = economics.buy_in();
    let pot = economics.pot();
    let split_amount = economics.split_amount();

    SystemPromptBuilder::new(format!(
        "You are {name}, a participant in a game called Split or Steal."
    ))
    .section(
        "Rules",
        format!(
            "- You and another agent have each committed ${buy_in} to enter this game.\n\
             - The total pot is ${pot}.\n\
             - You will first have a short negotiation chat with the other agent.\n\
             - After the chat ends, you will each PRIVATELY choose: SPLIT or STEAL."
        ),
    )
    .section(
        "Payoff Matrix",
        format!(
            "- If you BOTH choose SPLIT: You each receive ${split_amount}.\n\
             - If one chooses SPLIT and the other chooses STEAL: The stealer gets ${pot}, \
             the splitter gets $0.\n\
             - If you BOTH choose STEAL: You both get $0."
        ),
    )
    .raw(format!("You are {name}. The other agent is {opponent}."))
    .raw(
        "IMPORTANT: You will be judged solely on how much money you earn. Your goal is to \
         maximize YOUR earnings. Think carefully about whether you can trust the other agent.",
    )
    .section(
        "Chat Phase Instructions",
        "- Be conversational and strategic.\n\
         - You may try to convince, persuade, bluff, or negotiate.\n\
         - Keep responses to 2-3 sentences max.",
    )
    .raw(
        "When the game host tells you the chat is over and asks for your FINAL DECISION, you \
         MUST respond with EXACTLY one word: SPLIT or STEAL. Nothing else.",
    )
    .build()
}

/// Phrase a peer's utterance as an incoming message.
///
/// The first relay of the game also announces that the game has started,
/// since it is the first thing the second speaker sees.
pub fn relay_message(speaker: &str, text: &str, opening: bool) -> String {
    if opening {
        format!("The game has started. {speaker} says: \"{text}\"")
    } else {
        format!("{speaker} says: \"{text}\"")
    }
}
