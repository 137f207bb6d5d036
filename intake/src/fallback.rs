//! Deterministic offline assistant.
//!
//! SYSTEM CONTEXT
//! ==============
//! Used in two places: as the injected strategy when no language model is
//! configured, and as the substitute value whenever a live or remote call
//! fails. Every value is fully populated so views never render a broken
//! state; the same input always yields the same output. Generated ideas are
//! labelled as examples instead of showing an error.

use serde_json::{Map, json};

use crate::ai::{AssistantApi, AuditResult, ChatReply, ChatTurn, Idea, NormalizedResult, Suggestion, SuggestionAction};

#[cfg(test)]
#[path = "fallback_test.rs"]
mod fallback_test;

pub const ESTIMATED_RANGE: &str = "$5k - $25k";
pub const ESTIMATED_TIMELINE: &str = "8-12 weeks";
pub const EXAMPLE_PREFIX: &str = "Example: ";

const PRICE_WORDS: &[&str] = &[
    "price", "prices", "pricing", "priced", "cost", "costs", "costing", "budget", "budgets", "quote", "quotes",
    "quoted", "rate", "rates", "how much",
];
const TIMELINE_WORDS: &[&str] = &[
    "timeline", "timelines", "deadline", "deadlines", "weeks", "launch", "launches", "launched", "launching",
    "how long", "when can",
];
const IDEA_WORDS: &[&str] = &["idea", "ideas", "ai", "automate", "automated", "automation", "brainstorm"];
const GREETING_WORDS: &[&str] = &["hello", "hi", "hey"];

/// Phrases match as substrings; single words match whole tokens only.
fn mentions(haystack: &str, words: &[&str]) -> bool {
    let tokens: Vec<&str> = haystack
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();
    words.iter().any(|w| if w.contains(' ') { haystack.contains(w) } else { tokens.contains(w) })
}

fn start_project() -> Suggestion {
    Suggestion::action("Start Project Form", SuggestionAction::StartProject)
}

fn explore_tools() -> Suggestion {
    Suggestion::action("Explore AI Tools", SuggestionAction::OpenPlayground)
}

fn browse_work() -> Suggestion {
    Suggestion::action("Browse Case Studies", SuggestionAction::ViewWork)
}

/// Offline chat reply. Pricing and timeline questions carry an estimate in
/// `projectData` so the intent record picks it up like a live answer.
#[must_use]
pub fn chat_reply(message: &str) -> ChatReply {
    let lower = message.to_lowercase();

    if mentions(&lower, PRICE_WORDS) {
        let mut project_data = Map::new();
        project_data.insert("estimatedRange".into(), json!(ESTIMATED_RANGE));
        return ChatReply {
            message: "Project costs vary based on complexity. Typically, our automation solutions range from \
                      $5k–$15k, while full platform builds start at $25k. Would you like to run a scope analysis?"
                .into(),
            suggestions: vec![
                Suggestion::action("Run scope analysis", SuggestionAction::StartProject),
                Suggestion::action("See case studies", SuggestionAction::ViewWork),
                Suggestion::action("Contact sales", SuggestionAction::Contact),
            ],
            project_data,
        };
    }

    if mentions(&lower, TIMELINE_WORDS) {
        let mut project_data = Map::new();
        project_data.insert("estimatedTimeline".into(), json!(ESTIMATED_TIMELINE));
        return ChatReply {
            message: format!(
                "A typical first release takes {ESTIMATED_TIMELINE}: one to two weeks of discovery, then \
                 design and build in two-week iterations with a demo at the end of each."
            ),
            suggestions: vec![start_project(), Suggestion::reply("How do you run discovery?")],
            project_data,
        };
    }

    if mentions(&lower, IDEA_WORDS) {
        return ChatReply {
            message: "We help teams find the places where AI and automation pay off quickly. The AI tools can \
                      audit a process or brainstorm product ideas with you right now."
                .into(),
            suggestions: vec![explore_tools(), browse_work()],
            project_data: Map::new(),
        };
    }

    if mentions(&lower, GREETING_WORDS) {
        return ChatReply {
            message: "Hello! Ready to optimize your operations? Tell me a bit about what you're looking to build."
                .into(),
            suggestions: vec![
                Suggestion::reply("Automate a workflow"),
                Suggestion::reply("Build a customer portal"),
                Suggestion::reply("Analyze my data"),
            ],
            project_data: Map::new(),
        };
    }

    ChatReply {
        message: "I'm currently operating in offline mode. I can't process complex queries right now, but you \
                  can explore our tools or start a project form manually to get in touch."
            .into(),
        suggestions: vec![start_project(), explore_tools(), browse_work()],
        project_data: Map::new(),
    }
}

#[must_use]
pub fn audit_result() -> AuditResult {
    AuditResult {
        assessment: "We couldn't analyze your specific text just now, but manual data entry is generally the \
                     number one bottleneck for growing small businesses."
            .into(),
        recommended_actions: vec![
            "Map your current workflow steps manually".into(),
            "Identify where you use spreadsheets".into(),
            "Contact us for a full personalized audit".into(),
        ],
        impact_estimate: "Typical automation projects save 10-20 hours/week.".into(),
    }
}

#[must_use]
pub fn ideas() -> Vec<Idea> {
    vec![
        Idea {
            title: format!("{EXAMPLE_PREFIX}Client Portal"),
            pitch: "A centralized hub for client documents and status updates.".into(),
            tags: vec!["Portal".into(), "Self-service".into()],
        },
        Idea {
            title: format!("{EXAMPLE_PREFIX}Inventory Bot"),
            pitch: "Automated tracking for stock levels and reordering.".into(),
            tags: vec!["Automation".into(), "Inventory".into()],
        },
        Idea {
            title: format!("{EXAMPLE_PREFIX}Scheduling AI"),
            pitch: "Smart calendar management for field teams.".into(),
            tags: vec!["Scheduling".into(), "AI".into()],
        },
    ]
}

/// Refinement must be loss-free under failure: the input comes back as is.
#[must_use]
pub fn refined(text: &str) -> String {
    text.to_owned()
}

/// Assistant strategy that answers every call with the offline values.
#[derive(Clone, Copy, Debug, Default)]
pub struct FallbackAssistant;

#[async_trait::async_trait]
impl AssistantApi for FallbackAssistant {
    async fn chat(&self, message: &str, _history: &[ChatTurn]) -> NormalizedResult<ChatReply> {
        NormalizedResult::fallback(chat_reply(message))
    }

    async fn audit(&self, _free_text: &str) -> NormalizedResult<AuditResult> {
        NormalizedResult::fallback(audit_result())
    }

    async fn generate_ideas(&self, _prompt: &str) -> NormalizedResult<Vec<Idea>> {
        NormalizedResult::fallback(ideas())
    }

    async fn refine(&self, text: &str) -> NormalizedResult<String> {
        NormalizedResult::fallback(refined(text))
    }
}
