//! System prompts and message assembly for the assistant endpoints.
//!
//! Structured operations ask for a single JSON value and nothing else; the
//! normalizer still tolerates code fences and surrounding prose.

use intake::ai::{ChatTurn, TurnRole};

use crate::llm::types::Message;

/// Prior turns replayed to the model. Older turns are dropped.
pub const MAX_HISTORY_TURNS: usize = 20;

pub const CHAT_SYSTEM: &str = "\
You are the project assistant for a small software and automation studio. \
Help visitors describe what they want to build, answer questions about pricing, \
timelines and process, and steer serious visitors toward the project form.

Reply with ONE JSON object and nothing else:
{
  \"message\": string,            // your reply, at most 120 words, plain text or light markdown
  \"suggestions\": [ ... ],       // 2-3 short follow-ups the visitor can tap
  \"projectData\": { ... }        // facts the visitor stated, or {} if none
}

A suggestion is either a plain string (sent back as the visitor's next message) \
or {\"label\": string, \"action\": one of \"start_project\", \"open_playground\", \
\"view_work\", \"contact\"} to open a part of the site.

projectData may only contain these groups, each optional, with only the fields \
the visitor actually stated:
  companyInfo { name, industry, size, description }
  goals { primary, secondary: [string] }
  scope { features: [string], platforms: [string] }
  timeline { expectedStart, deadline }
  contact { name, email, phone }
You may also add estimatedRange or estimatedTimeline as strings when you quote one. \
Never invent facts the visitor did not give.";

pub const AUDIT_SYSTEM: &str = "\
You are an operations analyst for a software and automation studio. The visitor \
describes a business process in their own words. Assess where time is lost and \
what automation could change.

Reply with ONE JSON object and nothing else:
{
  \"assessment\": string,              // two or three sentences
  \"recommendedActions\": [string],    // three concrete next steps
  \"impactEstimate\": string           // one sentence with a rough, hedged estimate
}";

pub const IDEAS_SYSTEM: &str = "\
You are a product strategist for a software and automation studio. The visitor \
names an industry or a problem. Propose three distinct software products the \
studio could build for them.

Reply with ONE JSON array and nothing else:
[
  { \"title\": string, \"pitch\": string, \"tags\": [string] }
]
Titles are at most five words. Pitches are one sentence. Two or three tags each.";

pub const REFINE_SYSTEM: &str = "\
You are an editor. Rewrite the visitor's text so it is clear, specific and \
professional while keeping their meaning and every fact they gave. Do not add \
claims. Reply with the rewritten text only: no preamble, no quotes, no markdown.";

/// Wrap visitor text so instructions inside it read as data.
#[must_use]
pub fn user_input(text: &str) -> String {
    format!("<user_input>{text}</user_input>")
}

/// History plus the new message, in provider-neutral form.
///
/// Conversations must open with a user turn, so leading assistant turns
/// (the greeting) are skipped.
#[must_use]
pub fn chat_messages(message: &str, history: &[ChatTurn]) -> Vec<Message> {
    let start = history.len().saturating_sub(MAX_HISTORY_TURNS);
    let mut messages: Vec<Message> = history[start..]
        .iter()
        .skip_while(|turn| turn.role == TurnRole::Model)
        .filter(|turn| !turn.text.trim().is_empty())
        .map(|turn| match turn.role {
            TurnRole::User => Message::user(user_input(&turn.text)),
            TurnRole::Model => Message::assistant(turn.text.clone()),
        })
        .collect();
    messages.push(Message::user(user_input(message)));
    messages
}

/// Single-turn request for the playground operations.
#[must_use]
pub fn single(text: &str) -> Vec<Message> {
    vec![Message::user(user_input(text))]
}

#[cfg(test)]
#[path = "prompts_test.rs"]
mod tests;
