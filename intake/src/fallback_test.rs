use super::*;
use crate::ai::Complete;

// =============================================================================
// chat_reply
// =============================================================================

#[test]
fn price_question_carries_estimated_range() {
    let reply = chat_reply("what's the price?");
    assert!(!reply.message.trim().is_empty());
    assert_eq!(reply.project_data.get("estimatedRange"), Some(&json!(ESTIMATED_RANGE)));
    assert!(reply.suggestions.iter().any(|s| s.action == Some(SuggestionAction::StartProject)));
}

#[test]
fn plural_and_phrase_forms_match() {
    assert!(chat_reply("What are your costs").project_data.contains_key("estimatedRange"));
    assert!(chat_reply("How much would an app be").project_data.contains_key("estimatedRange"));
    assert!(chat_reply("how long does it take?").project_data.contains_key("estimatedTimeline"));
}

#[test]
fn short_keywords_do_not_match_inside_words() {
    // "ai" inside "email" and "wait" must not route to the AI reply.
    let reply = chat_reply("I'll email you, please wait");
    assert_eq!(reply, chat_reply("something unrelated"));
    assert_ne!(reply, chat_reply("ideas?"));
}

#[test]
fn keywords_do_not_match_as_word_prefixes() {
    assert!(!chat_reply("Planning a costume party site").project_data.contains_key("estimatedRange"));
    assert!(!chat_reply("We use launchpad for tickets").project_data.contains_key("estimatedTimeline"));
    assert!(chat_reply("When are you launching?").project_data.contains_key("estimatedTimeline"));
}

#[test]
fn ai_question_points_at_playground() {
    let reply = chat_reply("Can AI help my team?");
    assert!(reply.suggestions.iter().any(|s| s.action == Some(SuggestionAction::OpenPlayground)));
    assert!(reply.project_data.is_empty());
}

#[test]
fn chat_reply_is_deterministic() {
    assert_eq!(chat_reply("hello there"), chat_reply("hello there"));
}

#[test]
fn every_chat_branch_is_complete() {
    for prompt in ["price?", "timeline?", "ideas?", "hello", "anything else"] {
        let reply = chat_reply(prompt);
        assert!(reply.is_complete(), "incomplete reply for {prompt}");
        assert!(!reply.suggestions.is_empty());
    }
}

// =============================================================================
// FallbackAssistant
// =============================================================================

#[tokio::test]
async fn every_operation_returns_complete_fallback() {
    let assistant = FallbackAssistant;

    let chat = assistant.chat("hello", &[]).await;
    assert!(chat.is_fallback && chat.is_well_formed());

    let audit = assistant.audit("we copy invoices by hand").await;
    assert!(audit.is_fallback && audit.is_well_formed());

    let ideas = assistant.generate_ideas("retail").await;
    assert!(ideas.is_fallback && ideas.is_well_formed());
    assert!(ideas.data.unwrap().len() >= 3);

    let refined = assistant.refine("hello").await;
    assert!(refined.is_fallback && refined.is_well_formed());
}

#[tokio::test]
async fn refine_fallback_returns_input_unchanged() {
    let result = FallbackAssistant.refine("hello").await;
    assert_eq!(result.data.as_deref(), Some("hello"));

    let messy = "  keep   my\nspacing ";
    assert_eq!(FallbackAssistant.refine(messy).await.data.as_deref(), Some(messy));
}

#[test]
fn greeting_and_offline_replies_differ() {
    let greeting = chat_reply("Hi!");
    let offline = chat_reply("Tell me about your stack");
    assert!(greeting.message.starts_with("Hello"));
    assert!(offline.message.contains("offline mode"));
    assert!(offline.suggestions.iter().any(|s| s.action == Some(SuggestionAction::OpenPlayground)));
}

#[test]
fn fallback_ideas_are_labelled_examples() {
    let ideas = ideas();
    assert_eq!(ideas.len(), 3);
    assert!(ideas.iter().all(|i| i.title.starts_with(EXAMPLE_PREFIX)));
    assert!(ideas.is_complete());
}
