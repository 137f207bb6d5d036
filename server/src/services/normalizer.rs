//! Response normalizer: the live [`AssistantApi`] strategy.
//!
//! DESIGN
//! ======
//! Each operation makes exactly one model call, bounded by the configured
//! timeout, with no retries. The completion is parsed leniently (code
//! fences and stray prose around the JSON are tolerated), deserialized into
//! the wire type and shape-checked with [`Complete`]. Any failure is logged
//! with its [`BackendFailure`] code and the deterministic fallback value for
//! that operation is returned instead, so callers never see an error.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use intake::ai::{AssistantApi, AuditResult, ChatReply, ChatTurn, Complete, Idea, NormalizedResult};
use intake::fallback;

use super::prompts;
use crate::error::ErrorCode;
use crate::llm::LlmChat;
use crate::llm::config::AiLimits;
use crate::llm::types::{LlmError, Message};

// =============================================================================
// ERROR
// =============================================================================

/// Why a live call was replaced with its fallback value.
#[derive(Debug, thiserror::Error)]
pub enum BackendFailure {
    #[error("LLM call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("LLM call exceeded {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("completion has no text")]
    Empty,

    #[error("completion is not the expected JSON: {0}")]
    Malformed(String),

    #[error("completion is missing required fields")]
    Incomplete,
}

impl ErrorCode for BackendFailure {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Llm(e) => e.error_code(),
            Self::Timeout(_) => "E_AI_TIMEOUT",
            Self::Empty => "E_AI_EMPTY",
            Self::Malformed(_) => "E_AI_MALFORMED",
            Self::Incomplete => "E_AI_INCOMPLETE",
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Llm(e) => e.retryable(),
            Self::Timeout(_) => true,
            Self::Empty | Self::Malformed(_) | Self::Incomplete => false,
        }
    }
}

// =============================================================================
// NORMALIZER
// =============================================================================

pub struct Normalizer {
    llm: Arc<dyn LlmChat>,
    timeout: Duration,
    max_tokens: u32,
}

impl Normalizer {
    #[must_use]
    pub fn new(llm: Arc<dyn LlmChat>, limits: AiLimits) -> Self {
        Self { llm, timeout: Duration::from_secs(limits.timeout_secs), max_tokens: limits.max_tokens }
    }

    /// Override the per-call bound.
    #[cfg(test)]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// One bounded model call returning the non-blank completion text.
    async fn complete(&self, operation: &'static str, system: &str, messages: &[Message]) -> Result<String, BackendFailure> {
        let call = self.llm.chat(self.max_tokens, system, messages);
        let response = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| BackendFailure::Timeout(self.timeout))??;

        info!(
            operation,
            stop_reason = %response.stop_reason,
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            "ai: LLM response"
        );

        let text = response.text();
        if text.trim().is_empty() {
            return Err(BackendFailure::Empty);
        }
        Ok(text)
    }

    async fn structured<T>(&self, operation: &'static str, system: &str, messages: &[Message]) -> Result<T, BackendFailure>
    where
        T: DeserializeOwned + Complete,
    {
        let text = self.complete(operation, system, messages).await?;
        let value: T = parse_lenient(&text)?;
        if !value.is_complete() {
            return Err(BackendFailure::Incomplete);
        }
        Ok(value)
    }
}

/// Log the outcome and swap a failure for the fallback value.
fn settle<T>(
    operation: &'static str,
    started: Instant,
    result: Result<T, BackendFailure>,
    fallback: impl FnOnce() -> T,
) -> NormalizedResult<T> {
    let elapsed_ms = started.elapsed().as_millis();
    match result {
        Ok(data) => {
            info!(operation, elapsed_ms, is_fallback = false, "ai: request complete");
            NormalizedResult::success(data)
        }
        Err(e) => {
            warn!(operation, elapsed_ms, code = e.error_code(), error = %e, "ai: substituting fallback");
            NormalizedResult::fallback(fallback())
        }
    }
}

/// Ideas arrive either as a bare array or wrapped in `{"ideas": [...]}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum IdeasPayload {
    List(Vec<Idea>),
    Wrapped { ideas: Vec<Idea> },
}

impl IdeasPayload {
    fn into_ideas(self) -> Vec<Idea> {
        match self {
            Self::List(ideas) | Self::Wrapped { ideas } => ideas,
        }
    }
}

#[async_trait::async_trait]
impl AssistantApi for Normalizer {
    async fn chat(&self, message: &str, history: &[ChatTurn]) -> NormalizedResult<ChatReply> {
        let started = Instant::now();
        info!(message_len = message.len(), history = history.len(), "ai: chat received");
        let messages = prompts::chat_messages(message, history);
        let result = self.structured("chat", prompts::CHAT_SYSTEM, &messages).await;
        settle("chat", started, result, || fallback::chat_reply(message))
    }

    async fn audit(&self, free_text: &str) -> NormalizedResult<AuditResult> {
        let started = Instant::now();
        let result = self.structured("audit", prompts::AUDIT_SYSTEM, &prompts::single(free_text)).await;
        settle("audit", started, result, fallback::audit_result)
    }

    async fn generate_ideas(&self, prompt: &str) -> NormalizedResult<Vec<Idea>> {
        let started = Instant::now();
        let result = async {
            let text = self.complete("ideas", prompts::IDEAS_SYSTEM, &prompts::single(prompt)).await?;
            let ideas = parse_lenient::<IdeasPayload>(&text)?.into_ideas();
            if ideas.is_complete() { Ok(ideas) } else { Err(BackendFailure::Incomplete) }
        }
        .await;
        settle("ideas", started, result, fallback::ideas)
    }

    async fn refine(&self, text: &str) -> NormalizedResult<String> {
        let started = Instant::now();
        let result = self
            .complete("refine", prompts::REFINE_SYSTEM, &prompts::single(text))
            .await
            .map(|refined| strip_fences(&refined).trim().to_owned())
            .and_then(|refined| if refined.is_empty() { Err(BackendFailure::Empty) } else { Ok(refined) });
        settle("refine", started, result, || fallback::refined(text))
    }
}

// =============================================================================
// LENIENT PARSING
// =============================================================================

/// Remove a surrounding Markdown code fence, if any.
pub(crate) fn strip_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening line.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Candidate JSON spans: first `{` to last `}` and first `[` to last `]`,
/// in order of where each starts.
pub(crate) fn json_spans(text: &str) -> Vec<&str> {
    let text = strip_fences(text);
    let mut spans: Vec<(usize, &str)> = [('{', '}'), ('[', ']')]
        .into_iter()
        .filter_map(|(open, close)| {
            let start = text.find(open)?;
            let end = text.rfind(close)?;
            (end > start).then(|| (start, &text[start..=end]))
        })
        .collect();
    spans.sort_by_key(|&(start, _)| start);
    spans.into_iter().map(|(_, span)| span).collect()
}

/// Deserialize the first span that fits `T`.
fn parse_lenient<T: DeserializeOwned>(text: &str) -> Result<T, BackendFailure> {
    let mut last_error = BackendFailure::Malformed("no JSON value found".into());
    for span in json_spans(text) {
        match serde_json::from_str(span) {
            Ok(value) => return Ok(value),
            Err(e) => last_error = BackendFailure::Malformed(e.to_string()),
        }
    }
    Err(last_error)
}

#[cfg(test)]
#[path = "normalizer_test.rs"]
mod tests;
