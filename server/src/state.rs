//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the single assistant strategy chosen at startup (live
//! normalizer or offline fallback) and the rate limiter guarding it.

use std::sync::Arc;

use intake::ai::AssistantApi;
use intake::fallback::FallbackAssistant;

use crate::llm::config::AiLimits;
use crate::llm::{LlmChat, LlmClient};
use crate::rate_limit::RateLimiter;
use crate::services::normalizer::Normalizer;

/// Which strategy answers the assistant endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssistantMode {
    Live,
    Offline,
}

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub assistant: Arc<dyn AssistantApi>,
    pub mode: AssistantMode,
    /// Configured model name; `None` in offline mode.
    pub model: Option<String>,
    /// In-memory rate limiter for assistant requests.
    pub rate_limiter: RateLimiter,
}

impl AppState {
    /// Live mode over a configured provider client.
    #[must_use]
    pub fn live(llm: LlmClient, limits: AiLimits) -> Self {
        let model = llm.model().to_owned();
        let mut state = Self::with_llm(Arc::new(llm), limits);
        state.model = Some(model);
        state
    }

    /// Live mode over any chat implementation.
    #[must_use]
    pub fn with_llm(llm: Arc<dyn LlmChat>, limits: AiLimits) -> Self {
        Self {
            assistant: Arc::new(Normalizer::new(llm, limits)),
            mode: AssistantMode::Live,
            model: None,
            rate_limiter: RateLimiter::new(),
        }
    }

    /// Offline mode: every assistant call answers with the fallback values.
    #[must_use]
    pub fn offline() -> Self {
        Self {
            assistant: Arc::new(FallbackAssistant),
            mode: AssistantMode::Offline,
            model: None,
            rate_limiter: RateLimiter::new(),
        }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
