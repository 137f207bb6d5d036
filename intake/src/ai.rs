//! Assistant wire types and the never-failing assistant contract.
//!
//! DESIGN
//! ======
//! Every AI operation answers with a [`NormalizedResult`]. Transport and
//! parsing failures never reach the caller: implementations substitute a
//! complete fallback value and set `is_fallback`. The only `Error` status is
//! [`NormalizedResult::rejected`], reserved for blank caller input.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

#[cfg(test)]
#[path = "ai_test.rs"]
mod ai_test;

// =============================================================================
// ENVELOPE
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    Success,
    Error,
}

/// Uniform envelope returned by every assistant operation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedResult<T> {
    pub status: ResultStatus,
    pub data: Option<T>,
    pub is_fallback: bool,
}

impl<T> NormalizedResult<T> {
    #[must_use]
    pub fn success(data: T) -> Self {
        Self { status: ResultStatus::Success, data: Some(data), is_fallback: false }
    }

    /// A substituted value. Still a success from the caller's point of view.
    #[must_use]
    pub fn fallback(data: T) -> Self {
        Self { status: ResultStatus::Success, data: Some(data), is_fallback: true }
    }

    /// The caller passed unusable input (blank prompt).
    #[must_use]
    pub fn rejected() -> Self {
        Self { status: ResultStatus::Error, data: None, is_fallback: false }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == ResultStatus::Success
    }
}

impl<T: Complete> NormalizedResult<T> {
    /// Checks the envelope invariants: a success carries complete data.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        match self.status {
            ResultStatus::Success => self.data.as_ref().is_some_and(Complete::is_complete),
            ResultStatus::Error => self.data.is_none() && !self.is_fallback,
        }
    }
}

// =============================================================================
// SHAPE VALIDATION
// =============================================================================

/// Shape check shared by live responses and fallback values: no required
/// field may be blank.
pub trait Complete {
    fn is_complete(&self) -> bool;
}

fn filled(s: &str) -> bool {
    !s.trim().is_empty()
}

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn all_filled(items: &[String]) -> bool {
    !items.is_empty() && items.iter().all(|s| filled(s))
}

impl Complete for String {
    fn is_complete(&self) -> bool {
        filled(self)
    }
}

// =============================================================================
// CHAT
// =============================================================================

/// One prior turn sent along with a chat request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub text: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Model,
}

/// UI action a suggestion chip triggers when the backend tags it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionAction {
    StartProject,
    OpenPlayground,
    ViewWork,
    Contact,
}

impl SuggestionAction {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StartProject => "start_project",
            Self::OpenPlayground => "open_playground",
            Self::ViewWork => "view_work",
            Self::Contact => "contact",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "start_project" => Some(Self::StartProject),
            "open_playground" => Some(Self::OpenPlayground),
            "view_work" => Some(Self::ViewWork),
            "contact" => Some(Self::Contact),
            _ => None,
        }
    }
}

/// A follow-up chip under a model message.
///
/// On the wire it is either a bare string or `{label, action}`. An action
/// tag this build does not know degrades to a plain reply chip.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SuggestionRepr", into = "SuggestionRepr")]
pub struct Suggestion {
    pub label: String,
    pub action: Option<SuggestionAction>,
}

impl Suggestion {
    #[must_use]
    pub fn reply(label: impl Into<String>) -> Self {
        Self { label: label.into(), action: None }
    }

    #[must_use]
    pub fn action(label: impl Into<String>, action: SuggestionAction) -> Self {
        Self { label: label.into(), action: Some(action) }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum SuggestionRepr {
    Plain(String),
    Tagged {
        label: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        action: Option<String>,
    },
}

impl From<SuggestionRepr> for Suggestion {
    fn from(repr: SuggestionRepr) -> Self {
        match repr {
            SuggestionRepr::Plain(label) => Self { label, action: None },
            SuggestionRepr::Tagged { label, action } => {
                Self { label, action: action.as_deref().and_then(SuggestionAction::parse) }
            }
        }
    }
}

impl From<Suggestion> for SuggestionRepr {
    fn from(s: Suggestion) -> Self {
        match s.action {
            None => Self::Plain(s.label),
            Some(action) => Self::Tagged { label: s.label, action: Some(action.as_str().to_owned()) },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub message: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub suggestions: Vec<Suggestion>,
    /// Already-shaped partial intent record; may be empty.
    #[serde(default, deserialize_with = "null_as_default")]
    pub project_data: Map<String, Value>,
}

impl Complete for ChatReply {
    fn is_complete(&self) -> bool {
        filled(&self.message) && self.suggestions.iter().all(|s| filled(&s.label))
    }
}

// =============================================================================
// PLAYGROUND
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    pub assessment: String,
    pub recommended_actions: Vec<String>,
    pub impact_estimate: String,
}

impl Complete for AuditResult {
    fn is_complete(&self) -> bool {
        filled(&self.assessment) && all_filled(&self.recommended_actions) && filled(&self.impact_estimate)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Idea {
    pub title: String,
    pub pitch: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
}

impl Complete for Idea {
    fn is_complete(&self) -> bool {
        filled(&self.title) && filled(&self.pitch) && self.tags.iter().all(|t| filled(t))
    }
}

impl Complete for Vec<Idea> {
    fn is_complete(&self) -> bool {
        !self.is_empty() && self.iter().all(Complete::is_complete)
    }
}

// =============================================================================
// REQUESTS
// =============================================================================

pub const CHAT_PATH: &str = "/api/ai/chat";
pub const AUDIT_PATH: &str = "/api/ai/audit";
pub const IDEAS_PATH: &str = "/api/ai/ideas";
pub const REFINE_PATH: &str = "/api/ai/refine";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

/// Body for the audit and refine endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeasRequest {
    pub prompt: String,
}

// =============================================================================
// CONTRACT
// =============================================================================

/// The assistant operations. Implementations never fail; see module docs.
#[async_trait::async_trait]
pub trait AssistantApi: Send + Sync {
    async fn chat(&self, message: &str, history: &[ChatTurn]) -> NormalizedResult<ChatReply>;

    async fn audit(&self, free_text: &str) -> NormalizedResult<AuditResult>;

    async fn generate_ideas(&self, prompt: &str) -> NormalizedResult<Vec<Idea>>;

    async fn refine(&self, text: &str) -> NormalizedResult<String>;
}
