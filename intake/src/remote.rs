//! HTTP adapter for the assistant endpoints served by `server`.
//!
//! The server already normalizes model output, but the network between the
//! page and the server can fail too. Every failure on this side (connect,
//! timeout, non-2xx, undecodable body, an envelope that breaks the fallback
//! invariant) is replaced with the local fallback value, so callers see the
//! same never-failing contract as with [`FallbackAssistant`].

use std::time::{Duration, Instant};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::ai::{
    AUDIT_PATH, AssistantApi, AuditResult, CHAT_PATH, ChatReply, ChatRequest, ChatTurn, Complete, IDEAS_PATH, Idea,
    IdeasRequest, NormalizedResult, REFINE_PATH, ResultStatus, TextRequest,
};
use crate::fallback::{self, FallbackAssistant};

#[cfg(test)]
#[path = "remote_test.rs"]
mod remote_test;

/// Slightly above the server's own model timeout, so a server-side fallback
/// still arrives before the client gives up.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("request timed out")]
    Timeout,

    #[error("unexpected status {status}")]
    Status { status: u16 },

    #[error("response parse failed: {0}")]
    Parse(String),

    #[error("response envelope is malformed")]
    Malformed,
}

impl RemoteError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
            Self::Request(_) => "E_REMOTE_REQUEST",
            Self::Timeout => "E_REMOTE_TIMEOUT",
            Self::Status { .. } => "E_REMOTE_STATUS",
            Self::Parse(_) => "E_REMOTE_PARSE",
            Self::Malformed => "E_REMOTE_MALFORMED",
        }
    }

    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Timeout | Self::Status { status: 429 | 500..=599 })
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() { Self::Timeout } else { Self::Request(e.to_string()) }
    }
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct RemoteAssistant {
    http: reqwest::Client,
    base_url: String,
}

impl RemoteAssistant {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>) -> Result<Self, RemoteError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .build()
            .map_err(|e| RemoteError::HttpClientBuild(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Ok(Self { http, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<NormalizedResult<T>, RemoteError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned + Complete,
    {
        let response = self.http.post(format!("{}{path}", self.base_url)).json(body).send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        decode_envelope(status, &text)
    }
}

/// Decode a response body into an envelope the caller may trust.
///
/// A `400` carrying a `rejected()` envelope is passed through: the server
/// refused blank input, which is not a transport failure.
///
/// # Errors
///
/// Returns an error for any other non-2xx status, an undecodable body, or an
/// envelope that is not well formed.
pub fn decode_envelope<T>(status: u16, body: &str) -> Result<NormalizedResult<T>, RemoteError>
where
    T: DeserializeOwned + Complete,
{
    let success = (200..300).contains(&status);
    if !success && status != 400 {
        return Err(RemoteError::Status { status });
    }
    let envelope: NormalizedResult<T> = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(_) if !success => return Err(RemoteError::Status { status }),
        Err(e) => return Err(RemoteError::Parse(e.to_string())),
    };
    if !success && envelope.status != ResultStatus::Error {
        return Err(RemoteError::Status { status });
    }
    if !envelope.is_well_formed() {
        return Err(RemoteError::Malformed);
    }
    Ok(envelope)
}

/// Swap a failed remote call for the local fallback value.
fn settle<T>(
    operation: &'static str,
    started: Instant,
    result: Result<NormalizedResult<T>, RemoteError>,
    fallback: impl FnOnce() -> T,
) -> NormalizedResult<T> {
    let elapsed_ms = started.elapsed().as_millis();
    match result {
        Ok(envelope) => {
            debug!(operation, elapsed_ms, is_fallback = envelope.is_fallback, "remote: response");
            envelope
        }
        Err(e) => {
            warn!(operation, elapsed_ms, code = e.error_code(), error = %e, "remote: substituting fallback");
            NormalizedResult::fallback(fallback())
        }
    }
}

#[async_trait::async_trait]
impl AssistantApi for RemoteAssistant {
    async fn chat(&self, message: &str, history: &[ChatTurn]) -> NormalizedResult<ChatReply> {
        let started = Instant::now();
        let body = ChatRequest { message: message.to_owned(), history: history.to_vec() };
        let result = self.post(CHAT_PATH, &body).await;
        settle("chat", started, result, || fallback::chat_reply(message))
    }

    async fn audit(&self, free_text: &str) -> NormalizedResult<AuditResult> {
        let started = Instant::now();
        let result = self.post(AUDIT_PATH, &TextRequest { text: free_text.to_owned() }).await;
        settle("audit", started, result, fallback::audit_result)
    }

    async fn generate_ideas(&self, prompt: &str) -> NormalizedResult<Vec<Idea>> {
        let started = Instant::now();
        let result = self.post(IDEAS_PATH, &IdeasRequest { prompt: prompt.to_owned() }).await;
        settle("ideas", started, result, fallback::ideas)
    }

    async fn refine(&self, text: &str) -> NormalizedResult<String> {
        let started = Instant::now();
        let result = self.post(REFINE_PATH, &TextRequest { text: text.to_owned() }).await;
        settle("refine", started, result, || fallback::refined(text))
    }
}

/// Pick the remote adapter when a base URL is configured, else the offline
/// one. A client that cannot be built also degrades to offline.
#[must_use]
pub fn assistant_for(base_url: Option<&str>) -> Box<dyn AssistantApi> {
    match base_url.map(str::trim).filter(|u| !u.is_empty()) {
        Some(url) => match RemoteAssistant::new(url) {
            Ok(remote) => Box::new(remote),
            Err(e) => {
                warn!(error = %e, "remote: client build failed; using offline assistant");
                Box::new(FallbackAssistant)
            }
        },
        None => Box::new(FallbackAssistant),
    }
}
