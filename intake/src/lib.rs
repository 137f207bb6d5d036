//! Client-side intake core for the studio site.
//!
//! This crate owns the state shared by the chat assistant, the project-intake
//! form and the AI playground, plus the wire types exchanged with the `server`
//! AI endpoints. It has no view code: a view layer binds its signals to a
//! [`session::Session`] and calls the named operations on it.
//!
//! DESIGN
//! ======
//! - [`session`] is the single writer: every view action goes through it.
//! - [`intent`] holds the accumulated project profile and enforces
//!   fill-forward merges.
//! - [`bridge`] turns chat `projectData` and selected ideas into merges.
//! - [`form`] hydrates the intake form from the profile and validates steps.
//! - [`overlay`] keeps at most one full-screen surface visible.
//! - [`ai`], [`fallback`] and [`remote`] define the never-failing assistant
//!   contract and its offline and HTTP implementations.
//! - [`chat`] is the append-only conversation log.
//! - [`prefs`] persists theme and accent across reloads.

pub mod ai;
pub mod bridge;
pub mod chat;
pub mod error;
pub mod fallback;
pub mod form;
pub mod intent;
pub mod overlay;
pub mod prefs;
pub mod remote;
pub mod session;

pub use ai::{AssistantApi, NormalizedResult};
pub use error::IntakeError;
pub use intent::{IntentPatch, IntentRecord, IntentStore};
pub use session::Session;

/// Current time as milliseconds since Unix epoch.
#[must_use]
pub fn now_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
