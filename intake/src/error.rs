//! Session-level errors.

use crate::form::FormError;
use crate::session::Surface;

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("{surface} input is empty")]
    EmptyInput { surface: Surface },
    #[error("{surface} is still waiting for a response")]
    Busy { surface: Surface },
    #[error("no idea at index {0}")]
    UnknownIdea(usize),
    #[error(transparent)]
    Validation(#[from] FormError),
}

impl IntakeError {
    /// Grepable code for logs and the view's error slot.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyInput { .. } => "E_EMPTY_INPUT",
            Self::Busy { .. } => "E_SURFACE_BUSY",
            Self::UnknownIdea(_) => "E_UNKNOWN_IDEA",
            Self::Validation(err) => err.error_code(),
        }
    }

    /// Whether the same action can succeed later without the user changing
    /// anything.
    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Busy { .. })
    }
}
