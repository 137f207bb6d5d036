//! Error codes shared by every layer that reports failures to a client.
//!
//! Each error enum implements [`ErrorCode`] so handlers can turn it into a
//! uniform JSON body without matching on variants.

use serde::Serialize;

pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

/// JSON error body returned by non-AI endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    pub retryable: bool,
}

impl ErrorBody {
    pub fn from_error(err: &(impl ErrorCode + ?Sized)) -> Self {
        Self { code: err.error_code(), message: err.to_string(), retryable: err.retryable() }
    }
}

impl ErrorCode for intake::form::FormError {
    fn error_code(&self) -> &'static str {
        intake::form::FormError::error_code(self)
    }
}
