//! Domain services behind the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own the model-facing logic so route handlers can stay
//! focused on protocol translation and request guarding.

pub mod normalizer;
pub mod prompts;
