//! AI responder
//!
//! The session talks to the generative backend through the [`Responder`]
//! trait: one prompt plus the active expertise role in, generated text out.

pub mod remote;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::role::ExpertRole;

/// Errors from a responder
///
/// Sessions surface these uniformly through their display string, so the
/// request variant carries the full user-facing message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResponderError {
    #[error("{0}")]
    Request(String),
    #[error("provider returned no content")]
    EmptyResponse,
    #[error("API key is not configured")]
    MissingCredential,
}

/// A generative-AI backend
#[async_trait]
pub trait Responder: Send + Sync {
    /// Generate a reply to `prompt` scoped to `role`
    async fn generate(&self, prompt: &str, role: ExpertRole) -> Result<String, ResponderError>;
}
