//! Chat session state machine
//!
//! Owns the live conversation: its ordered messages, lifecycle phase,
//! selected role and current error. All operations are total; failures are
//! captured as state instead of propagating.
//!
//! The send transition is split in two. `begin_send` moves the machine
//! into `AwaitingResponse` and yields the prompt to submit; a second send
//! attempted before `apply_response` lands is refused by the machine
//! itself, so at most one request is ever outstanding.

use crate::responder::{Responder, ResponderError};
use crate::storage::history::ChatHistoryRecord;
use crate::types::auth::AuthSession;
use crate::types::config::ResponderConfig;
use crate::types::message::{Message, MessageRole};
use crate::types::role::ExpertRole;

/// Error shown when the provider credential is missing at startup
const MISSING_CREDENTIAL_ERROR: &str =
    "AI provider API key is not configured. Chat is disabled for this session.";

/// Lifecycle phase of a chat session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No request outstanding
    Idle,
    /// Exactly one AI request outstanding
    AwaitingResponse,
    /// Unrecoverable configuration error; never left within a session
    Blocked,
}

/// Current session error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Fatal for the session lifetime; not user-clearable
    Configuration(String),
    /// A single send failed; the user may clear it and resend
    Request(String),
}

impl SessionError {
    pub fn message(&self) -> &str {
        match self {
            SessionError::Configuration(msg) | SessionError::Request(msg) => msg,
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, SessionError::Configuration(_))
    }
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// The in-memory conversation and its state machine
#[derive(Debug)]
pub struct ChatSession {
    messages: Vec<Message>,
    phase: SessionPhase,
    role: ExpertRole,
    error: Option<SessionError>,
}

impl ChatSession {
    /// New idle session with the given role
    pub fn new(role: ExpertRole) -> Self {
        Self {
            messages: Vec::new(),
            phase: SessionPhase::Idle,
            role,
            error: None,
        }
    }

    /// Session built from configuration
    ///
    /// A configuration without a credential yields a blocked session whose
    /// error banner persists for the whole session.
    pub fn with_config(config: &ResponderConfig, role: ExpertRole) -> Self {
        if config.has_credential() {
            Self::new(role)
        } else {
            Self::blocked(role)
        }
    }

    fn blocked(role: ExpertRole) -> Self {
        tracing::error!("starting blocked: {}", MISSING_CREDENTIAL_ERROR);
        Self {
            messages: Vec::new(),
            phase: SessionPhase::Blocked,
            role,
            error: Some(SessionError::Configuration(
                MISSING_CREDENTIAL_ERROR.to_string(),
            )),
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn role(&self) -> ExpertRole {
        self.role
    }

    pub fn error(&self) -> Option<&SessionError> {
        self.error.as_ref()
    }

    /// True while a request is outstanding
    pub fn is_loading(&self) -> bool {
        self.phase == SessionPhase::AwaitingResponse
    }

    /// Attempt to start a send
    ///
    /// Accepted only in `Idle` with non-blank text. On acceptance the user
    /// message is appended, any previous request error is dropped, the
    /// machine enters `AwaitingResponse` and the prompt to submit is
    /// returned. Everything else is a no-op returning `None`.
    pub fn begin_send(&mut self, text: &str) -> Option<String> {
        if self.phase != SessionPhase::Idle {
            tracing::debug!("send refused in phase {:?}", self.phase);
            return None;
        }
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }

        self.error = None;
        self.messages.push(Message::new(MessageRole::User, trimmed));
        self.phase = SessionPhase::AwaitingResponse;
        Some(trimmed.to_string())
    }

    /// Apply the outcome of the outstanding request
    ///
    /// No-op unless a request is outstanding. Success appends the assistant
    /// message; failure becomes the current error. Either way the machine
    /// returns to `Idle` so the user can immediately send again.
    pub fn apply_response(&mut self, result: Result<String, ResponderError>) {
        if self.phase != SessionPhase::AwaitingResponse {
            tracing::debug!("response dropped in phase {:?}", self.phase);
            return;
        }

        match result {
            Ok(text) => {
                self.messages.push(Message::new(MessageRole::Assistant, text));
            }
            Err(e) => {
                tracing::warn!("AI request failed: {e}");
                self.error = Some(SessionError::Request(e.to_string()));
            }
        }
        self.phase = SessionPhase::Idle;
    }

    /// Send a message through the given responder
    ///
    /// Composes `begin_send` and `apply_response` around the async call.
    pub async fn send_message(&mut self, responder: &dyn Responder, text: &str) {
        let Some(prompt) = self.begin_send(text) else {
            return;
        };
        let result = responder.generate(&prompt, self.role).await;
        self.apply_response(result);
    }

    /// Switch the selected role
    ///
    /// Ignored while blocked, and ignored for roles gated behind
    /// authentication when the session is a guest. Existing messages are
    /// kept.
    pub fn change_role(&mut self, role: ExpertRole, auth: &AuthSession) {
        if self.phase == SessionPhase::Blocked {
            return;
        }
        if role.requires_auth() && !auth.is_authenticated() {
            tracing::debug!("role {} requires authentication, ignoring", role.as_str());
            return;
        }
        self.role = role;
    }

    /// Replace the conversation with a previously saved one
    pub fn load_conversation(&mut self, record: &ChatHistoryRecord) {
        if self.phase == SessionPhase::Blocked {
            return;
        }
        self.messages = record.messages.clone();
        self.role = record.role;
        self.error = None;
        self.phase = SessionPhase::Idle;
    }

    /// Clear the conversation, keeping the current role
    pub fn start_new_conversation(&mut self) {
        if self.phase == SessionPhase::Blocked {
            return;
        }
        self.messages.clear();
        self.error = None;
        self.phase = SessionPhase::Idle;
    }

    /// Clear the current error
    ///
    /// Configuration errors are fatal and stay; a blocked session keeps its
    /// banner for its whole lifetime.
    pub fn clear_error(&mut self) {
        if self.phase == SessionPhase::Blocked {
            return;
        }
        self.error = None;
    }
}
