//! Conversation auto-save policy
//!
//! Evaluated after every session update. A snapshot is written once the
//! conversation has a complete exchange and the user is authenticated;
//! later snapshots of the same conversation overwrite the same record.
//! Store failures are background noise: logged, never surfaced.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::session::ChatSession;
use crate::storage::history::{ChatHistoryRecord, HistoryStore};
use crate::types::auth::AuthSession;
use crate::types::message::{Message, MessageRole};
use crate::types::role::ExpertRole;

const TITLE_MAX_CHARS: usize = 48;

/// Decides when the live conversation is written to the history store
#[derive(Debug, Default)]
pub struct AutoSaver {
    record_id: Option<Uuid>,
    created_at: Option<DateTime<Utc>>,
    last_saved: Option<(usize, ExpertRole)>,
}

impl AutoSaver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifier of the record this conversation saves under, once established
    pub fn conversation_id(&self) -> Option<Uuid> {
        self.record_id
    }

    /// Track a conversation loaded from the store
    ///
    /// Further saves update the loaded record instead of creating a new one.
    pub fn adopt(&mut self, record: &ChatHistoryRecord) {
        self.record_id = Some(record.id);
        self.created_at = Some(record.created_at);
        self.last_saved = Some((record.messages.len(), record.role));
    }

    /// Forget the active conversation; the next qualifying snapshot creates
    /// a fresh record
    pub fn reset(&mut self) {
        self.record_id = None;
        self.created_at = None;
        self.last_saved = None;
    }

    fn qualifies(session: &ChatSession, auth: &AuthSession) -> bool {
        let messages = session.messages();
        auth.is_authenticated()
            && messages.len() >= 2
            && messages.iter().any(|m| m.role == MessageRole::User)
            && messages.iter().any(|m| m.role == MessageRole::Assistant)
    }

    /// Whether the current snapshot should be written
    ///
    /// Messages are append-only within a live conversation, so message
    /// count plus role identifies a snapshot without hashing.
    pub fn should_save(&self, session: &ChatSession, auth: &AuthSession) -> bool {
        Self::qualifies(session, auth)
            && self.last_saved != Some((session.messages().len(), session.role()))
    }

    /// Save the current snapshot if the policy says so
    ///
    /// Never fails: a store error is logged and the snapshot stays marked
    /// unsaved, so a later evaluation retries.
    pub async fn maybe_save(
        &mut self,
        session: &ChatSession,
        auth: &AuthSession,
        store: &dyn HistoryStore,
    ) {
        if !self.should_save(session, auth) {
            return;
        }
        let Some(identity) = auth.identity() else {
            return;
        };

        let now = Utc::now();
        let id = *self.record_id.get_or_insert_with(Uuid::new_v4);
        let created_at = *self.created_at.get_or_insert(now);
        let record = ChatHistoryRecord {
            id,
            owner: identity.email.clone(),
            title: derive_title(session.messages()),
            role: session.role(),
            messages: session.messages().to_vec(),
            created_at,
            updated_at: now,
        };

        match store.save(&record).await {
            Ok(()) => {
                self.last_saved = Some((record.messages.len(), record.role));
            }
            Err(e) => {
                tracing::warn!("conversation auto-save failed: {e}");
            }
        }
    }
}

/// Short listing title from the first user message
fn derive_title(messages: &[Message]) -> String {
    let Some(first) = messages.iter().find(|m| m.role == MessageRole::User) else {
        return "New conversation".to_string();
    };
    let mut title: String = first.content.chars().take(TITLE_MAX_CHARS).collect();
    if first.content.chars().count() > TITLE_MAX_CHARS {
        title.push('…');
    }
    title
}
