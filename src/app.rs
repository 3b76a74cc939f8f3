//! Top-level shell controller
//!
//! Binds authentication state, the chat session and the auto-save policy
//! behind three mutually exclusive view modes. UI presentation flags live
//! with the UI; only the mode and the logout confirmation flow are state
//! here.

use uuid::Uuid;

use crate::responder::Responder;
use crate::session::{ChatSession, SessionPhase};
use crate::storage::autosave::AutoSaver;
use crate::storage::history::{ChatHistoryRecord, HistoryStore};
use crate::types::auth::{AuthSession, UserIdentity};
use crate::types::config::ResponderConfig;
use crate::types::role::ExpertRole;

const DEFAULT_ROLE: ExpertRole = ExpertRole::Operations;

/// Which top-level view is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellMode {
    /// Initial choice between logging in and continuing as guest
    LoginPrompt,
    /// Login/signup flow in progress
    AuthFlow,
    /// The chat itself
    ChatSession,
}

/// Application shell binding auth, session and persistence policy
pub struct Shell {
    mode: ShellMode,
    auth: AuthSession,
    session: ChatSession,
    autosaver: AutoSaver,
    logout_armed: bool,
}

impl Shell {
    /// Fresh shell in guest mode, starting at the login prompt
    pub fn new(config: &ResponderConfig) -> Self {
        tracing::info!("shell initialized");
        Self {
            mode: ShellMode::LoginPrompt,
            auth: AuthSession::guest(),
            session: ChatSession::with_config(config, DEFAULT_ROLE),
            autosaver: AutoSaver::new(),
            logout_armed: false,
        }
    }

    /// Shell for an already-authenticated user, starting in the chat
    pub fn with_identity(config: &ResponderConfig, identity: UserIdentity) -> Self {
        tracing::info!("shell initialized for {}", identity.email);
        Self {
            mode: ShellMode::ChatSession,
            auth: AuthSession::authenticated(identity),
            session: ChatSession::with_config(config, DEFAULT_ROLE),
            autosaver: AutoSaver::new(),
            logout_armed: false,
        }
    }

    pub fn mode(&self) -> ShellMode {
        self.mode
    }

    pub fn auth(&self) -> &AuthSession {
        &self.auth
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    /// Identifier of the conversation's history record, once one exists
    pub fn conversation_id(&self) -> Option<Uuid> {
        self.autosaver.conversation_id()
    }

    pub fn logout_armed(&self) -> bool {
        self.logout_armed
    }

    // ------------------------------------------------------------------
    // Mode transitions
    // ------------------------------------------------------------------

    /// User chose to log in
    pub fn choose_login(&mut self) {
        if self.mode == ShellMode::LoginPrompt {
            self.mode = ShellMode::AuthFlow;
        }
    }

    /// User chose to continue without an account
    pub fn continue_as_guest(&mut self) {
        if self.mode == ShellMode::LoginPrompt {
            self.mode = ShellMode::ChatSession;
        }
    }

    /// Auth flow finished with a signed-in user
    pub fn complete_auth(&mut self, identity: UserIdentity) {
        if self.mode != ShellMode::AuthFlow {
            return;
        }
        tracing::info!("authenticated as {}", identity.email);
        self.auth = AuthSession::authenticated(identity);
        self.mode = ShellMode::ChatSession;
    }

    /// Auth flow skipped; continue as guest
    pub fn skip_auth(&mut self) {
        if self.mode == ShellMode::AuthFlow {
            self.mode = ShellMode::ChatSession;
        }
    }

    // ------------------------------------------------------------------
    // Logout (armed/confirm)
    // ------------------------------------------------------------------

    /// Arm the logout confirmation
    pub fn request_logout(&mut self) {
        if self.mode == ShellMode::ChatSession {
            self.logout_armed = true;
        }
    }

    /// Disarm without logging out
    pub fn cancel_logout(&mut self) {
        self.logout_armed = false;
    }

    /// Execute the logout previously armed with [`Shell::request_logout`]
    ///
    /// Destroys the auth session, clears the conversation and its record
    /// id, and returns to the login prompt.
    pub fn confirm_logout(&mut self) {
        if !self.logout_armed {
            return;
        }
        self.logout_armed = false;
        self.auth.logout();
        self.session.start_new_conversation();
        self.autosaver.reset();
        self.mode = ShellMode::LoginPrompt;
    }

    // ------------------------------------------------------------------
    // Chat actions
    // ------------------------------------------------------------------

    /// Send a message and evaluate the auto-save policy afterwards
    pub async fn send_message(
        &mut self,
        responder: &dyn Responder,
        store: &dyn HistoryStore,
        text: &str,
    ) {
        if self.mode != ShellMode::ChatSession {
            return;
        }
        self.session.send_message(responder, text).await;
        self.autosaver
            .maybe_save(&self.session, &self.auth, store)
            .await;
    }

    /// Switch the expertise role and evaluate the auto-save policy afterwards
    ///
    /// A role change on a conversation that already has a complete exchange
    /// is a new snapshot, so it re-saves under the same record.
    pub async fn change_role(&mut self, role: ExpertRole, store: &dyn HistoryStore) {
        self.session.change_role(role, &self.auth);
        self.autosaver
            .maybe_save(&self.session, &self.auth, store)
            .await;
    }

    pub fn clear_error(&mut self) {
        self.session.clear_error();
    }

    /// Drop the current conversation and start an empty one
    pub fn start_new_conversation(&mut self) {
        self.session.start_new_conversation();
        self.autosaver.reset();
    }

    /// Switch to a previously saved conversation
    pub fn load_conversation(&mut self, record: &ChatHistoryRecord) {
        if self.session.phase() == SessionPhase::Blocked {
            return;
        }
        self.session.load_conversation(record);
        self.autosaver.adopt(record);
    }

    /// Saved conversations for the signed-in user, newest first
    ///
    /// Guests have no history; store failures degrade to an empty list.
    pub async fn history(&self, store: &dyn HistoryStore) -> Vec<ChatHistoryRecord> {
        let Some(identity) = self.auth.identity() else {
            return Vec::new();
        };
        match store.load_all(&identity.email).await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("failed to load history: {e}");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::responder::ResponderError;
    use crate::storage::history::MemoryHistoryStore;
    use crate::types::message::MessageRole;
    use async_trait::async_trait;

    struct CannedResponder(&'static str);

    #[async_trait]
    impl Responder for CannedResponder {
        async fn generate(&self, _: &str, _: ExpertRole) -> Result<String, ResponderError> {
            Ok(self.0.to_string())
        }
    }

    fn configured() -> ResponderConfig {
        ResponderConfig::with_key("sk-test")
    }

    fn asha() -> UserIdentity {
        UserIdentity::new("Asha", "asha@example.com")
    }

    #[test]
    fn test_starts_at_login_prompt() {
        let shell = Shell::new(&configured());
        assert_eq!(shell.mode(), ShellMode::LoginPrompt);
        assert!(!shell.auth().is_authenticated());
    }

    #[test]
    fn test_authenticated_start_skips_login() {
        let shell = Shell::with_identity(&configured(), asha());
        assert_eq!(shell.mode(), ShellMode::ChatSession);
        assert!(shell.auth().is_authenticated());
    }

    #[test]
    fn test_login_flow_reaches_chat() {
        let mut shell = Shell::new(&configured());
        shell.choose_login();
        assert_eq!(shell.mode(), ShellMode::AuthFlow);

        shell.complete_auth(asha());
        assert_eq!(shell.mode(), ShellMode::ChatSession);
        assert!(shell.auth().is_authenticated());
    }

    #[test]
    fn test_skip_auth_lands_in_guest_chat() {
        let mut shell = Shell::new(&configured());
        shell.choose_login();
        shell.skip_auth();
        assert_eq!(shell.mode(), ShellMode::ChatSession);
        assert!(!shell.auth().is_authenticated());
    }

    #[test]
    fn test_guest_choice_goes_straight_to_chat() {
        let mut shell = Shell::new(&configured());
        shell.continue_as_guest();
        assert_eq!(shell.mode(), ShellMode::ChatSession);
    }

    #[test]
    fn test_complete_auth_ignored_outside_auth_flow() {
        let mut shell = Shell::new(&configured());
        shell.complete_auth(asha());
        assert_eq!(shell.mode(), ShellMode::LoginPrompt);
        assert!(!shell.auth().is_authenticated());
    }

    #[tokio::test]
    async fn test_authenticated_round_trip_persists() {
        let mut shell = Shell::with_identity(&configured(), asha());
        let responder = CannedResponder("Clinker is...");
        let store = MemoryHistoryStore::new();

        shell
            .send_message(&responder, &store, "What is clinker?")
            .await;

        let messages = shell.session().messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[0].content, "What is clinker?");
        assert_eq!(messages[1].role, MessageRole::Assistant);
        assert_eq!(messages[1].content, "Clinker is...");
        assert_eq!(shell.session().phase(), SessionPhase::Idle);

        let records = shell.history(&store).await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].role, ExpertRole::Operations);
        assert_eq!(shell.conversation_id(), Some(records[0].id));
    }

    #[tokio::test]
    async fn test_guest_round_trip_never_persists() {
        let mut shell = Shell::new(&configured());
        shell.continue_as_guest();
        let responder = CannedResponder("Clinker is...");
        let store = MemoryHistoryStore::new();

        shell
            .send_message(&responder, &store, "What is clinker?")
            .await;

        assert_eq!(shell.session().messages().len(), 2);
        assert!(store.is_empty());
        assert!(shell.history(&store).await.is_empty());
    }

    #[tokio::test]
    async fn test_confirmed_logout_resets_everything() {
        let mut shell = Shell::with_identity(&configured(), asha());
        let responder = CannedResponder("Clinker is...");
        let store = MemoryHistoryStore::new();

        shell
            .send_message(&responder, &store, "What is clinker?")
            .await;
        assert!(shell.conversation_id().is_some());

        shell.request_logout();
        assert!(shell.logout_armed());
        shell.confirm_logout();

        assert_eq!(shell.mode(), ShellMode::LoginPrompt);
        assert!(!shell.auth().is_authenticated());
        assert!(shell.session().messages().is_empty());
        assert!(shell.conversation_id().is_none());
        assert!(!shell.logout_armed());
    }

    #[test]
    fn test_unarmed_logout_does_nothing() {
        let mut shell = Shell::with_identity(&configured(), asha());
        shell.confirm_logout();
        assert_eq!(shell.mode(), ShellMode::ChatSession);
        assert!(shell.auth().is_authenticated());
    }

    #[test]
    fn test_cancel_disarms_logout() {
        let mut shell = Shell::with_identity(&configured(), asha());
        shell.request_logout();
        shell.cancel_logout();
        shell.confirm_logout();
        assert_eq!(shell.mode(), ShellMode::ChatSession);
    }

    #[tokio::test]
    async fn test_load_then_continue_updates_same_record() {
        let mut shell = Shell::with_identity(&configured(), asha());
        let responder = CannedResponder("Clinker is...");
        let store = MemoryHistoryStore::new();

        shell
            .send_message(&responder, &store, "What is clinker?")
            .await;
        let saved = shell.history(&store).await.into_iter().next().unwrap();

        shell.start_new_conversation();
        assert!(shell.conversation_id().is_none());

        shell.load_conversation(&saved);
        assert_eq!(shell.conversation_id(), Some(saved.id));
        assert_eq!(shell.session().messages().len(), 2);

        shell.send_message(&responder, &store, "And cement?").await;
        let records = shell.history(&store).await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].messages.len(), 4);
    }

    #[tokio::test]
    async fn test_role_change_respects_auth_gate() {
        let mut shell = Shell::new(&configured());
        shell.continue_as_guest();
        let store = MemoryHistoryStore::new();

        shell.change_role(ExpertRole::GeneralAi, &store).await;
        assert_eq!(shell.session().role(), ExpertRole::Operations);

        shell.change_role(ExpertRole::EngineeringDesign, &store).await;
        assert_eq!(shell.session().role(), ExpertRole::EngineeringDesign);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_role_change_resaves_qualifying_conversation() {
        let mut shell = Shell::with_identity(&configured(), asha());
        let responder = CannedResponder("Clinker is...");
        let store = MemoryHistoryStore::new();

        shell
            .send_message(&responder, &store, "What is clinker?")
            .await;
        shell.change_role(ExpertRole::Maintenance, &store).await;

        let records = shell.history(&store).await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].role, ExpertRole::Maintenance);
    }

    #[tokio::test]
    async fn test_send_ignored_outside_chat_mode() {
        let mut shell = Shell::new(&configured());
        let responder = CannedResponder("never");
        let store = MemoryHistoryStore::new();

        shell.send_message(&responder, &store, "hello").await;
        assert!(shell.session().messages().is_empty());
    }
}
