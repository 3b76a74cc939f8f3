//! plantchat
//!
//! Headless core of a plant-engineering AI chat client: a role-scoped chat
//! session state machine, an auto-save policy for conversation history,
//! and the shell controller tying them to authentication state.

pub mod app;
pub mod responder;
pub mod session;
pub mod storage;
pub mod types;

/// Install a tracing subscriber honoring `RUST_LOG`
///
/// Intended for binaries and examples embedding the crate; libraries and
/// tests leave the subscriber alone.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}
