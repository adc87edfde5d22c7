//! Synchronization core for a browser-based chat front end.
//!
//! The crate owns the local view of a user's conversation threads and
//! messages, persisted in a hosted GraphQL store and scoped to an identity
//! supplied by a hosted auth provider. "Bot" replies are an echo of the
//! user's own text, recorded as a second row on every send.
//!
//! [`chat::service::ChatService`] is the entry point; it talks to the remote
//! store through [`integration::gateway::DataGateway`] and to the identity
//! provider through [`auth::service::AuthService`].

pub mod auth;
pub mod chat;
pub mod integration;
pub mod message;
pub mod thread;
pub mod user;

/// Raw string access for opaque newtypes.
pub trait Raw {
    fn raw(&self) -> &str;
}

/// Shortened rendering for values that should not be logged in full.
pub trait Redact: Raw {
    fn redact(&self) -> String {
        let raw = self.raw();
        match raw.char_indices().nth(4) {
            Some((idx, _)) => format!("{}...", &raw[..idx]),
            None => "...".to_string(),
        }
    }
}
