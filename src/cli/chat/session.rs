use tracing::info;

use super::history::{History, HistoryEntry};

/// State for one user interacting with the client. Created when the client
/// starts and dropped when it exits.
#[derive(Debug)]
pub struct Session {
    user_id: String,
    authenticated: bool,
    history: History,
}

impl Session {
    pub fn new(default_user_id: &str) -> Self {
        Self {
            user_id: default_user_id.to_string(),
            authenticated: false,
            history: History::new(),
        }
    }

    /// Placeholder login: any identifier is accepted. History is kept across
    /// identity changes.
    pub fn login(&mut self, user_id: &str) {
        info!("Logged in as {}", user_id);
        self.user_id = user_id.to_string();
        self.authenticated = true;
    }

    pub fn logout(&mut self) {
        info!("Logged out {}", self.user_id);
        self.authenticated = false;
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn record(&mut self, entry: HistoryEntry) {
        self.history.record(entry);
    }
}
