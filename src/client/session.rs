//! In-memory bearer credential and the sign-out signal raised on 401 responses.

use tokio::sync::{RwLock, watch};
use tracing::info;

/// Holds the bearer token attached to backend requests.
pub struct AuthSession {
    token: RwLock<Option<String>>,
    signed_in: watch::Sender<bool>,
}

impl AuthSession {
    /// Create a session, optionally seeded with an existing token.
    pub fn new(token: Option<String>) -> Self {
        let (signed_in, _rx) = watch::channel(token.is_some());
        Self {
            token: RwLock::new(token),
            signed_in,
        }
    }

    /// Current bearer token, if any.
    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    /// Whether a token is installed.
    pub async fn is_signed_in(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// Store a freshly issued token.
    pub async fn install_token(&self, token: String) {
        *self.token.write().await = Some(token);
        self.signed_in.send_replace(true);
    }

    /// Drop the token and notify watchers. Safe to call repeatedly.
    pub async fn sign_out(&self) {
        let had_token = self.token.write().await.take().is_some();
        if had_token {
            info!("signed out of the scoreboard backend");
        }
        self.signed_in.send_replace(false);
    }

    /// Subscribe to signed-in flag changes.
    pub fn watcher(&self) -> watch::Receiver<bool> {
        self.signed_in.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sign_out_notifies_watchers() {
        let session = AuthSession::new(Some("token".into()));
        let mut watcher = session.watcher();
        assert!(*watcher.borrow());

        session.sign_out().await;
        watcher.changed().await.unwrap();
        assert!(!*watcher.borrow());
        assert_eq!(session.token().await, None);
    }

    #[tokio::test]
    async fn install_token_signs_in() {
        let session = AuthSession::new(None);
        assert!(!session.is_signed_in().await);
        session.install_token("abc".into()).await;
        assert_eq!(session.token().await.as_deref(), Some("abc"));
        assert!(*session.watcher().borrow());
    }
}
