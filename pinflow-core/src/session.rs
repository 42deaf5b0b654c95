// File: pinflow-core/src/session.rs

use tokio::sync::watch;
use tracing::info;

use pinflow_common::models::User;

#[derive(Debug, Clone)]
pub struct SessionData {
    pub token: String,
    pub user: Option<User>,
}

/// Explicit session handle shared by everything that talks to the backend.
/// Clones share state. A 401 anywhere funnels through
/// [`Session::invalidate`]; consumers that must react (a front end
/// navigating back to its login view) watch the channel from
/// [`Session::subscribe`].
#[derive(Clone)]
pub struct Session {
    tx: watch::Sender<Option<SessionData>>,
}

impl Session {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx }
    }

    /// Session pre-seeded with a stored bearer token (CLI restart path).
    pub fn with_token(token: String) -> Self {
        let session = Self::new();
        session.establish(token, None);
        session
    }

    pub fn establish(&self, token: String, user: Option<User>) {
        self.tx.send_replace(Some(SessionData { token, user }));
    }

    pub fn bearer(&self) -> Option<String> {
        self.tx.borrow().as_ref().map(|s| s.token.clone())
    }

    pub fn current_user(&self) -> Option<User> {
        self.tx.borrow().as_ref().and_then(|s| s.user.clone())
    }

    pub fn is_active(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// The single invalidation point. Idempotent; only the first call on
    /// an active session logs and notifies.
    pub fn invalidate(&self) {
        let had_session = self.tx.send_replace(None).is_some();
        if had_session {
            info!("session invalidated; sign-in required");
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<SessionData>> {
        self.tx.subscribe()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn establish_then_invalidate() {
        let session = Session::new();
        assert!(!session.is_active());
        assert_eq!(session.bearer(), None);

        session.establish("tok-123".into(), None);
        assert!(session.is_active());
        assert_eq!(session.bearer().as_deref(), Some("tok-123"));

        session.invalidate();
        assert!(!session.is_active());
        assert_eq!(session.bearer(), None);
        // Idempotent.
        session.invalidate();
        assert!(!session.is_active());
    }

    #[tokio::test]
    async fn subscribers_observe_invalidation() {
        let session = Session::with_token("tok".into());
        let mut rx = session.subscribe();
        assert!(rx.borrow_and_update().is_some());

        session.invalidate();
        rx.changed().await.expect("sender alive");
        assert!(rx.borrow_and_update().is_none());
    }

    #[tokio::test]
    async fn clones_share_state() {
        let session = Session::new();
        let clone = session.clone();
        session.establish("tok".into(), None);
        assert_eq!(clone.bearer().as_deref(), Some("tok"));
        clone.invalidate();
        assert!(!session.is_active());
    }
}
