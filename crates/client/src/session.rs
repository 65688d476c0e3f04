use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::error::ClientError;
use crate::models::TokenResponse;

type LogoutCallback = Arc<dyn Fn() + Send + Sync>;

struct SessionState {
    access_token: String,
    expires_at: DateTime<Utc>,
    invalidated: AtomicBool,
    on_logout: RwLock<Option<LogoutCallback>>,
}

/// An authenticated session against the API.
///
/// Clones share state: invalidating one clone invalidates all of them, and
/// the logout callback fires at most once.
#[derive(Clone)]
pub struct SessionContext {
    state: Arc<SessionState>,
}

impl SessionContext {
    pub fn new(access_token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            state: Arc::new(SessionState {
                access_token: access_token.into(),
                expires_at,
                invalidated: AtomicBool::new(false),
                on_logout: RwLock::new(None),
            }),
        }
    }

    /// Builds a session from a login response received at `issued_at`.
    pub fn from_token(token: TokenResponse, issued_at: DateTime<Utc>) -> Self {
        Self::new(
            token.access_token,
            issued_at + Duration::seconds(token.expires_in),
        )
    }

    /// Registers the callback fired when the session is invalidated.
    pub fn with_logout<F>(self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        if let Ok(mut slot) = self.state.on_logout.write() {
            *slot = Some(Arc::new(callback));
        }
        self
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.state.expires_at
    }

    pub fn is_invalidated(&self) -> bool {
        self.state.invalidated.load(Ordering::SeqCst)
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_invalidated() && now < self.state.expires_at
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    /// Returns the bearer token, invalidating the session first if it has
    /// expired at `now`.
    pub fn token_at(&self, now: DateTime<Utc>) -> Result<&str, ClientError> {
        if self.is_invalidated() {
            return Err(ClientError::SessionExpired);
        }
        if now >= self.state.expires_at {
            debug!("Session token expired at {}", self.state.expires_at);
            self.invalidate();
            return Err(ClientError::SessionExpired);
        }
        Ok(&self.state.access_token)
    }

    pub fn token(&self) -> Result<&str, ClientError> {
        self.token_at(Utc::now())
    }

    /// Marks the session as logged out and fires the logout callback once.
    pub fn invalidate(&self) {
        if self
            .state
            .invalidated
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return;
        }
        info!("Session invalidated");
        let callback = self
            .state
            .on_logout
            .read()
            .ok()
            .and_then(|slot| slot.clone());
        if let Some(callback) = callback {
            callback();
        }
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("access_token", &"<redacted>")
            .field("expires_at", &self.state.expires_at)
            .field("invalidated", &self.is_invalidated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counting_session(expires_in: i64) -> (SessionContext, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let session = SessionContext::new("tok", Utc::now() + Duration::seconds(expires_in))
            .with_logout(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        (session, calls)
    }

    #[test]
    fn test_from_token_computes_expiry() {
        let issued_at = Utc::now();
        let session = SessionContext::from_token(
            TokenResponse {
                access_token: "abc".to_string(),
                token_type: "Bearer".to_string(),
                expires_in: 3600,
            },
            issued_at,
        );
        assert_eq!(session.expires_at(), issued_at + Duration::seconds(3600));
        assert_eq!(session.token_at(issued_at).unwrap(), "abc");
    }

    #[test]
    fn test_expired_token_invalidates_and_logs_out() {
        let (session, calls) = counting_session(60);
        let later = session.expires_at() + Duration::seconds(1);

        assert!(matches!(
            session.token_at(later),
            Err(ClientError::SessionExpired)
        ));
        assert!(session.is_invalidated());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_logout_fires_once_across_clones() {
        let (session, calls) = counting_session(60);
        let clone = session.clone();

        clone.invalidate();
        session.invalidate();

        assert!(!session.is_valid());
        assert!(matches!(session.token(), Err(ClientError::SessionExpired)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_debug_redacts_token() {
        let session = SessionContext::new("secret-token", Utc::now());
        assert!(!format!("{:?}", session).contains("secret-token"));
    }
}
