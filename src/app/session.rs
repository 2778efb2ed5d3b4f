//! Session gate
//!
//! Holds the logged-in flag. The only way in is [`SessionGate::attempt_login`]
//! with the fixed credential pair; the only way out is
//! [`SessionGate::logout`].

use std::collections::VecDeque;
use std::fmt;

use crate::constants::auth;
use crate::errors::{AuthError, AuthResult};

/// The two session states
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionState {
    /// Initial state; the dashboard is unreachable
    #[default]
    LoggedOut,
    /// Dashboard is reachable
    LoggedIn,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoggedOut => write!(f, "logged out"),
            Self::LoggedIn => write!(f, "logged in"),
        }
    }
}

/// Owner of the session state
///
/// Rejected logins queue a notice that the front end must display and have
/// the user acknowledge.
#[derive(Debug, Default)]
pub struct SessionGate {
    state: SessionState,
    notices: VecDeque<String>,
}

impl SessionGate {
    /// Creates a gate in the logged-out state
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to log in
    ///
    /// Returns `true` and moves to `LoggedIn` on an exact, case-sensitive
    /// match. Otherwise the state becomes `LoggedOut`, a notice is queued and
    /// `false` is returned.
    pub fn attempt_login(&mut self, username: &str, password: &str) -> bool {
        match check_credentials(username, password) {
            Ok(()) => {
                self.state = SessionState::LoggedIn;
                tracing::info!("User '{}' logged in", username);
                true
            }
            Err(e) => {
                self.state = SessionState::LoggedOut;
                tracing::info!("Rejected login for '{}'", username);
                self.notices.push_back(e.to_string());
                false
            }
        }
    }

    /// Log out; a no-op when already logged out
    pub fn logout(&mut self) {
        if self.state == SessionState::LoggedIn {
            tracing::info!("Logged out");
        }
        self.state = SessionState::LoggedOut;
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether the dashboard is reachable
    pub fn is_logged_in(&self) -> bool {
        self.state == SessionState::LoggedIn
    }

    /// Fail with `AuthError::NotLoggedIn` unless logged in
    pub fn require_login(&self) -> AuthResult<()> {
        if self.is_logged_in() {
            Ok(())
        } else {
            Err(AuthError::NotLoggedIn)
        }
    }

    /// Pop the oldest pending notice
    pub fn take_notice(&mut self) -> Option<String> {
        self.notices.pop_front()
    }

    /// Whether a notice is waiting to be shown
    pub fn has_notice(&self) -> bool {
        !self.notices.is_empty()
    }
}

fn check_credentials(username: &str, password: &str) -> AuthResult<()> {
    if username == auth::USERNAME && password == auth::PASSWORD {
        Ok(())
    } else {
        Err(AuthError::InvalidCredentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_logged_out() {
        let gate = SessionGate::new();
        assert_eq!(gate.state(), SessionState::LoggedOut);
        assert!(!gate.has_notice());
        assert!(matches!(gate.require_login(), Err(AuthError::NotLoggedIn)));
    }

    #[test]
    fn test_valid_login() {
        let mut gate = SessionGate::new();
        assert!(gate.attempt_login("nua-admin", "nua-log"));
        assert_eq!(gate.state(), SessionState::LoggedIn);
        assert!(gate.require_login().is_ok());
        assert_eq!(gate.take_notice(), None);
    }

    #[test]
    fn test_invalid_logins_queue_notice() {
        let attempts = [
            ("nua-admin", "wrong"),
            ("NUA-ADMIN", "nua-log"),
            ("nua-admin", "NUA-LOG"),
            ("nua-admin ", "nua-log"),
            ("", ""),
        ];

        for (username, password) in attempts {
            let mut gate = SessionGate::new();
            assert!(!gate.attempt_login(username, password), "{username:?}/{password:?}");
            assert_eq!(gate.state(), SessionState::LoggedOut);
            assert_eq!(
                gate.take_notice().as_deref(),
                Some(auth::INVALID_LOGIN_NOTICE)
            );
            assert!(!gate.has_notice());
        }
    }

    #[test]
    fn test_logout_from_both_states() {
        let mut gate = SessionGate::new();
        gate.logout();
        assert_eq!(gate.state(), SessionState::LoggedOut);

        assert!(gate.attempt_login("nua-admin", "nua-log"));
        gate.logout();
        assert_eq!(gate.state(), SessionState::LoggedOut);
    }

    #[test]
    fn test_failed_login_after_success_logs_out() {
        let mut gate = SessionGate::new();
        assert!(gate.attempt_login("nua-admin", "nua-log"));
        assert!(!gate.attempt_login("nua-admin", "nope"));
        assert_eq!(gate.state(), SessionState::LoggedOut);
        assert!(gate.has_notice());
    }
}
