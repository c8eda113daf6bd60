use std::fmt;

use super::UserProfile;

/// Bearer credentials issued by the identity provider.
#[derive(Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

// Session states and events get debug-logged by the orchestrator; bearer
// values stay out of logs.
impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

impl TokenPair {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }

    /// Build a pair only when the provider actually issued both tokens.
    ///
    /// Account creation legitimately returns empty tokens while email
    /// confirmation is pending; that is "account created, not yet
    /// authenticated", never a session.
    pub fn from_issued(access_token: &str, refresh_token: &str) -> Option<Self> {
        if access_token.is_empty() || refresh_token.is_empty() {
            return None;
        }
        Some(Self::new(access_token, refresh_token))
    }
}

/// The authoritative in-memory authentication state.
///
/// 进程内唯一权威的认证会话状态。
///
/// Invariant: `tokens` is `Some` if and only if `user` is `Some`. The session
/// is a volatile projection of the vault-persisted credential material plus a
/// freshly fetched identity; it is cleared entirely on sign-out.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Session {
    pub user: Option<UserProfile>,
    pub tokens: Option<TokenPair>,
    /// The user has completed or explicitly skipped a biometric challenge
    /// since this session authenticated.
    pub biometric_setup_completed: bool,
    /// Transient routing flag: a restored session should present the
    /// biometric re-entry screen instead of the main app.
    pub show_biometric_login: bool,
    /// Transient flag steering the one-time post-signup navigation.
    pub just_completed_signup: bool,
    /// Set once initial session recovery has finished; gates what the UI may
    /// render.
    pub bootstrap_done: bool,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Drop every authenticated field. `bootstrap_done` survives: recovery
    /// already ran for this process, signing out does not undo it.
    pub fn clear_authenticated_state(&mut self) {
        self.user = None;
        self.tokens = None;
        self.biometric_setup_completed = false;
        self.show_biometric_login = false;
        self.just_completed_signup = false;
    }

    /// The tokens-iff-user invariant, checked by tests after every observed
    /// transition.
    pub fn invariants_hold(&self) -> bool {
        self.user.is_some() == self.tokens.is_some()
            && (!self.show_biometric_login || self.user.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::{Session, TokenPair, UserProfile};

    #[test]
    fn from_issued_rejects_empty_tokens() {
        assert!(TokenPair::from_issued("", "").is_none());
        assert!(TokenPair::from_issued("at", "").is_none());
        assert!(TokenPair::from_issued("", "rt").is_none());
        assert_eq!(
            TokenPair::from_issued("at", "rt"),
            Some(TokenPair::new("at", "rt"))
        );
    }

    #[test]
    fn clear_preserves_bootstrap_done() {
        let mut session = Session {
            user: Some(UserProfile::new("u1", "Dana", "dana@x.com")),
            tokens: Some(TokenPair::new("at", "rt")),
            biometric_setup_completed: true,
            show_biometric_login: true,
            just_completed_signup: true,
            bootstrap_done: true,
        };
        session.clear_authenticated_state();
        assert_eq!(session, Session {
            bootstrap_done: true,
            ..Session::default()
        });
        assert!(session.invariants_hold());
    }
}
