//! In-memory session state and its transitions.

use super::{
    api::AuthApi,
    errors::{ApiError, ProfileError},
    models::{Credentials, UserProfile, UserRef},
    store::TokenStore,
};
use log::{debug, info, warn};
use std::sync::Arc;

/// Shown when the server accepted the request but returned no token.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials";

/// Shown when the server could not be reached and gave no detail.
pub const CONNECTION_ERROR_MESSAGE: &str = "Could not connect to the server";

/// Lifecycle phase of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Uninitialized,
    Loading,
    Authenticated,
    Unauthenticated,
}

/// Whether, and as whom, the current user is authenticated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user: Option<UserRef>,
    loading: bool,
    initialized: bool,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn user(&self) -> Option<&UserRef> {
        self.user.as_ref()
    }

    pub fn phase(&self) -> SessionPhase {
        if !self.initialized && !self.loading {
            SessionPhase::Uninitialized
        } else if self.loading {
            SessionPhase::Loading
        } else if self.user.is_some() {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Unauthenticated
        }
    }

    /// Seller code of the current user, empty when unknown.
    pub fn seller_code(&self) -> &str {
        self.user
            .as_ref()
            .and_then(UserRef::seller_code)
            .unwrap_or_default()
    }
}

/// Result of a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Success,
    Failed { message: String },
}

impl LoginOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, LoginOutcome::Success)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoginOutcome::Success => None,
            LoginOutcome::Failed { message } => Some(message),
        }
    }
}

/// Owns the session and performs login, logout and restore.
pub struct SessionManager<A> {
    api: Arc<A>,
    store: Arc<dyn TokenStore>,
    session: Session,
}

impl<A: AuthApi> SessionManager<A> {
    /// Create an uninitialized session manager
    pub fn new(api: Arc<A>, store: Arc<dyn TokenStore>) -> Self {
        Self {
            api,
            store,
            session: Session::default(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn is_loading(&self) -> bool {
        self.session.is_loading()
    }

    pub fn user(&self) -> Option<&UserRef> {
        self.session.user()
    }

    pub fn seller_code(&self) -> &str {
        self.session.seller_code()
    }

    /// Restore the session from the token store.
    ///
    /// A stored token is trusted without asking the server; the first
    /// rejected request ends the session if the token is stale.
    pub fn initialize(&mut self) -> &Session {
        self.session.loading = true;

        let stored = match self.store.get() {
            Ok(token) => token,
            Err(e) => {
                warn!("Failed to read stored token, starting signed out: {e}");
                None
            }
        };

        self.session.user = stored.map(UserRef::from_token);
        self.session.initialized = true;
        self.session.loading = false;

        debug!("Session initialized: {:?}", self.session.phase());
        &self.session
    }

    /// Log in with the given credentials.
    ///
    /// Failures never touch the current user; `loading` is reset on every
    /// path.
    pub async fn login(&mut self, username: &str, password: &str) -> LoginOutcome {
        self.session.loading = true;
        let outcome = self.attempt_login(Credentials::new(username, password)).await;
        self.session.loading = false;
        outcome
    }

    async fn attempt_login(&mut self, credentials: Credentials) -> LoginOutcome {
        let response = match self.api.login(&credentials).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Login failed for {}: {e}", credentials.username);
                return LoginOutcome::Failed {
                    message: login_failure_message(&e),
                };
            }
        };

        let Some(token) = response.token() else {
            warn!("Login response for {} carried no token", credentials.username);
            return LoginOutcome::Failed {
                message: INVALID_CREDENTIALS_MESSAGE.to_string(),
            };
        };

        if let Err(e) = self.store.set(token) {
            warn!("Failed to persist session token: {e}");
        }

        self.session.user = Some(UserRef {
            token: token.to_string(),
            username: Some(credentials.username.clone()),
            profile: None,
        });
        self.session.initialized = true;

        info!("Logged in as {}", credentials.username);
        LoginOutcome::Success
    }

    /// End the session. Safe to call repeatedly.
    pub fn logout(&mut self) {
        self.end_session();
        info!("Logged out");
    }

    /// End the session after the server rejected the token.
    pub fn expire(&mut self) {
        if self.session.is_authenticated() {
            info!("Session expired, signing out");
        }
        self.end_session();
    }

    fn end_session(&mut self) {
        if let Err(e) = self.store.clear() {
            warn!("Failed to clear stored token: {e}");
        }
        self.session.user = None;
    }

    /// Fetch the profile of the current user and attach it to the session.
    pub async fn refresh_profile(&mut self) -> Result<&UserProfile, ProfileError> {
        if !self.session.is_authenticated() {
            return Err(ProfileError::NotAuthenticated);
        }

        let profile = self.api.profile().await?;

        // The session may have ended while the request was in flight.
        let user = self
            .session
            .user
            .as_mut()
            .ok_or(ProfileError::NotAuthenticated)?;
        if user.username.is_none() {
            user.username = Some(profile.username.clone());
        }
        Ok(user.profile.insert(profile))
    }
}

/// Message shown to the user for a failed login call.
fn login_failure_message(error: &ApiError) -> String {
    match error {
        ApiError::Decode(_) => INVALID_CREDENTIALS_MESSAGE.to_string(),
        _ => error
            .detail()
            .map_or_else(|| CONNECTION_ERROR_MESSAGE.to_string(), str::to_string),
    }
}
