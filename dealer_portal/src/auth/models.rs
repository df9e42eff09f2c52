//! Authentication data models.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Username and password as typed into the login form.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Both fields contain something other than whitespace.
    pub fn is_complete(&self) -> bool {
        !self.username.trim().is_empty() && !self.password.trim().is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of a successful `POST /auth/login`.
///
/// Both fields are optional so that a body without a token decodes and is
/// rejected by the session instead of surfacing as a decode error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl TokenResponse {
    /// The access token, if present and non-empty.
    pub fn token(&self) -> Option<&str> {
        self.access_token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
    }
}

/// Profile of the authenticated employee (`GET /auth/me`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "codigo_vendedor")]
    pub seller_code: Option<String>,
    #[serde(default, alias = "sucursal")]
    pub branch: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Liveness report (`GET /health`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy") || self.status.eq_ignore_ascii_case("ok")
    }
}

/// The authenticated user as known to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRef {
    pub token: String,
    /// Unknown for sessions restored from the token store until the
    /// profile is fetched.
    pub username: Option<String>,
    pub profile: Option<UserProfile>,
}

impl UserRef {
    /// A user restored from a stored token alone.
    pub fn from_token(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            username: None,
            profile: None,
        }
    }

    pub fn display_name(&self) -> Option<&str> {
        self.profile
            .as_ref()
            .and_then(|profile| profile.full_name.as_deref())
            .or(self.username.as_deref())
    }

    pub fn seller_code(&self) -> Option<&str> {
        self.profile
            .as_ref()
            .and_then(|profile| profile.seller_code.as_deref())
    }

    pub fn branch(&self) -> Option<&str> {
        self.profile
            .as_ref()
            .and_then(|profile| profile.branch.as_deref())
    }
}
