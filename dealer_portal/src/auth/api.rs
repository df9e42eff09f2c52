//! The remote authentication service as seen by the session.

use super::{
    errors::ApiResult,
    models::{Credentials, HealthStatus, TokenResponse, UserProfile},
};
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Operations of the remote authentication API.
///
/// Implementations attach the stored bearer token to every request and, on
/// any `401` response, clear the token store and emit
/// [`ApiEvent::SessionExpired`] before returning the error.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange credentials for an access token.
    async fn login(&self, credentials: &Credentials) -> ApiResult<TokenResponse>;

    /// Fetch the profile of the token's owner.
    async fn profile(&self) -> ApiResult<UserProfile>;

    /// Liveness probe. Needs no token.
    async fn health(&self) -> ApiResult<HealthStatus>;
}

/// Side effects raised by the HTTP layer for the application to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiEvent {
    /// The server rejected the stored token. The token store has already
    /// been cleared.
    SessionExpired,
}

pub type ApiEventSender = mpsc::UnboundedSender<ApiEvent>;
pub type ApiEventReceiver = mpsc::UnboundedReceiver<ApiEvent>;

/// Create the channel an API client reports [`ApiEvent`]s on.
pub fn event_channel() -> (ApiEventSender, ApiEventReceiver) {
    mpsc::unbounded_channel()
}
