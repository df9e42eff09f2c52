//! HTTP API client for the dealer portal server.

use async_trait::async_trait;
use dealer_portal::auth::{
    ApiError, ApiEvent, ApiEventSender, ApiResult, AuthApi, Credentials, HealthStatus,
    TokenResponse, TokenStore, UserProfile,
};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use std::sync::Arc;
use tracing::{debug, warn};

/// API client for communicating with the portal server
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
    store: Arc<dyn TokenStore>,
    events: ApiEventSender,
}

/// FastAPI error body. `detail` is a string for handled errors and a list
/// for request validation errors.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// `store` is read before every request and cleared on any `401`;
    /// `events` receives [`ApiEvent::SessionExpired`] when that happens.
    pub fn new(base_url: String, store: Arc<dyn TokenStore>, events: ApiEventSender) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            store,
            events,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Notify the server of a logout. The token is only invalidated on the
    /// client, so failures here are informational.
    pub async fn logout(&self) -> ApiResult<()> {
        self.execute(self.client.post(self.url("/auth/logout")))
            .await
            .map(drop)
    }

    /// Send a request with the stored token attached and apply the
    /// unauthorized-response policy.
    async fn execute(&self, request: RequestBuilder) -> ApiResult<Response> {
        let request = match self.store.get() {
            Ok(Some(token)) => request.bearer_auth(token),
            Ok(None) => request,
            Err(e) => {
                warn!("Failed to read stored token, sending request without it: {e}");
                request
            }
        };

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        debug!(http_status = status.as_u16(), url = %response.url(), "API response");

        if status == StatusCode::UNAUTHORIZED {
            let detail = read_detail(response).await;
            self.expire_session();
            return Err(ApiError::Unauthorized { detail });
        }

        if !status.is_success() {
            let detail = read_detail(response).await;
            return Err(ApiError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        Ok(response)
    }

    fn expire_session(&self) {
        if let Err(e) = self.store.clear() {
            warn!("Failed to clear stored token after 401: {e}");
        }
        // Nobody listening is fine; the token is gone either way.
        let _ = self.events.send(ApiEvent::SessionExpired);
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self.execute(self.client.get(self.url(path))).await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

/// Extract the `detail` message from an error response, if any.
async fn read_detail(response: Response) -> Option<String> {
    let body = response.text().await.ok()?;
    match serde_json::from_str::<ErrorBody>(&body).ok()?.detail {
        serde_json::Value::String(detail) => Some(detail),
        serde_json::Value::Array(items) => items
            .first()
            .and_then(|item| item.get("msg"))
            .and_then(serde_json::Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, credentials: &Credentials) -> ApiResult<TokenResponse> {
        let form = [
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
        ];
        let response = self
            .execute(self.client.post(self.url("/auth/login")).form(&form))
            .await?;
        decode(response).await
    }

    async fn profile(&self) -> ApiResult<UserProfile> {
        self.get_json("/auth/me").await
    }

    async fn health(&self) -> ApiResult<HealthStatus> {
        self.get_json("/health").await
    }
}
