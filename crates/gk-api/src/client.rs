//! HTTP client for the Gatekeeper REST endpoints.

use crate::error::{ApiError, ApiResult};
use gk_core::{
    CommandResponse, ExecuteCommandRequest, HealthResponse, KickRequest, LoginRequest,
    LoginResponse, MessageRequest, PlayerDetails, PlayerId, PlayersResponse,
};
use gk_session::SessionHandle;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// URL scheme for REST requests ("https" or "http").
    #[serde(default = "default_scheme")]
    pub scheme: String,
}

fn default_scheme() -> String {
    "https".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            scheme: default_scheme(),
        }
    }
}

/// Client for the Gatekeeper administration API.
///
/// Holds no request state. No retries and no timeout beyond the transport
/// default; callers decide what a failure means.
#[derive(Clone)]
pub struct GatekeeperClient {
    client: Client,
    session: SessionHandle,
    config: ApiConfig,
}

impl GatekeeperClient {
    pub fn new(session: SessionHandle, config: ApiConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| ApiError::Transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            session,
            config,
        })
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// Exchange credentials for a bearer token.
    ///
    /// The token is returned, not stored; hand it to the session manager.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<String> {
        let url = self.url(&["auth", "login"])?;
        info!(url = %url, username, "Logging in");

        let request = self.client.post(url).json(&LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        });
        let response: LoginResponse = self.send("login", request).await?;
        Ok(response.token)
    }

    pub async fn execute_command(&self, command: &str) -> ApiResult<CommandResponse> {
        let token = self.bearer()?;
        let url = self.url(&["api", "gatekeeper", "execute-command"])?;
        debug!(command, "Executing command");

        let request = self
            .client
            .post(url)
            .header(AUTHORIZATION, token)
            .json(&ExecuteCommandRequest {
                command: command.to_string(),
            });
        self.send("execute-command", request).await
    }

    pub async fn list_players(&self) -> ApiResult<PlayersResponse> {
        let token = self.bearer()?;
        let url = self.url(&["api", "gatekeeper", "online-players"])?;

        let request = self.client.get(url).header(AUTHORIZATION, token);
        self.send("online-players", request).await
    }

    pub async fn player_details(&self, id: &PlayerId) -> ApiResult<PlayerDetails> {
        let token = self.bearer()?;
        let url = self.url(&["api", "gatekeeper", "player", id.as_str()])?;

        let request = self.client.get(url).header(AUTHORIZATION, token);
        self.send("player", request).await
    }

    pub async fn kick_player(&self, id: &PlayerId, reason: &str) -> ApiResult<CommandResponse> {
        let token = self.bearer()?;
        let url = self.url(&["api", "gatekeeper", "player", id.as_str(), "kick"])?;
        info!(player = %id, reason, "Kicking player");

        let request = self
            .client
            .post(url)
            .header(AUTHORIZATION, token)
            .json(&KickRequest {
                reason: reason.to_string(),
            });
        self.send("kick", request).await
    }

    pub async fn send_private_message(
        &self,
        id: &PlayerId,
        message: &str,
    ) -> ApiResult<CommandResponse> {
        let token = self.bearer()?;
        let url = self.url(&["api", "gatekeeper", "player", id.as_str(), "message"])?;

        let request = self
            .client
            .post(url)
            .header(AUTHORIZATION, token)
            .json(&MessageRequest {
                message: message.to_string(),
            });
        self.send("message", request).await
    }

    pub async fn server_health(&self) -> ApiResult<HealthResponse> {
        let token = self.bearer()?;
        let url = self.url(&["health"])?;

        let request = self.client.get(url).header(AUTHORIZATION, token);
        self.send("health", request).await
    }

    /// `Authorization` header value, checked before any URL is built.
    fn bearer(&self) -> ApiResult<String> {
        self.session
            .token()
            .map(|t| t.bearer())
            .ok_or(ApiError::NotAuthenticated)
    }

    /// Build `{scheme}://{server_address}/{segments...}` with each segment
    /// percent-encoded.
    fn url(&self, segments: &[&str]) -> ApiResult<Url> {
        let base = format!("{}://{}", self.config.scheme, self.session.server_address());
        let mut url =
            Url::parse(&base).map_err(|e| ApiError::InvalidAddress(format!("{base}: {e}")))?;

        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidAddress(base.clone()))?
            .clear()
            .extend(segments);

        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        request: RequestBuilder,
    ) -> ApiResult<T> {
        let response = request.send().await.map_err(|e| {
            warn!(endpoint, error = %e, "HTTP request failed");
            ApiError::Transport(format!("HTTP request failed: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(endpoint, %status, "Non-success response");
            return Err(ApiError::Http {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(format!("{endpoint}: {e}")))
    }
}
