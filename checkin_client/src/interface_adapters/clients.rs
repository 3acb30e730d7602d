use crate::domain::{Ack, CheckinError, Invitee, SessionStore, TicketsApi};
use crate::interface_adapters::protocol::{
    self, GetDataRequest, LoginRequest, LogoutRequest, UpdateDataRequest,
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

// Thin wrapper around reqwest for the tickets backend.
// The stored API key is read on every call, so a login or logout takes effect immediately.
#[derive(Clone)]
pub struct TicketsClient {
    http: Client,
    base_url: Url,
    sessions: Arc<dyn SessionStore>,
}

#[derive(Debug)]
pub enum TicketsClientError {
    Build(reqwest::Error),
    InvalidUrl(url::ParseError),
    Transport(reqwest::Error),
    Upstream {
        status: StatusCode,
        message: Option<String>,
    },
    Decode {
        status: StatusCode,
        source: reqwest::Error,
    },
}

impl fmt::Display for TicketsClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TicketsClientError::Build(err) => write!(f, "tickets client build error: {err}"),
            TicketsClientError::InvalidUrl(err) => write!(f, "tickets url error: {err}"),
            TicketsClientError::Transport(err) => write!(f, "tickets transport error: {err}"),
            TicketsClientError::Upstream { status, message } => {
                if let Some(message) = message {
                    write!(f, "tickets upstream error {status}: {message}")
                } else {
                    write!(f, "tickets upstream error {status}")
                }
            }
            TicketsClientError::Decode { status, source } => {
                write!(f, "tickets response decode error ({status}): {source}")
            }
        }
    }
}

impl std::error::Error for TicketsClientError {}

impl From<TicketsClientError> for CheckinError {
    fn from(err: TicketsClientError) -> Self {
        match err {
            TicketsClientError::Transport(source) => CheckinError::Network(source.to_string()),
            TicketsClientError::Build(source) => CheckinError::Network(source.to_string()),
            TicketsClientError::InvalidUrl(source) => CheckinError::Network(source.to_string()),
            TicketsClientError::Upstream { status, message } => CheckinError::Api {
                status: Some(status.as_u16()),
                message: message.unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("unexpected status")
                        .to_string()
                }),
            },
            TicketsClientError::Decode { status, source } => CheckinError::Api {
                status: Some(status.as_u16()),
                message: format!("malformed response body: {source}"),
            },
        }
    }
}

impl TicketsClient {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        sessions: Arc<dyn SessionStore>,
    ) -> Result<Self, TicketsClientError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(TicketsClientError::Build)?;

        // Endpoints are joined relative to the base, so it must end with a slash.
        let mut base_url = Url::parse(base_url).map_err(TicketsClientError::InvalidUrl)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            http,
            base_url,
            sessions,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn bearer_token(&self) -> Option<String> {
        match self.sessions.load().await {
            Ok(session) => session
                .map(|session| session.api_key)
                .filter(|key| !key.is_empty()),
            Err(err) => {
                tracing::warn!(error = %err, "failed to read session; sending unauthenticated.");
                None
            }
        }
    }

    // POST a JSON body and return the parsed JSON of a 2xx response.
    async fn post_json<B>(&self, endpoint: &str, body: &B) -> Result<Value, TicketsClientError>
    where
        B: Serialize + ?Sized,
    {
        let url = self
            .base_url
            .join(endpoint)
            .map_err(TicketsClientError::InvalidUrl)?;

        let mut request = self.http.post(url).json(body);
        if let Some(token) = self.bearer_token().await {
            request = request.bearer_auth(token);
        }

        let res = request.send().await.map_err(TicketsClientError::Transport)?;
        let status = res.status();
        tracing::debug!(%status, endpoint, "tickets response received.");

        // Keep the upstream status and message so the user sees what the server said.
        if !status.is_success() {
            let message = res
                .json::<Value>()
                .await
                .ok()
                .and_then(|payload| protocol::error_message(&payload));
            return Err(TicketsClientError::Upstream { status, message });
        }

        res.json::<Value>()
            .await
            .map_err(|source| TicketsClientError::Decode { status, source })
    }
}

#[async_trait]
impl TicketsApi for TicketsClient {
    #[tracing::instrument(name = "tickets_login", skip_all, fields(username = %username, db = %db_name))]
    async fn login(
        &self,
        username: &str,
        password: &str,
        db_name: &str,
    ) -> Result<String, CheckinError> {
        let req = LoginRequest {
            login: username,
            password,
            db: db_name,
        };
        let body = self
            .post_json("tickets/login", &req)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "login request failed."))?;

        let api_key = protocol::api_key_from_login(&body)
            .inspect_err(|e| tracing::error!(error = %e, "login rejected."))?;
        tracing::info!("login successful.");
        Ok(api_key)
    }

    #[tracing::instrument(name = "tickets_get_data", skip_all, fields(code = %code))]
    async fn fetch_invitees(&self, code: &str) -> Result<Vec<Invitee>, CheckinError> {
        let req = GetDataRequest {
            invitees_qrcode_text: code,
        };
        let body = self
            .post_json("tickets/get_data", &req)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "get_data request failed."))?;

        let invitees = protocol::invitees_from_get_data(body)?;
        tracing::info!(count = invitees.len(), "invitees fetched.");
        Ok(invitees)
    }

    #[tracing::instrument(name = "tickets_update_data", skip_all, fields(count = invitees.len()))]
    async fn update_invitees(&self, invitees: &[Invitee]) -> Result<Ack, CheckinError> {
        let req = UpdateDataRequest { invitees };
        let body = self
            .post_json("tickets/update_data", &req)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "update_data request failed."))?;

        Ok(protocol::ack_from(&body))
    }

    #[tracing::instrument(name = "tickets_logout", skip_all, fields(username = %username))]
    async fn logout(&self, api_key: &str, username: &str) -> Result<Ack, CheckinError> {
        let req = LogoutRequest { api_key, username };
        let body = self.post_json("tickets/logout", &req).await?;

        let ack = protocol::ack_from(&body);
        if body.get("success").and_then(Value::as_bool) != Some(true) {
            return Err(CheckinError::Api {
                status: None,
                message: ack
                    .message
                    .unwrap_or_else(|| "logout failed".to_string()),
            });
        }
        Ok(ack)
    }
}
