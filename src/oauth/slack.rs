//! Slack OAuth v2 code exchange.

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use super::types::SlackIdentity;
use crate::config::SlackConfig;
use crate::errors::ExchangeError;

/// Exchanges an authorization code for the identity it was granted to.
#[async_trait]
pub trait CodeExchange: Send + Sync {
    async fn exchange(&self, code: &str) -> Result<SlackIdentity, ExchangeError>;
}

#[derive(Debug, Deserialize)]
struct SlackId {
    id: String,
}

/// The subset of the `oauth.v2.access` response that is used.
#[derive(Debug, Deserialize)]
struct AccessResponse {
    ok: bool,
    error: Option<String>,
    authed_user: Option<SlackId>,
    team: Option<SlackId>,
}

impl TryFrom<AccessResponse> for SlackIdentity {
    type Error = ExchangeError;

    fn try_from(response: AccessResponse) -> Result<Self, Self::Error> {
        if !response.ok {
            return Err(ExchangeError::ProviderRejected(
                response.error.unwrap_or_else(|| "unknown_error".to_string()),
            ));
        }
        match (response.authed_user, response.team) {
            (Some(user), Some(team)) => Ok(SlackIdentity {
                user_id: user.id,
                team_id: team.id,
            }),
            _ => Err(ExchangeError::MalformedResponse(
                "missing authed_user or team".to_string(),
            )),
        }
    }
}

/// `CodeExchange` backed by Slack's token endpoint.
pub struct SlackCodeExchange {
    http_client: reqwest::Client,
    token_endpoint: Url,
    client_id: String,
    client_secret: String,
    redirect_url: String,
}

impl SlackCodeExchange {
    pub fn new(http_client: reqwest::Client, config: &SlackConfig) -> Self {
        Self {
            http_client,
            token_endpoint: config.token_endpoint.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_url: config.redirect_url.clone(),
        }
    }
}

#[async_trait]
impl CodeExchange for SlackCodeExchange {
    async fn exchange(&self, code: &str) -> Result<SlackIdentity, ExchangeError> {
        let form = [
            ("code", code),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("redirect_uri", self.redirect_url.as_str()),
        ];

        let response = self
            .http_client
            .post(self.token_endpoint.clone())
            .form(&form)
            .send()
            .await
            .map_err(|e| ExchangeError::RequestFailed(e.to_string()))?
            .error_for_status()
            .map_err(|e| ExchangeError::RequestFailed(e.to_string()))?;

        let body: AccessResponse = response
            .json()
            .await
            .map_err(|e| ExchangeError::MalformedResponse(e.to_string()))?;

        body.try_into()
    }
}
