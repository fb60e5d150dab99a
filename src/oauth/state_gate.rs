//! Slack sign-up handshake guarded by single-use `state` tokens.

use chrono::Duration;
use std::sync::Arc;
use url::Url;

use super::{
    slack::CodeExchange,
    types::{ConsumeOutcome, SlackIdentity},
    verification::VerificationTokenStore,
};
use crate::errors::FlowError;

/// Binds the redirect to Slack and its callback through one state token.
#[derive(Clone)]
pub struct OAuthStateGate {
    tokens: VerificationTokenStore,
    exchange: Arc<dyn CodeExchange>,
    authorize_url: Url,
    team_id: String,
    state_ttl: Duration,
}

impl OAuthStateGate {
    pub fn new(
        tokens: VerificationTokenStore,
        exchange: Arc<dyn CodeExchange>,
        authorize_url: Url,
        team_id: String,
        state_ttl: Duration,
    ) -> Self {
        Self {
            tokens,
            exchange,
            authorize_url,
            team_id,
            state_ttl,
        }
    }

    /// Issue a state token and return the Slack authorization URL carrying it.
    pub async fn begin_flow(&self) -> Result<Url, FlowError> {
        let state = self.tokens.issue(self.state_ttl).await?;

        let mut redirect = self.authorize_url.clone();
        redirect.query_pairs_mut().append_pair("state", &state);
        Ok(redirect)
    }

    /// Consume `state`, then exchange `code` only if the state was valid.
    pub async fn complete_flow(&self, state: &str, code: &str) -> Result<SlackIdentity, FlowError> {
        match self.tokens.consume(state).await? {
            ConsumeOutcome::Valid => {}
            ConsumeOutcome::NotFound => return Err(FlowError::TokenNotFound),
            ConsumeOutcome::Expired => return Err(FlowError::TokenExpired),
        }

        let identity = self.exchange.exchange(code).await?;
        if identity.team_id != self.team_id {
            tracing::warn!(team_id = %identity.team_id, "slack sign-up from unexpected team");
            return Err(FlowError::TenantMismatch);
        }

        Ok(identity)
    }
}
