//! Token and identity types shared by the sign-up flow and storage.

use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of random bytes in a state token (43 base64url characters).
pub const TOKEN_BYTES: usize = 32;

/// A persisted single-use verification token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl VerificationToken {
    /// Whether the token had expired at `now`. A token is still valid at the
    /// exact instant it expires.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Result of consuming a token. The token is gone afterwards in every case.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsumeOutcome {
    Valid,
    NotFound,
    Expired,
}

impl ConsumeOutcome {
    pub fn is_valid(self) -> bool {
        matches!(self, ConsumeOutcome::Valid)
    }
}

/// Identity returned by a successful Slack code exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlackIdentity {
    pub user_id: String,
    pub team_id: String,
}

/// Generate a secure random token
pub fn generate_token() -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    let bytes: [u8; TOKEN_BYTES] = rng.r#gen();
    base64::prelude::BASE64_URL_SAFE_NO_PAD.encode(bytes)
}
