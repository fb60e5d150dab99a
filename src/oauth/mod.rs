//! Slack sign-up gating with single-use, time-boxed state tokens.

pub mod slack;
pub mod state_gate;
pub mod types;
pub mod verification;

pub use slack::{CodeExchange, SlackCodeExchange};
pub use state_gate::OAuthStateGate;
pub use types::{ConsumeOutcome, SlackIdentity, VerificationToken, generate_token};
pub use verification::VerificationTokenStore;
