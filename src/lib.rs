//! Nijitter web front end library crate.
//!
//! Serves static assets from a fixed directory with path containment and
//! per-class cache policy, and gates the Slack sign-up handshake behind
//! single-use, time-boxed state tokens.

pub mod assets;
pub mod config;
pub mod errors;
pub mod http;
pub mod oauth;
pub mod storage;
pub mod templates;
