//! In-memory storage implementations
//!
//! Suitable for development and tests. Tokens do not survive a restart.

mod verification_tokens;

pub use verification_tokens::MemoryVerificationTokenStorage;
