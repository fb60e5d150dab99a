//! Short-lived, HTTP-only cookies handed out during sign-up.

use http::HeaderValue;

/// Lifetime of sign-up cookies, in seconds.
pub const SIGNUP_COOKIE_MAX_AGE: u32 = 300;

/// Build a `Set-Cookie` value for `name=value`.
///
/// Returns `None` unless `value` is non-empty and limited to the URL-safe
/// base64 alphabet, so that client-supplied values cannot add attributes.
pub fn signup_cookie(name: &str, value: &str) -> Option<HeaderValue> {
    let safe = !value.is_empty()
        && value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if !safe {
        return None;
    }

    HeaderValue::from_str(&format!(
        "{name}={value}; Max-Age={SIGNUP_COOKIE_MAX_AGE}; Path=/; Secure; HttpOnly; SameSite=Lax"
    ))
    .ok()
}
