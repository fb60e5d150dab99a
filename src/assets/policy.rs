//! Asset classification and the cache headers each class receives.

use http::{HeaderMap, HeaderValue, header};
use std::time::Duration;

const NO_STORE: &str = "no-store, no-cache, must-revalidate, max-age=0";

/// Kind of static asset, derived from the requested path's suffix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetClass {
    Script,
    Stylesheet,
    Other,
}

impl AssetClass {
    /// Classify by suffix. The comparison ignores ASCII case so that
    /// `APP.JS` cannot slip into the cacheable class.
    pub fn from_path(requested_path: &str) -> Self {
        let suffix = requested_path
            .rsplit_once('.')
            .map(|(_, suffix)| suffix)
            .unwrap_or_default();
        if suffix.eq_ignore_ascii_case("js") {
            AssetClass::Script
        } else if suffix.eq_ignore_ascii_case("css") {
            AssetClass::Stylesheet
        } else {
            AssetClass::Other
        }
    }

    /// Scripts and stylesheets change with every deploy and are never cached.
    pub fn cache_policy(self, max_age: Duration) -> CachePolicy {
        match self {
            AssetClass::Script | AssetClass::Stylesheet => CachePolicy::NoStore,
            AssetClass::Other => CachePolicy::Public { max_age },
        }
    }
}

/// Cache directives attached to a served asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CachePolicy {
    NoStore,
    Public { max_age: Duration },
}

impl CachePolicy {
    /// Write the policy into `headers`, replacing any existing cache headers.
    pub fn apply(&self, headers: &mut HeaderMap) {
        match self {
            CachePolicy::NoStore => {
                headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(NO_STORE));
                headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
                headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
            }
            CachePolicy::Public { max_age } => {
                let value = format!("public, max-age={}", max_age.as_secs());
                // Digits and ASCII only, always a valid header value.
                if let Ok(value) = HeaderValue::from_str(&value) {
                    headers.insert(header::CACHE_CONTROL, value);
                }
                headers.remove(header::PRAGMA);
                headers.remove(header::EXPIRES);
            }
        }
    }
}
