//! Slack sign-up flow tests
//!
//! Runs /state and /signup end to end against a local stand-in for Slack's
//! `oauth.v2.access` endpoint.

use axum::{
    Form, Json, Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
    routing::post,
};
use nijitter::{
    assets::AssetServer,
    config::SlackConfig,
    http::{AppEngine, AppState, build_router},
    oauth::{OAuthStateGate, SlackCodeExchange, VerificationTokenStore},
    storage::inmemory::MemoryVerificationTokenStorage,
};
use serde_json::{Value, json};
use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};
use tower::ServiceExt;
use url::Url;

const PAGES: [(&str, &str); 2] = [
    ("signup.html", "<p>welcome</p>"),
    ("error.html", "<p>something went wrong</p>"),
];

fn engine() -> AppEngine {
    #[cfg(feature = "reload")]
    {
        AppEngine::new(minijinja_autoreload::AutoReloader::new(|_| {
            let mut env = minijinja::Environment::new();
            for (name, source) in PAGES {
                env.add_template(name, source)?;
            }
            Ok(env)
        }))
    }

    #[cfg(not(feature = "reload"))]
    {
        let mut env = minijinja::Environment::new();
        for (name, source) in PAGES {
            env.add_template(name, source).unwrap();
        }
        AppEngine::new(env)
    }
}

/// Answers like Slack: `code=good` belongs to T1, `code=elsewhere` to T2, and
/// anything else is an invalid code.
async fn fake_slack(calls: Arc<AtomicUsize>) -> Url {
    let app = Router::new().route(
        "/api/oauth.v2.access",
        post(move |Form(form): Form<HashMap<String, String>>| {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                assert_eq!(form.get("client_id").map(String::as_str), Some("client"));
                assert_eq!(form.get("client_secret").map(String::as_str), Some("secret"));
                let team = match form.get("code").map(String::as_str) {
                    Some("good") => "T1",
                    Some("elsewhere") => "T2",
                    _ => return Json(json!({"ok": false, "error": "invalid_code"})),
                };
                Json::<Value>(json!({
                    "ok": true,
                    "authed_user": {"id": "U42"},
                    "team": {"id": team}
                }))
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Url::parse(&format!("http://{addr}/api/oauth.v2.access")).unwrap()
}

struct Harness {
    router: Router,
    slack_calls: Arc<AtomicUsize>,
    _static_dir: tempfile::TempDir,
}

async fn harness(state_ttl: chrono::Duration) -> Harness {
    let slack_calls = Arc::new(AtomicUsize::new(0));
    let slack = SlackConfig {
        authorize_url: Url::parse("https://slack.com/oauth/v2/authorize?client_id=client")
            .unwrap(),
        token_endpoint: fake_slack(slack_calls.clone()).await,
        client_id: "client".to_string(),
        client_secret: "secret".to_string(),
        redirect_url: "https://nijitter.example/signup".to_string(),
        team_id: "T1".to_string(),
    };

    let state_gate = OAuthStateGate::new(
        VerificationTokenStore::new(Arc::new(MemoryVerificationTokenStorage::new())),
        Arc::new(SlackCodeExchange::new(reqwest::Client::new(), &slack)),
        slack.authorize_url.clone(),
        slack.team_id.clone(),
        state_ttl,
    );

    let static_dir = tempfile::tempdir().unwrap();
    let router = build_router(AppState {
        template_env: engine(),
        asset_server: Arc::new(
            AssetServer::new(static_dir.path(), Duration::from_secs(60)).unwrap(),
        ),
        state_gate: Arc::new(state_gate),
    });

    Harness {
        router,
        slack_calls,
        _static_dir: static_dir,
    }
}

async fn get(router: &Router, uri: &str) -> (StatusCode, HeaderMap, String) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, String::from_utf8(body.to_vec()).unwrap())
}

/// Follows /state and returns the `state` parameter from the redirect.
async fn begin(router: &Router) -> String {
    let (status, headers, _) = get(router, "/state").await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    let location = Url::parse(headers[header::LOCATION].to_str().unwrap()).unwrap();
    assert_eq!(location.path(), "/oauth/v2/authorize");
    let pairs: HashMap<_, _> = location.query_pairs().into_owned().collect();
    assert_eq!(pairs.get("client_id").map(String::as_str), Some("client"));
    pairs["state"].clone()
}

#[tokio::test]
async fn test_signup_sets_verified_cookie_once() {
    let harness = harness(chrono::Duration::minutes(15)).await;
    let state = begin(&harness.router).await;
    assert_eq!(state.len(), 43);

    let uri = format!("/signup?state={state}&code=good");
    let (status, headers, body) = get(&harness.router, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "<p>welcome</p>");
    let cookie = headers[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("slack_verified=1;"));
    assert!(cookie.contains("Max-Age=300"));
    assert!(cookie.contains("Secure"));
    assert!(cookie.contains("HttpOnly"));

    let (status, headers, body) = get(&harness.router, &uri).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(headers.get(header::SET_COOKIE).is_none());
    assert!(!body.contains(&state));

    assert_eq!(harness.slack_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_each_redirect_carries_a_fresh_state() {
    let harness = harness(chrono::Duration::minutes(15)).await;
    let first = begin(&harness.router).await;
    let second = begin(&harness.router).await;
    assert_ne!(first, second);

    for state in [second, first] {
        let (status, _, _) =
            get(&harness.router, &format!("/signup?state={state}&code=good")).await;
        assert_eq!(status, StatusCode::OK);
    }
}

#[tokio::test]
async fn test_unknown_or_missing_state_never_reaches_slack() {
    let harness = harness(chrono::Duration::minutes(15)).await;
    begin(&harness.router).await;

    for uri in [
        "/signup?state=forged&code=good",
        "/signup?code=good",
        "/signup?state=&code=good",
        "/signup",
        "/signup?error=access_denied",
    ] {
        let (status, headers, _) = get(&harness.router, uri).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{uri}");
        assert!(headers.get(header::SET_COOKIE).is_none(), "{uri}");
    }

    assert_eq!(harness.slack_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_expired_state_is_rejected() {
    let harness = harness(chrono::Duration::milliseconds(10)).await;
    let state = begin(&harness.router).await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    let (status, headers, _) =
        get(&harness.router, &format!("/signup?state={state}&code=good")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(headers.get(header::SET_COOKIE).is_none());
    assert_eq!(harness.slack_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_rejected_exchanges_burn_the_state() {
    let harness = harness(chrono::Duration::minutes(15)).await;

    for code in ["elsewhere", "bogus"] {
        let state = begin(&harness.router).await;
        let (status, headers, _) =
            get(&harness.router, &format!("/signup?state={state}&code={code}")).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{code}");
        assert!(headers.get(header::SET_COOKIE).is_none(), "{code}");

        let (status, _, _) =
            get(&harness.router, &format!("/signup?state={state}&code=good")).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{code}");
    }

    assert_eq!(harness.slack_calls.load(Ordering::SeqCst), 2);
}
