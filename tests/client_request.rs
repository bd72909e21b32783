//! Integration tests for the request pipeline against a real HTTP server
//! (mockito). Transport-level behavior that needs scripted failures lives
//! in `stub_pipeline.rs`.

mod common;

use common::RecordingHooks;
use mockito::Matcher;
use serde::Deserialize;

use realty_client::{HttpClient, NotifyKind, QueryDefaults, RequestBody, RequestOptions};

#[derive(Debug, Deserialize, PartialEq)]
struct Listing {
    id: i64,
}

fn client_for(server: &mockito::ServerGuard) -> HttpClient {
    HttpClient::builder(server.url()).build().unwrap()
}

#[tokio::test]
async fn unwraps_data_envelope_with_message() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/listings/1")
        .with_status(200)
        .with_body(r#"{"data":{"id":1},"message":"ok"}"#)
        .create_async()
        .await;

    let resp = client_for(&server)
        .get::<Listing>("/listings/1", RequestOptions::new())
        .await;

    mock.assert_async().await;
    assert!(!resp.is_error);
    assert_eq!(resp.status, 200);
    assert_eq!(resp.data, Some(Listing { id: 1 }));
    assert_eq!(resp.message.as_deref(), Some("ok"));
}

#[tokio::test]
async fn carries_unenveloped_payloads_whole() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/ids")
        .with_status(200)
        .with_body("[1,2,3]")
        .create_async()
        .await;

    let resp = client_for(&server)
        .get::<Vec<i64>>("/ids", RequestOptions::new())
        .await;

    assert_eq!(resp.data, Some(vec![1, 2, 3]));
}

#[tokio::test]
async fn request_headers_win_over_config_and_derived_headers() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/me")
        .match_header("x-app", "from-request")
        .match_header("authorization", "Bearer override")
        .match_header("accept-language", "en")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let client = HttpClient::builder(server.url())
        .default_header("X-App", "from-config")
        .token_provider(|| Some("config-token".to_owned()))
        .locale_provider(|| Some("en".to_owned()))
        .build()
        .unwrap();

    let resp = client
        .get::<serde_json::Value>(
            "/me",
            RequestOptions::new()
                .header("X-App", "from-request")
                .header("Authorization", "Bearer override"),
        )
        .await;

    mock.assert_async().await;
    assert!(!resp.is_error);
}

#[tokio::test]
async fn empty_token_sends_no_authorization_header() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/public")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let client = HttpClient::builder(server.url())
        .token_provider(|| Some(String::new()))
        .build()
        .unwrap();

    client
        .get::<serde_json::Value>("/public", RequestOptions::new())
        .await;

    mock.assert_async().await;
}

#[tokio::test]
async fn unauthorized_fires_hook_exactly_once() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/secure")
        .with_status(401)
        .with_body(r#"{"data":null,"message":"session expired"}"#)
        .create_async()
        .await;

    let hooks = RecordingHooks::default();
    let client = HttpClient::builder(server.url())
        .hooks(hooks.clone())
        .build()
        .unwrap();

    let resp = client
        .get::<serde_json::Value>("/secure", RequestOptions::new())
        .await;

    assert!(resp.is_error);
    assert_eq!(resp.status, 401);
    assert_eq!(hooks.unauthorized_count(), 1);
    // Error toast defaults on and uses the backend message.
    assert_eq!(
        hooks.notifications(),
        vec![("session expired".to_owned(), NotifyKind::Error)]
    );
}

#[tokio::test]
async fn non_json_2xx_body_is_tolerated() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/legacy")
        .with_status(200)
        .with_body("<html>not json</html>")
        .create_async()
        .await;

    let resp = client_for(&server)
        .get::<serde_json::Value>("/legacy", RequestOptions::new())
        .await;

    assert!(!resp.is_error);
    assert_eq!(resp.status, 200);
    assert_eq!(resp.data, None);
    assert_eq!(resp.message.as_deref(), Some("Failed to parse response"));
}

#[tokio::test]
async fn params_and_query_defaults_reach_the_wire() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/search")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("city".into(), "riyadh".into()),
            Matcher::UrlEncoded("page".into(), "2".into()),
        ]))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let client = HttpClient::builder(server.url())
        .query_defaults(|| {
            Some(QueryDefaults::Pairs(vec![(
                "city".to_owned(),
                "riyadh".to_owned(),
            )]))
        })
        .build()
        .unwrap();

    client
        .get::<serde_json::Value>(
            "/search",
            RequestOptions::new()
                .use_query_defaults()
                .param("page", 2)
                .param_opt("q", None::<String>),
        )
        .await;

    mock.assert_async().await;
}

#[tokio::test]
async fn error_toast_respects_silent_and_override() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/broken")
        .with_status(500)
        .with_body(r#"{"data":null,"message":"boom"}"#)
        .expect_at_least(2)
        .create_async()
        .await;

    let hooks = RecordingHooks::default();
    let client = HttpClient::builder(server.url())
        .hooks(hooks.clone())
        .build()
        .unwrap();

    client
        .get::<serde_json::Value>("/broken", RequestOptions::new().silent())
        .await;
    assert!(hooks.notifications().is_empty());

    client
        .get::<serde_json::Value>(
            "/broken",
            RequestOptions::new().error_message("Could not load listings"),
        )
        .await;
    assert_eq!(
        hooks.notifications(),
        vec![("Could not load listings".to_owned(), NotifyKind::Error)]
    );
}

#[tokio::test]
async fn success_toast_is_opt_in() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/listings")
        .with_status(201)
        .with_body(r#"{"data":{"id":9},"message":"Listing created"}"#)
        .expect_at_least(2)
        .create_async()
        .await;

    let hooks = RecordingHooks::default();
    let client = HttpClient::builder(server.url())
        .hooks(hooks.clone())
        .build()
        .unwrap();

    let body = RequestBody::json(&serde_json::json!({"title": "villa"})).unwrap();

    client
        .post::<Listing>("/listings", Some(body.clone()), RequestOptions::new())
        .await;
    assert!(hooks.notifications().is_empty());

    client
        .post::<Listing>(
            "/listings",
            Some(body),
            RequestOptions::new().success_toast(),
        )
        .await;
    assert_eq!(
        hooks.notifications(),
        vec![("Listing created".to_owned(), NotifyKind::Success)]
    );
}

#[tokio::test]
async fn json_bodies_are_sent_with_json_content_type() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/listings")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(serde_json::json!({"title": "villa"})))
        .with_status(201)
        .with_body(r#"{"data":{"id":9}}"#)
        .create_async()
        .await;

    let resp = client_for(&server)
        .post::<Listing>(
            "/listings",
            Some(RequestBody::json(&serde_json::json!({"title": "villa"})).unwrap()),
            RequestOptions::new(),
        )
        .await;

    mock.assert_async().await;
    assert_eq!(resp.data, Some(Listing { id: 9 }));
}

#[tokio::test]
async fn lifecycle_hooks_fire_on_both_outcomes() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/ok")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;
    let _mock = server
        .mock("GET", "/bad")
        .with_status(500)
        .with_body("{}")
        .create_async()
        .await;

    let hooks = RecordingHooks::default();
    let client = HttpClient::builder(server.url())
        .hooks(hooks.clone())
        .build()
        .unwrap();

    client
        .get::<serde_json::Value>("/ok", RequestOptions::new())
        .await;
    client
        .get::<serde_json::Value>("/bad", RequestOptions::new())
        .await;

    use std::sync::atomic::Ordering;
    assert_eq!(hooks.state.started.load(Ordering::SeqCst), 2);
    assert_eq!(hooks.state.ended.load(Ordering::SeqCst), 2);
    assert_eq!(hooks.state.successes.load(Ordering::SeqCst), 1);
    assert_eq!(hooks.state.errors.lock().unwrap().len(), 1);
}

#[test]
fn empty_base_url_fails_at_construction() {
    let err = HttpClient::builder("").build().unwrap_err();
    assert!(matches!(
        err,
        realty_client::Error::Configuration { .. }
    ));
}
