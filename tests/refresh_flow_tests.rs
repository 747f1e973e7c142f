mod common;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tokendokey::auth::{AuthError, RefreshFlow};

use common::{confidential_config, stub_config};

#[tokio::test]
async fn exchange_returns_the_new_pair() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=R1"))
        .and(body_string_contains("client_id=abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "A2",
            "refresh_token": "R2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let pair = RefreshFlow::new()
        .exchange(&stub_config(&server.uri()), "R1")
        .await
        .expect("exchange");

    assert_eq!(pair.access_token, "A2");
    assert_eq!(pair.refresh_token, "R2");
}

#[tokio::test]
async fn exchange_sends_client_secret_for_confidential_clients() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("client_secret=s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "A2",
            "refresh_token": "R2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    RefreshFlow::new()
        .exchange(&confidential_config(&server.uri()), "R1")
        .await
        .expect("exchange");
}

#[tokio::test]
async fn exchange_omits_client_secret_for_public_clients() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "A2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    RefreshFlow::new()
        .exchange(&stub_config(&server.uri()), "R1")
        .await
        .expect("exchange");

    let requests = server.received_requests().await.expect("requests");
    let body = String::from_utf8(requests[0].body.clone()).expect("utf8 body");
    assert!(!body.contains("client_secret"));
}

#[tokio::test]
async fn exchange_accepts_non_rotating_issuers() {
    // No refresh_token in the response: the issuer does not rotate.
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "A2"
        })))
        .mount(&server)
        .await;

    let pair = RefreshFlow::new()
        .exchange(&stub_config(&server.uri()), "R1")
        .await
        .expect("exchange");

    assert_eq!(pair.access_token, "A2");
    assert_eq!(pair.refresh_token, "");
}

#[tokio::test]
async fn exchange_http_400_is_an_issuer_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = RefreshFlow::new()
        .exchange(&stub_config(&server.uri()), "R1")
        .await;

    match result {
        Err(AuthError::Issuer { status, message }) => {
            assert_eq!(status, 400);
            assert!(message.contains("invalid_grant"));
        }
        other => panic!("expected Issuer error, got {other:?}"),
    }
}

#[tokio::test]
async fn exchange_200_without_access_token_is_an_issuer_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let result = RefreshFlow::new()
        .exchange(&stub_config(&server.uri()), "R1")
        .await;

    assert!(matches!(result, Err(AuthError::Issuer { status: 200, .. })));
}

#[tokio::test]
async fn exchange_200_with_empty_access_token_is_an_issuer_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": ""
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = RefreshFlow::new()
        .exchange(&stub_config(&server.uri()), "R1")
        .await;

    assert!(matches!(result, Err(AuthError::Issuer { .. })));
}
