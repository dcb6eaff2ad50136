//! Service-account token exchange against a mock token endpoint.

use std::time::Duration;

use calgate_google::{RemoteErrorCode, ServiceAccountKey, TokenSource};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PRIVATE_KEY: &str = include_str!("fixtures/service_account_key.pem");
const PUBLIC_KEY: &str = include_str!("fixtures/service_account_key.pub.pem");

fn key_for(token_uri: &str) -> ServiceAccountKey {
    ServiceAccountKey {
        key_type: "service_account".into(),
        project_id: "calgate-test".into(),
        private_key_id: "key-1".into(),
        private_key: PRIVATE_KEY.into(),
        client_email: "svc@calgate-test.iam.gserviceaccount.com".into(),
        token_uri: token_uri.into(),
        scopes: vec![
            "https://www.googleapis.com/auth/calendar".into(),
            "https://www.googleapis.com/auth/calendar.events".into(),
        ],
        ..ServiceAccountKey::default()
    }
}

#[derive(Debug, Deserialize)]
struct Claims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
    sub: Option<String>,
}

fn decode(assertion: &str, audience: &str) -> (jsonwebtoken::Header, Claims) {
    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_audience(&[audience]);
    let key = DecodingKey::from_rsa_pem(PUBLIC_KEY.as_bytes()).unwrap();
    let data = jsonwebtoken::decode::<Claims>(assertion, &key, &validation).unwrap();
    (data.header, data.claims)
}

#[test]
fn assertion_claims() {
    let token_uri = "https://oauth2.example.test/token";
    let source = TokenSource::new(
        key_for(token_uri),
        Some("calendar-admin@example.com".into()),
        Duration::from_secs(5),
    )
    .unwrap();

    let (header, claims) = decode(&source.assertion().unwrap(), token_uri);
    assert_eq!(header.alg, Algorithm::RS256);
    assert_eq!(header.kid.as_deref(), Some("key-1"));
    assert_eq!(claims.iss, "svc@calgate-test.iam.gserviceaccount.com");
    assert_eq!(
        claims.scope,
        "https://www.googleapis.com/auth/calendar https://www.googleapis.com/auth/calendar.events"
    );
    assert_eq!(claims.aud, token_uri);
    assert_eq!(claims.exp - claims.iat, 3600);
    assert_eq!(claims.sub.as_deref(), Some("calendar-admin@example.com"));
}

#[test]
fn assertion_without_subject() {
    let token_uri = "https://oauth2.example.test/token";
    let source = TokenSource::new(key_for(token_uri), None, Duration::from_secs(5)).unwrap();

    let (_, claims) = decode(&source.assertion().unwrap(), token_uri);
    assert!(claims.sub.is_none());
}

#[tokio::test]
async fn exchanges_and_caches_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains(
            "grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer",
        ))
        .and(body_string_contains("assertion="))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "ya29.test-token",
            "expires_in": 3599,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let token_uri = format!("{}/token", server.uri());
    let source = TokenSource::new(key_for(&token_uri), None, Duration::from_secs(5)).unwrap();

    assert_eq!(source.access_token().await.unwrap(), "ya29.test-token");
    // Second call is served from the cache.
    assert_eq!(source.access_token().await.unwrap(), "ya29.test-token");
}

#[tokio::test]
async fn rejected_exchange_is_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(
            ResponseTemplate::new(400).set_body_string(r#"{"error":"invalid_grant"}"#),
        )
        .mount(&server)
        .await;

    let token_uri = format!("{}/token", server.uri());
    let source = TokenSource::new(key_for(&token_uri), None, Duration::from_secs(5)).unwrap();

    let err = source.access_token().await.unwrap_err();
    assert_eq!(err.code(), RemoteErrorCode::AuthenticationFailed);
    assert_eq!(err.status(), Some(400));
    assert!(err.message().contains("invalid_grant"));
}

#[tokio::test]
async fn malformed_token_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let token_uri = format!("{}/token", server.uri());
    let source = TokenSource::new(key_for(&token_uri), None, Duration::from_secs(5)).unwrap();

    let err = source.access_token().await.unwrap_err();
    assert_eq!(err.code(), RemoteErrorCode::InvalidResponse);
}
