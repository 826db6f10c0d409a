//! Common test utilities for integration tests
//!
//! Every test gets its own application wired to a wiremock JWKS endpoint,
//! so key rotation and outages can be staged per test.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use coffeeshop_auth::testutil::{jwks_document, TEST_AUDIENCE, TEST_DOMAIN};
use coffeeshop_common::Config;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

pub const JWKS_PATH: &str = "/.well-known/jwks.json";

/// Mock answering the JWKS endpoint with `keys`
pub fn jwks_mock(keys: &[(&str, &str, &str)]) -> Mock {
    Mock::given(method("GET"))
        .and(path(JWKS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(jwks_document(keys)))
}

/// Mock answering the JWKS endpoint with a bare status
pub fn jwks_failure(status: u16) -> Mock {
    Mock::given(method("GET"))
        .and(path(JWKS_PATH))
        .respond_with(ResponseTemplate::new(status))
}

pub fn test_config(jwks_server: &MockServer) -> Config {
    Config {
        auth0_domain: TEST_DOMAIN.to_string(),
        api_audience: TEST_AUDIENCE.to_string(),
        jwt_algorithm: "RS256".to_string(),
        jwks_url: Some(format!("{}{}", jwks_server.uri(), JWKS_PATH)),
        jwks_cache_ttl_secs: 600,
        jwks_fetch_timeout_secs: 1,
        jwt_leeway_secs: 0,
        rust_log: "coffeeshop=debug".to_string(),
        port: 0,
    }
}

/// Application under test together with its JWKS server
pub struct TestApp {
    pub router: Router,
    pub jwks: MockServer,
}

impl TestApp {
    /// Start an application after mounting `mocks` on a fresh JWKS server.
    ///
    /// Mocks are mounted in order; the earliest mounted match wins.
    pub async fn with_mocks(mocks: Vec<Mock>) -> Self {
        let jwks = MockServer::start().await;
        for mock in mocks {
            mock.mount(&jwks).await;
        }

        let router = coffeeshop_app::create_app(&test_config(&jwks))
            .await
            .expect("Failed to create application");

        Self { router, jwks }
    }

    /// Send a request and decode the JSON body
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        authorization: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    /// Send with `Authorization: Bearer <token>`
    pub async fn send_with_token(
        &self,
        method: Method,
        uri: &str,
        token: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let authorization = format!("Bearer {}", token);
        self.send(method, uri, Some(&authorization), body).await
    }
}

/// Assert the shared failure envelope
pub fn assert_failure(status: StatusCode, body: &Value, expected: StatusCode, code: &str) {
    assert_eq!(status, expected, "unexpected status, body: {}", body);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], expected.as_u16());
    assert_eq!(body["code"], code);
    assert!(body["message"].is_string());
}
