//! Authorization flow integration tests
//!
//! Drives the full application router with tokens signed by local test keys
//! and a wiremock JWKS endpoint standing in for the issuer.

mod common;

use axum::http::{Method, StatusCode};
use coffeeshop_auth::testutil::{
    claims, primary_token, sign_token, PRIMARY_E, PRIMARY_KID, PRIMARY_N, PRIMARY_PRIVATE_PEM,
    ROGUE_E, ROGUE_KID, ROGUE_N, ROGUE_PRIVATE_PEM,
};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::json;

use crate::common::{assert_failure, jwks_failure, jwks_mock, TestApp};

const PRIMARY: (&str, &str, &str) = (PRIMARY_KID, PRIMARY_N, PRIMARY_E);
const ROGUE: (&str, &str, &str) = (ROGUE_KID, ROGUE_N, ROGUE_E);

async fn app_with_primary_key() -> TestApp {
    TestApp::with_mocks(vec![jwks_mock(&[PRIMARY]).expect(1)]).await
}

mod test_token_extraction {
    use super::*;

    #[tokio::test]
    async fn test_missing_header_never_reaches_handler() {
        let app = app_with_primary_key().await;
        let payload = json!({
            "title": "mocha",
            "recipe": {"name": "chocolate", "color": "brown", "parts": 1}
        });

        let (status, body) = app.send(Method::POST, "/drinks", None, Some(payload)).await;
        assert_failure(
            status,
            &body,
            StatusCode::UNAUTHORIZED,
            "authorization_header_missing",
        );

        // The handler did not run: the menu is unchanged
        let (status, body) = app.send(Method::GET, "/drinks", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["drinks"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_headers_are_invalid_header() {
        let app = app_with_primary_key().await;

        for value in [
            "Basic xyz",
            "Bearer",
            "Bearer a b",
            "bearer-token",
            "Bearer abc.def.ghi",
            "Bearer not-a-jwt",
        ] {
            let (status, body) = app
                .send(Method::GET, "/drinks-detail", Some(value), None)
                .await;
            assert_failure(status, &body, StatusCode::UNAUTHORIZED, "invalid_header");
        }
    }
}

mod test_token_verification {
    use super::*;

    #[tokio::test]
    async fn test_expired_token() {
        let app = app_with_primary_key().await;
        let token = sign_token(
            PRIMARY_KID,
            PRIMARY_PRIVATE_PEM,
            &claims(Some(&["get:drinks-detail"]), -120),
        );

        let (status, body) = app
            .send_with_token(Method::GET, "/drinks-detail", &token, None)
            .await;
        assert_failure(status, &body, StatusCode::UNAUTHORIZED, "token_expired");
    }

    #[tokio::test]
    async fn test_wrong_audience() {
        let app = app_with_primary_key().await;
        let mut payload = claims(Some(&["get:drinks-detail"]), 3600);
        payload["aud"] = json!("tea-shop");
        let token = sign_token(PRIMARY_KID, PRIMARY_PRIVATE_PEM, &payload);

        let (status, body) = app
            .send_with_token(Method::GET, "/drinks-detail", &token, None)
            .await;
        assert_failure(status, &body, StatusCode::UNAUTHORIZED, "invalid_claims");
    }

    #[tokio::test]
    async fn test_wrong_issuer() {
        let app = app_with_primary_key().await;
        let mut payload = claims(Some(&["get:drinks-detail"]), 3600);
        payload["iss"] = json!("https://impostor.test.local/");
        let token = sign_token(PRIMARY_KID, PRIMARY_PRIVATE_PEM, &payload);

        let (status, body) = app
            .send_with_token(Method::GET, "/drinks-detail", &token, None)
            .await;
        assert_failure(status, &body, StatusCode::UNAUTHORIZED, "invalid_claims");
    }

    #[tokio::test]
    async fn test_signature_from_wrong_key() {
        let app = app_with_primary_key().await;
        // Published kid, but signed with a key the issuer never published
        let token = sign_token(
            PRIMARY_KID,
            ROGUE_PRIVATE_PEM,
            &claims(Some(&["get:drinks-detail"]), 3600),
        );

        let (status, body) = app
            .send_with_token(Method::GET, "/drinks-detail", &token, None)
            .await;
        assert_failure(status, &body, StatusCode::UNAUTHORIZED, "invalid_signature");
    }

    #[tokio::test]
    async fn test_symmetric_algorithm_rejected() {
        let app = app_with_primary_key().await;
        let mut header = Header::new(Algorithm::HS256);
        header.kid = Some(PRIMARY_KID.to_string());
        let token = jsonwebtoken::encode(
            &header,
            &claims(Some(&["get:drinks-detail"]), 3600),
            &EncodingKey::from_secret(b"shared-secret"),
        )
        .unwrap();

        let (status, body) = app
            .send_with_token(Method::GET, "/drinks-detail", &token, None)
            .await;
        assert_failure(status, &body, StatusCode::UNAUTHORIZED, "invalid_header");
    }

    #[test_log::test(tokio::test)]
    async fn test_unknown_kid_refreshes_exactly_once() {
        // One fetch at startup, one forced refresh for the unknown kid
        let app = TestApp::with_mocks(vec![jwks_mock(&[PRIMARY]).expect(2)]).await;
        let token = sign_token(
            ROGUE_KID,
            ROGUE_PRIVATE_PEM,
            &claims(Some(&["get:drinks-detail"]), 3600),
        );

        let (status, body) = app
            .send_with_token(Method::GET, "/drinks-detail", &token, None)
            .await;
        assert_failure(status, &body, StatusCode::UNAUTHORIZED, "invalid_header");
    }

    #[tokio::test]
    async fn test_key_rotation_picked_up_on_refresh() {
        let app = TestApp::with_mocks(vec![
            jwks_mock(&[PRIMARY]).up_to_n_times(1).expect(1),
            jwks_mock(&[PRIMARY, ROGUE]).expect(1),
        ])
        .await;

        let rotated = sign_token(
            ROGUE_KID,
            ROGUE_PRIVATE_PEM,
            &claims(Some(&["get:drinks-detail"]), 3600),
        );
        let (status, body) = app
            .send_with_token(Method::GET, "/drinks-detail", &rotated, None)
            .await;
        assert_eq!(status, StatusCode::OK, "body: {}", body);

        // The refreshed set still carries the primary key, no further fetch
        let token = primary_token(Some(&["get:drinks-detail"]));
        let (status, _) = app
            .send_with_token(Method::GET, "/drinks-detail", &token, None)
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_key_set_outage_is_server_error() {
        // Startup fetch and the request-time retry both fail
        let app = TestApp::with_mocks(vec![jwks_failure(503).expect(2)]).await;
        let token = primary_token(Some(&["get:drinks-detail"]));

        let (status, body) = app
            .send_with_token(Method::GET, "/drinks-detail", &token, None)
            .await;
        assert_failure(
            status,
            &body,
            StatusCode::INTERNAL_SERVER_ERROR,
            "key_set_unavailable",
        );

        // The public menu does not depend on the key set
        let (status, _) = app.send(Method::GET, "/drinks", None, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_same_token_verifies_identically() {
        let app = app_with_primary_key().await;
        let token = primary_token(Some(&["get:drinks-detail"]));

        let first = app
            .send_with_token(Method::GET, "/drinks-detail", &token, None)
            .await;
        let second = app
            .send_with_token(Method::GET, "/drinks-detail", &token, None)
            .await;

        assert_eq!(first.0, StatusCode::OK);
        assert_eq!(first, second);
    }
}

mod test_permissions {
    use super::*;

    #[tokio::test]
    async fn test_permissions_claim_absent() {
        let app = app_with_primary_key().await;
        let token = primary_token(None);

        let (status, body) = app
            .send_with_token(Method::GET, "/drinks-detail", &token, None)
            .await;
        assert_failure(status, &body, StatusCode::BAD_REQUEST, "invalid_claims");
        assert_eq!(body["message"], "Permissions not included in JWT.");
    }

    #[tokio::test]
    async fn test_missing_permission_is_forbidden() {
        let app = app_with_primary_key().await;
        let token = primary_token(Some(&["get:drinks-detail"]));

        let (status, body) = app
            .send_with_token(Method::DELETE, "/drinks/1", &token, None)
            .await;
        assert_failure(status, &body, StatusCode::FORBIDDEN, "unauthorized");

        // Nothing was deleted
        let (_, body) = app.send(Method::GET, "/drinks", None, None).await;
        assert_eq!(body["drinks"][0]["id"], 1);
    }

    #[tokio::test]
    async fn test_each_route_checks_its_own_permission() {
        let app = app_with_primary_key().await;
        let token = primary_token(Some(&["post:drinks"]));

        let (status, _) = app
            .send_with_token(Method::GET, "/drinks-detail", &token, None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = app
            .send_with_token(
                Method::PATCH,
                "/drinks/1",
                &token,
                Some(json!({"title": "sparkling water"})),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
