//! Drink menu API integration tests
//!
//! Exercises the full CRUD lifecycle behind the permission guards.

mod common;

use axum::http::{Method, StatusCode};
use coffeeshop_auth::testutil::{primary_token, PRIMARY_E, PRIMARY_KID, PRIMARY_N};
use serde_json::json;

use crate::common::{assert_failure, jwks_mock, TestApp};

const MANAGER: &[&str] = &[
    "get:drinks-detail",
    "post:drinks",
    "patch:drinks",
    "delete:drinks",
];

const BARISTA: &[&str] = &["get:drinks-detail"];

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::with_mocks(vec![jwks_mock(&[(PRIMARY_KID, PRIMARY_N, PRIMARY_E)])]).await;
    let (status, _) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_manager_menu_lifecycle() {
    // The key set is fetched once at startup and served from cache afterwards
    let app = TestApp::with_mocks(vec![
        jwks_mock(&[(PRIMARY_KID, PRIMARY_N, PRIMARY_E)]).expect(1),
    ])
    .await;
    let manager = primary_token(Some(MANAGER));

    let (status, body) = app
        .send_with_token(
            Method::POST,
            "/drinks",
            &manager,
            Some(json!({
                "title": "cappuccino",
                "recipe": [
                    {"name": "espresso", "color": "brown", "parts": 1},
                    {"name": "steamed milk", "color": "white", "parts": 1},
                    {"name": "foam", "color": "ivory", "parts": 1}
                ]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert_eq!(body["success"], true);
    let id = body["drinks"][0]["id"].as_u64().unwrap();

    // Public short view hides ingredient names
    let (status, body) = app.send(Method::GET, "/drinks", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let drinks = body["drinks"].as_array().unwrap();
    assert_eq!(drinks.len(), 2);
    assert_eq!(drinks[1]["title"], "cappuccino");
    assert_eq!(drinks[1]["recipe"][2], json!({"color": "ivory", "parts": 1}));

    let (status, body) = app
        .send_with_token(
            Method::PATCH,
            &format!("/drinks/{}", id),
            &manager,
            Some(json!({"title": "dry cappuccino"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["drinks"][0]["title"], "dry cappuccino");
    assert_eq!(body["drinks"][0]["recipe"].as_array().unwrap().len(), 3);

    let (status, body) = app
        .send_with_token(Method::DELETE, &format!("/drinks/{}", id), &manager, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "delete": id}));

    let (status, body) = app
        .send_with_token(
            Method::PATCH,
            &format!("/drinks/{}", id),
            &manager,
            Some(json!({"title": "ghost"})),
        )
        .await;
    assert_failure(status, &body, StatusCode::NOT_FOUND, "not_found");
}

#[tokio::test]
async fn test_barista_reads_details_but_cannot_edit() {
    let app = TestApp::with_mocks(vec![jwks_mock(&[(PRIMARY_KID, PRIMARY_N, PRIMARY_E)])]).await;
    let barista = primary_token(Some(BARISTA));

    let (status, body) = app
        .send_with_token(Method::GET, "/drinks-detail", &barista, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["drinks"][0]["recipe"][0]["name"], "water");

    let (status, body) = app
        .send_with_token(
            Method::POST,
            "/drinks",
            &barista,
            Some(json!({
                "title": "latte",
                "recipe": {"name": "milk", "color": "white", "parts": 3}
            })),
        )
        .await;
    assert_failure(status, &body, StatusCode::FORBIDDEN, "unauthorized");
}

#[tokio::test]
async fn test_duplicate_title_is_unprocessable() {
    let app = TestApp::with_mocks(vec![jwks_mock(&[(PRIMARY_KID, PRIMARY_N, PRIMARY_E)])]).await;
    let manager = primary_token(Some(MANAGER));

    let (status, body) = app
        .send_with_token(
            Method::POST,
            "/drinks",
            &manager,
            Some(json!({
                "title": "water",
                "recipe": {"name": "water", "color": "blue", "parts": 1}
            })),
        )
        .await;
    assert_failure(status, &body, StatusCode::UNPROCESSABLE_ENTITY, "unprocessable");
}

#[tokio::test]
async fn test_invalid_recipe_is_bad_request() {
    let app = TestApp::with_mocks(vec![jwks_mock(&[(PRIMARY_KID, PRIMARY_N, PRIMARY_E)])]).await;
    let manager = primary_token(Some(MANAGER));

    let (status, body) = app
        .send_with_token(
            Method::POST,
            "/drinks",
            &manager,
            Some(json!({"title": "air", "recipe": []})),
        )
        .await;
    assert_failure(status, &body, StatusCode::BAD_REQUEST, "validation_error");
}
