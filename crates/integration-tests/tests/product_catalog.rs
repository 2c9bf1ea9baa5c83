//! Integration tests for product catalog CRUD over HTTP.

use axum::http::StatusCode;
use serde_json::{Value, json};

use toko_integration_tests::TestApp;

fn pen() -> Value {
    json!({
        "name": "Pen",
        "description": "Blue",
        "price": 1.5,
        "image_url": "http://x/p.png"
    })
}

async fn create(app: &TestApp, body: &Value) -> Value {
    let response = app.post("/products", body).await;
    assert_eq!(response.status, StatusCode::CREATED);
    response.json()
}

#[tokio::test]
async fn test_empty_catalog() {
    let app = TestApp::new();
    let response = app.get("/products").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!([]));
}

#[tokio::test]
async fn test_create_get_update_delete_scenario() {
    let app = TestApp::new();

    let created = create(&app, &pen()).await;
    let id = created["id"].as_i64().expect("numeric id");
    assert_eq!(created["name"], "Pen");
    assert_eq!(created["description"], "Blue");
    assert_eq!(created["price"], 1.5);
    assert_eq!(created["image_url"], "http://x/p.png");

    let fetched = app.get(&format!("/products/{id}")).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.json(), created);

    let mut changed = pen();
    changed["price"] = json!(2.0);
    let updated = app.put(&format!("/products/{id}"), &changed).await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.json()["id"], id);

    let fetched = app.get(&format!("/products/{id}")).await.json();
    assert_eq!(fetched["price"], 2.0);
    assert_eq!(fetched["name"], "Pen");

    let deleted = app.delete(&format!("/products/{id}")).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    assert!(deleted.body.is_empty());

    let gone = app.get(&format!("/products/{id}")).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    assert_eq!(gone.json()["error"], "Product not found");

    let again = app.delete(&format!("/products/{id}")).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_ids_are_assigned_in_increasing_order() {
    let app = TestApp::new();
    let first = create(&app, &pen()).await["id"].as_i64().expect("id");
    let second = create(&app, &pen()).await["id"].as_i64().expect("id");
    assert!(second > first);

    let listed = app.get("/products").await.json();
    let ids: Vec<i64> = listed
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|p| p["id"].as_i64())
        .collect();
    assert_eq!(ids, vec![first, second]);
}

#[tokio::test]
async fn test_price_accepts_string_decimal() {
    let app = TestApp::new();
    let mut body = pen();
    body["price"] = json!("4.5");

    let created = create(&app, &body).await;
    assert_eq!(created["price"], 4.5);
}

#[tokio::test]
async fn test_negative_price_is_rejected() {
    let app = TestApp::new();
    let mut body = pen();
    body["price"] = json!(-1);

    let response = app.post("/products", &body).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.get("/products").await.json(), json!([]));
}

#[tokio::test]
async fn test_missing_fields_are_rejected() {
    let app = TestApp::new();
    let response = app.post("/products", &json!({"name": "Pen"})).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.json()["error"].is_string());
}

#[tokio::test]
async fn test_partial_update_is_rejected_and_changes_nothing() {
    let app = TestApp::new();
    let created = create(&app, &pen()).await;
    let id = created["id"].as_i64().expect("id");

    let response = app
        .put(&format!("/products/{id}"), &json!({"price": 9}))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let fetched = app.get(&format!("/products/{id}")).await.json();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_update_missing_product_is_not_found() {
    let app = TestApp::new();

    let response = app.put("/products/999", &pen()).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(app.get("/products").await.json(), json!([]));
}

#[tokio::test]
async fn test_non_numeric_id_is_not_found() {
    let app = TestApp::new();

    assert_eq!(app.get("/products/abc").await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.delete("/products/abc").await.status, StatusCode::NOT_FOUND);
    assert_eq!(
        app.put("/products/abc", &pen()).await.status,
        StatusCode::NOT_FOUND
    );
}
