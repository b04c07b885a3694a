use std::sync::Arc;

use brewstock_api::app::{router, services::in_memory_services};
use reqwest::StatusCode;
use serde_json::json;

const STOCK_API_URL_PATH: &str = "/api/v1/stock";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod over a fresh in-memory store, on an ephemeral port.
        let app = router(Arc::new(in_memory_services()));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn stock_url(&self, suffix: &str) -> String {
        format!("{}{}{}", self.base_url, STOCK_API_URL_PATH, suffix)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn brahma() -> serde_json::Value {
    json!({
        "name": "Brahma",
        "brand": "Ambev",
        "max": 50,
        "quantity": 10,
        "type": "LAGER",
    })
}

async fn create(client: &reqwest::Client, srv: &TestServer, body: serde_json::Value) -> reqwest::Response {
    client
        .post(srv.stock_url(""))
        .json(&body)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn health_is_public_and_ok() {
    let srv = TestServer::spawn().await;

    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn request_id_is_echoed() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", srv.base_url))
        .header("x-request-id", "abc-123")
        .send()
        .await
        .unwrap();

    assert_eq!(res.headers()["x-request-id"], "abc-123");
}

#[tokio::test]
async fn stock_lifecycle_create_find_increment_delete() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Create
    let res = create(&client, &srv, brahma()).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["name"], "Brahma");
    assert_eq!(created["brand"], "Ambev");
    assert_eq!(created["type"], "LAGER");
    assert_eq!(created["quantity"], 10);

    // Find by name
    let res = client.get(srv.stock_url("/Brahma")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let found: serde_json::Value = res.json().await.unwrap();
    assert_eq!(found, created);

    // Increment
    let res = client
        .patch(srv.stock_url(&format!("/{id}/increment")))
        .json(&json!({ "quantity": 10 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let incremented: serde_json::Value = res.json().await.unwrap();
    assert_eq!(incremented["quantity"], 20);

    // Delete
    let res = client
        .delete(srv.stock_url(&format!("/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client.get(srv.stock_url("/Brahma")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_name_is_bad_request_and_store_keeps_one() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    assert_eq!(create(&client, &srv, brahma()).await.status(), StatusCode::CREATED);

    let res = create(&client, &srv, brahma()).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "already_registered");

    let res = client.get(srv.stock_url("")).send().await.unwrap();
    let all: Vec<serde_json::Value> = res.json().await.unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn missing_required_field_is_bad_request() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let mut body = brahma();
    body.as_object_mut().unwrap().remove("brand");

    let res = create(&client, &srv, body).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let err: serde_json::Value = res.json().await.unwrap();
    assert_eq!(err["error"], "validation_error");
}

#[tokio::test]
async fn unknown_type_is_bad_request() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let mut body = brahma();
    body["type"] = json!("PILSNER");

    let res = create(&client, &srv, body).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_is_empty_then_holds_every_record() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.get(srv.stock_url("")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let all: Vec<serde_json::Value> = res.json().await.unwrap();
    assert!(all.is_empty());

    for (name, kind) in [("Brahma", "LAGER"), ("Colorado Indica", "IPA"), ("Guinness", "STOUT")] {
        let mut body = brahma();
        body["name"] = json!(name);
        body["type"] = json!(kind);
        assert_eq!(create(&client, &srv, body).await.status(), StatusCode::CREATED);
    }

    let all: Vec<serde_json::Value> = client
        .get(srv.stock_url(""))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[1]["type"], "IPA");
}

#[tokio::test]
async fn find_unknown_name_is_not_found() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.get(srv.stock_url("/Nonexistent")).send().await.unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "not_found");
    assert_eq!(body["message"], "Stock with name Nonexistent not found in the system.");
}

#[tokio::test]
async fn delete_unknown_id_is_not_found() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.delete(srv.stock_url("/99")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client.delete(srv.stock_url("/not-a-number")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn increment_boundary_is_inclusive() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let created: serde_json::Value = create(&client, &srv, brahma()).await.json().await.unwrap();
    let id = created["id"].as_i64().unwrap();
    let url = srv.stock_url(&format!("/{id}/increment"));

    // 10 + 41 == max + 1
    let res = client.patch(&url).json(&json!({ "quantity": 41 })).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "exceeded");

    // 10 + 40 == max
    let res = client.patch(&url).json(&json!({ "quantity": 40 })).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["quantity"], 50);
}

#[tokio::test]
async fn rejected_increment_leaves_quantity_unchanged() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let created: serde_json::Value = create(&client, &srv, brahma()).await.json().await.unwrap();
    let id = created["id"].as_i64().unwrap();

    let res = client
        .patch(srv.stock_url(&format!("/{id}/increment")))
        .json(&json!({ "quantity": 45 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let found: serde_json::Value = client
        .get(srv.stock_url("/Brahma"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(found["quantity"], 10);
}

#[tokio::test]
async fn increment_validates_input_and_id() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let created: serde_json::Value = create(&client, &srv, brahma()).await.json().await.unwrap();
    let id = created["id"].as_i64().unwrap();

    let res = client
        .patch(srv.stock_url(&format!("/{id}/increment")))
        .json(&json!({ "quantity": -1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .patch(srv.stock_url("/2/increment"))
        .json(&json!({ "quantity": 10 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blank_request_id_is_replaced_with_generated_one() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(srv.stock_url(""))
        .header("x-request-id", "   ")
        .send()
        .await
        .unwrap();

    let echoed = res.headers()["x-request-id"].to_str().unwrap().to_string();
    assert!(!echoed.trim().is_empty());
    assert!(uuid::Uuid::parse_str(&echoed).is_ok());
}
