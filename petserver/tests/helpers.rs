//! Test helper utilities for pet server integration tests

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::Value;
use tower::ServiceExt;

use petserver::{InMemoryPetServer, ServerConfig};

/// Router over a fresh in-memory store with the given page size
pub fn create_test_router(page_size: usize) -> Router {
    let config = ServerConfig {
        page_size,
        ..ServerConfig::default()
    };
    InMemoryPetServer::in_memory(config).build_router()
}

/// Send one request and decode the JSON response (Null for empty bodies)
pub async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Create a pet and return its id, asserting success
pub async fn create_pet(router: &Router, body: Value) -> u64 {
    let (status, created) = send(router, Method::POST, "/api/pets", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {created}");
    created["id"].as_u64().unwrap()
}

/// Sorted trait names of a serialized pet
pub fn trait_names(pet: &Value) -> Vec<String> {
    let mut names: Vec<String> = pet["traits"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap().to_string())
        .collect();
    names.sort();
    names
}
