//! Integration tests for the pet server
//!
//! These drive the full axum router over the in-memory store.

mod helpers;

use axum::http::{Method, StatusCode};
use serde_json::json;

use fixtures::*;
use helpers::*;

#[tokio::test]
async fn test_create_returns_expanded_pet() {
    let router = create_test_router(2);

    let (status, pet) = send(&router, Method::POST, "/api/pets", Some(dog_body())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(pet["id"], 1);
    assert_eq!(pet["name"], "Rex");
    assert_eq!(pet["sex"], "Female");
    assert_eq!(pet["group"]["scientific_name"], "Canis familiaris");
    assert!(pet["group"]["created_at"].is_string());
    assert_eq!(trait_names(&pet), vec!["friendly", "loud"]);
}

#[tokio::test]
async fn test_existing_group_reused_in_any_case() {
    let router = create_test_router(10);

    let (_, first) = send(&router, Method::POST, "/api/pets", Some(pet_body("Rex", "Canis familiaris", &[]))).await;
    let (_, second) = send(&router, Method::POST, "/api/pets", Some(pet_body("Fido", "CANIS FAMILIARIS", &[]))).await;

    assert_eq!(first["group"]["id"], second["group"]["id"]);
    assert_eq!(second["group"]["scientific_name"], "Canis familiaris");
}

#[tokio::test]
async fn test_new_trait_reused_case_insensitively() {
    let router = create_test_router(10);

    let (_, first) = send(&router, Method::POST, "/api/pets", Some(pet_body("Rex", "Canis", &["Playful"]))).await;
    let (_, second) = send(&router, Method::POST, "/api/pets", Some(pet_body("Tom", "Felis", &["playful", "PLAYFUL"]))).await;

    assert_eq!(first["traits"][0]["id"], second["traits"][0]["id"]);
    assert_eq!(second["traits"].as_array().unwrap().len(), 1);
    assert_eq!(second["traits"][0]["name"], "Playful");
}

#[tokio::test]
async fn test_create_validation_error_body() {
    let router = create_test_router(2);

    let (status, body) = send(&router, Method::POST, "/api/pets", Some(json!({"name": "", "age": "x"}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Invalid input.");
    assert_eq!(body["errors"]["name"][0], "This field may not be blank.");
    assert_eq!(body["errors"]["age"][0], "A valid integer is required.");
    assert_eq!(body["errors"]["weight"][0], "This field is required.");
    assert_eq!(body["errors"]["group"][0], "This field is required.");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let router = create_test_router(2);

    let (status, body) = send(&router, Method::POST, "/api/pets", Some(json!([1, 2, 3]))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("JSON object"));
}

#[tokio::test]
async fn test_age_only_patch_leaves_everything_else() {
    let router = create_test_router(2);
    let id = create_pet(&router, dog_body()).await;
    let (_, before) = send(&router, Method::GET, &format!("/api/pets/{id}"), None).await;

    let (status, after) = send(&router, Method::PATCH, &format!("/api/pets/{id}"), Some(json!({"age": 5}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(after["age"], 5);
    for field in ["name", "weight", "sex", "group", "traits"] {
        assert_eq!(after[field], before[field], "field {field} changed");
    }
}

#[tokio::test]
async fn test_traits_patch_fully_replaces() {
    let router = create_test_router(2);
    let id = create_pet(&router, dog_body()).await;

    let (status, pet) = send(
        &router,
        Method::PATCH,
        &format!("/api/pets/{id}"),
        Some(json!({"traits": [{"name": "calm"}, {"name": "LOUD"}]})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(trait_names(&pet), vec!["calm", "loud"]);

    let (_, cleared) = send(&router, Method::PATCH, &format!("/api/pets/{id}"), Some(json!({"traits": []}))).await;
    assert!(cleared["traits"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_group_patch_reconciles() {
    let router = create_test_router(2);
    let id = create_pet(&router, dog_body()).await;
    create_pet(&router, pet_body("Tom", "Felis catus", &[])).await;

    let (_, pet) = send(
        &router,
        Method::PATCH,
        &format!("/api/pets/{id}"),
        Some(json!({"group": {"scientific_name": "felis CATUS"}, "name": "Rexy"})),
    )
    .await;

    assert_eq!(pet["group"]["scientific_name"], "Felis catus");
    assert_eq!(pet["group"]["id"], 2);
    assert_eq!(pet["name"], "Rexy");
}

#[tokio::test]
async fn test_patch_unknown_pet_is_not_found_even_with_bad_body() {
    let router = create_test_router(2);

    let (status, body) = send(&router, Method::PATCH, "/api/pets/99", Some(json!({"age": -4}))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Not found.");
}

#[tokio::test]
async fn test_delete_then_retrieve_is_not_found() {
    let router = create_test_router(2);
    let id = create_pet(&router, dog_body()).await;

    let (status, body) = send(&router, Method::DELETE, &format!("/api/pets/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, body) = send(&router, Method::GET, &format!("/api/pets/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Not found.");

    let (status, _) = send(&router, Method::DELETE, &format!("/api/pets/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_keeps_group_and_traits() {
    let router = create_test_router(2);
    let id = create_pet(&router, dog_body()).await;
    send(&router, Method::DELETE, &format!("/api/pets/{id}"), None).await;

    let (_, pet) = send(&router, Method::POST, "/api/pets", Some(dog_body())).await;
    assert_eq!(pet["group"]["id"], 1);
    assert_eq!(pet["traits"][0]["id"], 1);
}

#[tokio::test]
async fn test_non_numeric_id_is_not_found() {
    let router = create_test_router(2);

    let (status, _) = send(&router, Method::GET, "/api/pets/rex", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_pagination_of_five_pets() {
    let router = create_test_router(2);
    for i in 0..5 {
        create_pet(&router, pet_body(&format!("pet-{i}"), "Canis", &[])).await;
    }

    let (status, first) = send(&router, Method::GET, "/api/pets", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["count"], 5);
    assert_eq!(first["results"].as_array().unwrap().len(), 2);
    assert_eq!(first["next"], "/api/pets?page=2");
    assert!(first["previous"].is_null());

    let (_, second) = send(&router, Method::GET, "/api/pets?page=2", None).await;
    assert_eq!(second["previous"], "/api/pets");
    assert_eq!(second["next"], "/api/pets?page=3");

    let (_, last) = send(&router, Method::GET, "/api/pets?page=3", None).await;
    let results = last["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["name"], "pet-4");
    assert!(last["next"].is_null());
    assert_eq!(last["previous"], "/api/pets?page=2");

    let (_, by_alias) = send(&router, Method::GET, "/api/pets?page=last", None).await;
    assert_eq!(by_alias, last);
}

#[tokio::test]
async fn test_page_out_of_range_is_invalid() {
    let router = create_test_router(2);
    create_pet(&router, dog_body()).await;

    let (status, body) = send(&router, Method::GET, "/api/pets?page=2", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Invalid page.");
}

#[tokio::test]
async fn test_empty_store_first_page_is_valid() {
    let router = create_test_router(2);

    let (status, page) = send(&router, Method::GET, "/api/pets", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["count"], 0);
    assert!(page["results"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_trait_filter() {
    let router = create_test_router(2);
    create_pet(&router, pet_body("Rex", "Canis", &["calm"])).await;
    create_pet(&router, pet_body("Tom", "Felis", &["loud"])).await;
    create_pet(&router, pet_body("Kit", "Felis", &["Calm", "loud"])).await;
    create_pet(&router, pet_body("Bo", "Canis", &["calm"])).await;

    let (_, page) = send(&router, Method::GET, "/api/pets?trait=CALM", None).await;
    assert_eq!(page["count"], 3);
    let names: Vec<&str> = page["results"].as_array().unwrap().iter().map(|p| p["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Rex", "Kit"]);
    assert_eq!(page["next"], "/api/pets?trait=CALM&page=2");
}

#[tokio::test]
async fn test_trait_filter_ignores_surrounding_whitespace() {
    let router = create_test_router(2);
    create_pet(&router, pet_body("Rex", "Canis", &["calm"])).await;
    create_pet(&router, pet_body("Tom", "Felis", &["loud"])).await;

    let (_, page) = send(&router, Method::GET, "/api/pets?trait=%20calm%20", None).await;
    assert_eq!(page["count"], 1);
    assert_eq!(page["results"][0]["name"], "Rex");

    let (_, page) = send(&router, Method::GET, "/api/pets?trait=%20%20", None).await;
    assert_eq!(page["count"], 2);
}

#[tokio::test]
async fn test_nonexistent_trait_filter_is_empty_page() {
    let router = create_test_router(2);
    create_pet(&router, dog_body()).await;

    let (status, page) = send(&router, Method::GET, "/api/pets?trait=nonexistent", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["count"], 0);
    assert!(page["results"].as_array().unwrap().is_empty());
    assert!(page["next"].is_null());
}

#[tokio::test]
async fn test_repeated_page_parameter_is_bad_request() {
    let router = create_test_router(2);
    create_pet(&router, dog_body()).await;

    let (status, body) = send(&router, Method::GET, "/api/pets?page=1&page=2", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("page"));
}

#[tokio::test]
async fn test_health_reports_store_counts() {
    let router = create_test_router(2);
    create_pet(&router, dog_body()).await;
    create_pet(&router, pet_body("Fido", "CANIS FAMILIARIS", &["Friendly", "calm"])).await;

    let (status, body) = send(&router, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["pets"], 2);
    assert_eq!(body["groups"], 1);
    assert_eq!(body["traits"], 3);
}
