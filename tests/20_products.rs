mod common;

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use serde_json::{json, Value};

fn names(body: &Value) -> Vec<String> {
    body["products"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|p| p["name"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

fn ids(body: &Value) -> Vec<String> {
    body["products"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|p| p["id"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

fn seed_id(n: u8) -> String {
    format!("5f1d7c6a9b0e4a8c9d2e3f4a5b6c7d{:02}", n)
}

#[tokio::test]
async fn default_listing_returns_first_page_and_total() -> Result<()> {
    let app = common::test_app().await?;

    let (status, body) = common::get(&app, "/api/products").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 8);
    assert_eq!(ids(&body).len(), 8);
    assert_eq!(ids(&body)[0], seed_id(1));

    Ok(())
}

#[tokio::test]
async fn page_arithmetic_and_explicit_offset() -> Result<()> {
    let app = common::test_app().await?;

    let (_, body) = common::get(&app, "/api/products?page=2&page_size=5").await?;
    assert_eq!(body["total"], 8);
    assert_eq!(ids(&body), vec![seed_id(6), seed_id(7), seed_id(8)]);

    // _start wins over page
    let (_, body) = common::get(&app, "/api/products?page=2&page_size=2&_start=3").await?;
    assert_eq!(ids(&body), vec![seed_id(4), seed_id(5)]);

    let (_, body) = common::get(&app, "/api/products?_start=1&_limit=3").await?;
    assert_eq!(ids(&body), vec![seed_id(2), seed_id(3), seed_id(4)]);
    assert_eq!(body["total"], 8);

    // invalid numbers fall back to defaults
    let (status, body) = common::get(&app, "/api/products?page=-1&page_size=abc&_start=-4&_limit=0").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body).len(), 8);

    Ok(())
}

#[tokio::test]
async fn filters_are_conjunctive_and_total_ignores_limit() -> Result<()> {
    let app = common::test_app().await?;

    let (_, body) = common::get(&app, "/api/products?category_group=Electronics&page_size=1").await?;
    assert_eq!(body["total"], 3);
    assert_eq!(ids(&body).len(), 1);

    let (_, body) = common::get(&app, "/api/products?category_id=2&category_group=Electronics").await?;
    assert_eq!(body["total"], 2);
    assert_eq!(names(&body), vec!["Pixel 8", "iPhone 15"]);

    let (_, body) = common::get(&app, "/api/products?category_id=2&category_group=Clothing").await?;
    assert_eq!(body["total"], 0);
    assert_eq!(body["products"], json!([]));

    // empty values do not filter
    let (_, body) = common::get(&app, "/api/products?category_id=&category_group=").await?;
    assert_eq!(body["total"], 8);

    Ok(())
}

#[tokio::test]
async fn sorts_by_name_case_insensitively() -> Result<()> {
    let app = common::test_app().await?;

    let (status, body) = common::get(&app, "/api/products?_sort=name&_order=desc").await?;
    assert_eq!(status, StatusCode::OK);
    let desc = names(&body);
    assert_eq!(desc.len(), 8);
    assert!(
        desc.windows(2).all(|w| w[0].to_lowercase() >= w[1].to_lowercase()),
        "not descending: {:?}",
        desc
    );

    // sortField/sortOrder are fallbacks; anything but "desc" is ascending
    let (_, body) = common::get(&app, "/api/products?sortField=name&sortOrder=DESC").await?;
    let asc = names(&body);
    assert_eq!(asc.first().map(String::as_str), Some("Espresso Machine"));
    assert_eq!(asc.iter().rev().cloned().collect::<Vec<_>>(), desc);

    let (_, body) = common::get(&app, "/api/products?_sort=id&_order=desc&_limit=2").await?;
    assert_eq!(ids(&body), vec![seed_id(8), seed_id(7)]);

    Ok(())
}

#[tokio::test]
async fn invalid_sort_field_is_bad_request() -> Result<()> {
    let app = common::test_app().await?;

    let (status, body) = common::get(&app, "/api/products?_sort=name%20desc").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    Ok(())
}

#[tokio::test]
async fn create_then_fetch_round_trips_attributes() -> Result<()> {
    let app = common::test_app().await?;
    let payload = json!({
        "id": "ignored",
        "name": "Standing Desk",
        "category_id": "9",
        "category_group": "Home & Kitchen",
        "attributes": [
            {"code": "width_cm", "value": 140, "type": "number", "label": "Width"},
            {"code": "motorized", "value": true, "type": "boolean", "label": "Motorized"},
            {"code": "finish", "value": ["oak", "walnut"], "type": "tags", "label": "Finish"},
            {"code": "manual", "value": "https://example.com/desk.pdf", "type": "url", "label": "Manual"}
        ]
    });

    let (status, created) = common::send(&app, Method::POST, "/api/products", Some(payload.clone())).await?;
    assert_eq!(status, StatusCode::CREATED);

    let id = created["id"].as_str().unwrap_or_default().to_string();
    assert!(!id.is_empty());
    assert_ne!(id, "ignored");
    for field in ["name", "category_id", "category_group", "attributes"] {
        assert_eq!(created[field], payload[field], "field {}", field);
    }

    let (status, fetched) = common::get(&app, &format!("/api/products/{}", id)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (_, second) = common::send(&app, Method::POST, "/api/products", Some(payload)).await?;
    assert_ne!(second["id"], created["id"]);

    let (_, body) = common::get(&app, "/api/products?category_id=9").await?;
    assert_eq!(body["total"], 3);

    Ok(())
}

#[tokio::test]
async fn create_requires_name_and_category() -> Result<()> {
    let app = common::test_app().await?;

    let (status, body) = common::send(
        &app,
        Method::POST,
        "/api/products",
        Some(json!({"name": "Orphan", "category_id": ""})),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields");
    assert!(body["field_errors"]["category_id"].is_string());

    let (_, body) = common::get(&app, "/api/products").await?;
    assert_eq!(body["total"], 8);

    Ok(())
}

#[tokio::test]
async fn malformed_bodies_are_rejected() -> Result<()> {
    let app = common::test_app().await?;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/products")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))?;
    let (status, body) = common::send_request(&app, request).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid request body"}));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/products")
        .body(Body::from(r#"{"name":"Lamp","category_id":"8"}"#))?;
    let (status, body) = common::send_request(&app, request).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid request body"}));

    let (status, _) = common::send(&app, Method::POST, "/api/products", Some(json!({"name": 42}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn unknown_and_malformed_ids() -> Result<()> {
    let app = common::test_app().await?;

    let (status, body) = common::get(&app, "/api/products/doesnotexist").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Product not found"}));

    let (status, body) = common::get(&app, "/api/products/bad%20id").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid ID format"}));

    Ok(())
}

#[tokio::test]
async fn update_replaces_fields_using_path_id() -> Result<()> {
    let app = common::test_app().await?;
    let id = seed_id(1);
    let uri = format!("/api/products/{}", id);

    let replacement = json!({
        "id": "someone-else",
        "name": "Pixel 8 Pro",
        "category_id": "2",
        "category_group": "Electronics",
        "attributes": [{"code": "storage_gb", "value": 256, "type": "number", "label": "Storage (GB)"}]
    });
    let (status, body) = common::send(&app, Method::PUT, &uri, Some(replacement.clone())).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.as_str());
    assert_eq!(body["name"], "Pixel 8 Pro");

    let (_, fetched) = common::get(&app, &uri).await?;
    assert_eq!(fetched["id"], id.as_str());
    assert_eq!(fetched["attributes"], replacement["attributes"]);

    let (status, body) = common::send(&app, Method::PUT, "/api/products/nope", Some(replacement)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Product not found"}));

    let (status, _) = common::send(&app, Method::PUT, &uri, Some(json!({"category_id": "2"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, fetched) = common::get(&app, &uri).await?;
    assert_eq!(fetched["name"], "Pixel 8 Pro");

    Ok(())
}

#[tokio::test]
async fn repeated_query_keys_keep_the_first_value() -> Result<()> {
    let app = common::test_app().await?;

    let (status, body) = common::get(&app, "/api/products?category_id=2&category_id=9").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(names(&body), vec!["Pixel 8", "iPhone 15"]);

    let (status, body) = common::get(&app, "/api/products?page=1&page=2&page_size=5").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body)[0], seed_id(1));
    assert_eq!(ids(&body).len(), 5);

    Ok(())
}

#[tokio::test]
async fn unsupported_methods_get_json_405() -> Result<()> {
    let app = common::test_app().await?;

    let (status, body) = common::send(&app, Method::DELETE, "/api/products/x", None).await?;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, json!({"error": "method not allowed"}));

    let (status, body) = common::send(&app, Method::PATCH, "/api/products", Some(json!({}))).await?;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, json!({"error": "method not allowed"}));

    Ok(())
}
