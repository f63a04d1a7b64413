mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn health_reports_ok() -> Result<()> {
    let server = common::TestServer::start().await?;

    let res = reqwest::get(server.url("/api/health")).await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(
        res.headers()["content-type"].to_str()?.starts_with("application/json"),
        "unexpected content type"
    );
    assert_eq!(res.json::<Value>().await?, json!({"status": "ok"}));

    Ok(())
}

#[tokio::test]
async fn unknown_routes_are_json_404() -> Result<()> {
    let server = common::TestServer::start().await?;

    for path in ["/", "/api/orders", "/api/products/1/reviews"] {
        let res = reqwest::get(server.url(path)).await?;
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "path {}", path);
        assert_eq!(res.json::<Value>().await?, json!({"error": "endpoint not found"}));
    }

    Ok(())
}

#[tokio::test]
async fn binary_seeds_memory_store_on_startup() -> Result<()> {
    let server = common::TestServer::start().await?;

    let categories: Value = reqwest::get(server.url("/api/categories")).await?.json().await?;
    assert_eq!(categories.as_array().map(Vec::len), Some(10));

    let products: Value = reqwest::get(server.url("/api/products")).await?.json().await?;
    assert_eq!(products["total"], 8);

    Ok(())
}
