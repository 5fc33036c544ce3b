//! Integration Tests for API Endpoints
//!
//! Drives the full router over an in-memory store, the in-process cache and
//! a fake image host.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use swift_cart::{
    cache::MemoryCache,
    create_router,
    images::{self, ImageHost, UploadedImage},
    store::InMemoryStore,
    AppState, Config,
};
use tower::ServiceExt;

const IMAGE: &str = "data:image/png;base64,aGVsbG8=";

// == Helper Functions ==

#[derive(Default)]
struct FakeImageHost {
    uploads: AtomicUsize,
}

#[async_trait]
impl ImageHost for FakeImageHost {
    async fn upload(&self, data_uri: &str, folder: &str) -> images::Result<UploadedImage> {
        images::parse_data_uri(data_uri)?;
        let n = self.uploads.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(UploadedImage {
            secure_url: format!("https://img.test/{}/{}.png", folder, n),
            public_id: format!("{}/{}", folder, n),
        })
    }

    async fn destroy(&self, _public_id: &str) -> images::Result<()> {
        Ok(())
    }
}

struct TestApp {
    router: Router,
    cache: MemoryCache,
}

fn create_test_app() -> TestApp {
    let cache = MemoryCache::new(100);
    let state = AppState::new(
        &Config::default(),
        Arc::new(cache.clone()),
        Arc::new(InMemoryStore::new()),
        Arc::new(FakeImageHost::default()),
    )
    .with_memory_cache(cache.clone());

    TestApp {
        router: create_router(state),
        cache,
    }
}

impl TestApp {
    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn create_category(&self, name: &str) -> String {
        let (status, json) = self
            .send(
                "POST",
                "/api/categories/create",
                Some(json!({ "name": name, "imageDataUri": IMAGE })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{json}");
        json["data"]["id"].as_str().unwrap().to_string()
    }

    async fn create_product(&self, name: &str, category_id: &str) -> Value {
        let (status, json) = self
            .send(
                "POST",
                "/api/products/create",
                Some(json!({
                    "name": name,
                    "description": "Classic cotton",
                    "categoryId": category_id,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{json}");
        json["data"].clone()
    }
}

// == Product Endpoint Tests ==

#[tokio::test]
async fn test_product_list_served_from_cache_on_second_read() {
    let app = create_test_app();
    let category_id = app.create_category("Shirts").await;
    app.create_product("White T-shirt", &category_id).await;

    let (status, first) = app.send("GET", "/api/products", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["success"], true);
    assert_eq!(first["source"], "database");
    assert_eq!(first["data"].as_array().unwrap().len(), 1);

    let (_, second) = app.send("GET", "/api/products", None).await;
    assert_eq!(second["source"], "cache");
    assert_eq!(second["data"], first["data"]);
}

#[tokio::test]
async fn test_product_get_populates_entity_key() {
    let app = create_test_app();
    let category_id = app.create_category("Shirts").await;
    let product = app.create_product("White T-shirt", &category_id).await;
    let id = product["id"].as_str().unwrap();

    let (status, json) = app.send("GET", &format!("/api/products/{id}"), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["source"], "database");
    assert_eq!(json["data"]["slug"], "white-t-shirt");
    assert!(app
        .cache
        .ttl_remaining(&format!("swift-cart:product:{id}"))
        .await
        .is_some());
}

#[tokio::test]
async fn test_product_not_found_envelope() {
    let app = create_test_app();

    let (status, json) = app.send("GET", "/api/products/missing", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
    assert!(json["data"].is_null());
    assert_eq!(json["error"], "Product not found");
    assert!(app.cache.is_empty().await);
}

#[tokio::test]
async fn test_product_create_missing_fields() {
    let app = create_test_app();

    let (status, json) = app
        .send(
            "POST",
            "/api/products/create",
            Some(json!({ "name": "White T-shirt" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("Missing required fields"));
}

#[tokio::test]
async fn test_product_create_unknown_category() {
    let app = create_test_app();

    let (status, json) = app
        .send(
            "POST",
            "/api/products/create",
            Some(json!({
                "name": "White T-shirt",
                "description": "Classic cotton",
                "categoryId": "missing",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_duplicate_names_get_numbered_slugs() {
    let app = create_test_app();
    let category_id = app.create_category("Shirts").await;

    let first = app.create_product("White T-shirt", &category_id).await;
    let second = app.create_product("White T-shirt", &category_id).await;

    assert_eq!(first["slug"], "white-t-shirt");
    assert_eq!(second["slug"], "white-t-shirt-1");
}

#[tokio::test]
async fn test_product_update_is_visible_on_next_read() {
    let app = create_test_app();
    let category_id = app.create_category("Shirts").await;
    let product = app.create_product("White T-shirt", &category_id).await;
    let uri = format!("/api/products/{}", product["id"].as_str().unwrap());
    app.send("GET", &uri, None).await;
    app.send("GET", "/api/products", None).await;

    let (status, json) = app
        .send("PATCH", &uri, Some(json!({ "name": "Black T-shirt" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Product successfully updated");

    let (_, fetched) = app.send("GET", &uri, None).await;
    assert_eq!(fetched["source"], "database");
    assert_eq!(fetched["data"]["name"], "Black T-shirt");
    assert_eq!(fetched["data"]["slug"], "black-t-shirt");

    let (_, listed) = app.send("GET", "/api/products", None).await;
    assert_eq!(listed["source"], "database");
    assert_eq!(listed["data"][0]["name"], "Black T-shirt");
}

#[tokio::test]
async fn test_product_delete_invalidates() {
    let app = create_test_app();
    let category_id = app.create_category("Shirts").await;
    let product = app.create_product("White T-shirt", &category_id).await;
    let uri = format!("/api/products/{}", product["id"].as_str().unwrap());
    app.send("GET", &uri, None).await;
    app.send("GET", "/api/products", None).await;

    let (status, json) = app.send("DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Product successfully deleted");

    let (status, _) = app.send("GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, listed) = app.send("GET", "/api/products", None).await;
    assert_eq!(listed["source"], "database");
    assert!(listed["data"].as_array().unwrap().is_empty());

    let (status, _) = app.send("DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// == Category Endpoint Tests ==

#[tokio::test]
async fn test_category_lifecycle() {
    let app = create_test_app();
    let id = app.create_category("Hoodies").await;
    let uri = format!("/api/categories/{id}");

    let (_, first) = app.send("GET", &uri, None).await;
    assert_eq!(first["source"], "database");
    assert_eq!(first["data"]["isActive"], true);
    assert!(first["data"]["imageUrl"].as_str().unwrap().starts_with("https://"));

    let (_, second) = app.send("GET", &uri, None).await;
    assert_eq!(second["source"], "cache");

    let (status, _) = app
        .send("PATCH", &uri, Some(json!({ "isActive": false })))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, updated) = app.send("GET", &uri, None).await;
    assert_eq!(updated["source"], "database");
    assert_eq!(updated["data"]["isActive"], false);

    let (status, _) = app.send("DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = app.send("GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Category not found");
}

#[tokio::test]
async fn test_category_create_validation() {
    let app = create_test_app();

    let (status, _) = app
        .send(
            "POST",
            "/api/categories/create",
            Some(json!({ "name": "H", "imageDataUri": IMAGE })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(
            "POST",
            "/api/categories/create",
            Some(json!({ "name": "Hoodies", "imageDataUri": "data:text/plain;base64,aGk=" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_category_in_use_cannot_be_deleted() {
    let app = create_test_app();
    let id = app.create_category("Shirts").await;
    app.create_product("White T-shirt", &id).await;

    let (status, json) = app
        .send("DELETE", &format!("/api/categories/{id}"), None)
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["success"], false);
}

// == Attribute Endpoint Tests ==

#[tokio::test]
async fn test_attribute_crud() {
    let app = create_test_app();

    let (status, created) = app
        .send(
            "POST",
            "/api/attributes",
            Some(json!({
                "name": "Size",
                "isRequired": true,
                "displayOrder": 1,
                "values": [{ "value": "S" }, { "value": "M" }],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let id = created["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(created["data"]["values"].as_array().unwrap().len(), 2);

    let (status, _) = app
        .send(
            "PUT",
            &format!("/api/attributes/{id}"),
            Some(json!({
                "name": "Size",
                "displayOrder": 2,
                "values": [{ "value": "L" }],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, listed) = app.send("GET", "/api/attributes", None).await;
    assert_eq!(listed["data"][0]["displayOrder"], 2);
    assert!(listed.get("source").is_none());

    let (status, _) = app
        .send("DELETE", &format!("/api/attributes/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, listed) = app.send("GET", "/api/attributes", None).await;
    assert!(listed["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_attribute_validation() {
    let app = create_test_app();

    let (status, _) = app
        .send(
            "POST",
            "/api/attributes",
            Some(json!({ "name": "Size", "displayOrder": 51, "values": [{ "value": "S" }] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(
            "POST",
            "/api/attributes",
            Some(json!({ "name": "Size", "displayOrder": 1, "values": [] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// == Service Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let (status, json) = app.send("GET", "/api/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}

#[tokio::test]
async fn test_stats_reflect_hits_and_misses() {
    let app = create_test_app();
    app.send("GET", "/api/products", None).await;
    app.send("GET", "/api/products", None).await;

    let (status, json) = app.send("GET", "/api/cache/stats", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["hits"], 1);
    assert_eq!(json["misses"], 1);
    assert_eq!(json["populates"], 1);
    assert_eq!(json["hitRate"], 0.5);
    assert_eq!(json["entries"], 1);
}
