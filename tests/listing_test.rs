mod common;

use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use serde_json::Value;

use common::{read_json, TestApp};

async fn seed_stores(app: &TestApp, n: usize) {
    let base = Utc::now() - Duration::minutes(n as i64);
    for i in 0..n {
        app.seed_store_at(
            &format!("Store {i}"),
            base + Duration::minutes(i as i64),
        )
        .await;
    }
}

fn names(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["store_name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn listing_without_limit_returns_every_record() {
    let app = TestApp::new().await;
    seed_stores(&app, 7).await;

    let response = app.request(Method::GET, "/web/stores", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["count"], 7);
    assert_eq!(body["data"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn listing_is_paged_newest_first() {
    let app = TestApp::new().await;
    seed_stores(&app, 5).await;

    let page1 = read_json(
        app.request(Method::GET, "/web/stores?limit=2&page=1", None)
            .await,
    )
    .await;
    assert_eq!(page1["count"], 5);
    assert_eq!(names(&page1), vec!["Store 4", "Store 3"]);

    let page2 = read_json(
        app.request(Method::GET, "/web/stores?limit=2&page=2", None)
            .await,
    )
    .await;
    assert_eq!(names(&page2), vec!["Store 2", "Store 1"]);

    let page3 = read_json(
        app.request(Method::GET, "/web/stores?limit=2&page=3", None)
            .await,
    )
    .await;
    assert_eq!(names(&page3), vec!["Store 0"]);
}

#[tokio::test]
async fn soft_deleted_stores_are_hidden_from_listings_but_still_resolve() {
    let app = TestApp::new().await;
    let kept = app.seed_store("Kept").await;
    let gone = app.seed_store("Gone").await;

    let token = app.admin_token().await;
    let delete = app
        .request_with_token(
            Method::DELETE,
            &format!("/admin/stores/{}", gone.id),
            None,
            &token,
        )
        .await;
    assert_eq!(delete.status(), StatusCode::OK);

    let listing = read_json(app.request(Method::GET, "/web/stores", None).await).await;
    assert_eq!(listing["count"], 1);
    assert_eq!(names(&listing), vec!["Kept"]);

    // Direct detail lookups do not filter the flag.
    let detail = app
        .request(Method::GET, &format!("/web/stores/{}", gone.id), None)
        .await;
    assert_eq!(detail.status(), StatusCode::OK);

    let kept_detail = app
        .request(Method::GET, &format!("/web/stores/{}", kept.id), None)
        .await;
    assert_eq!(kept_detail.status(), StatusCode::OK);
}

#[tokio::test]
async fn store_summaries_strip_timestamps() {
    let app = TestApp::new().await;
    app.seed_store("Corner Grocer").await;

    let body = read_json(app.request(Method::GET, "/web/stores", None).await).await;
    let store = &body["data"][0];
    assert!(store.get("created_at").is_none());
    assert!(store.get("updated_at").is_none());
    assert!(store.get("deleted").is_none());
}

#[tokio::test]
async fn liveness_and_fallback_routes() {
    let app = TestApp::new().await;

    let root = app.request(Method::GET, "/", None).await;
    assert_eq!(root.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(root.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"Server Running");

    let missing = app.request(Method::GET, "/no/such/route", None).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let body = read_json(missing).await;
    assert_eq!(body["error"], "Not found");
    assert_eq!(body["url"], "/no/such/route");
}
