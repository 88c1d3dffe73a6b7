mod common;

use axum::http::{Method, StatusCode};
use regex::Regex;
use rust_decimal::Decimal;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;
use storefront_api::entities::{item, order};
use uuid::Uuid;

use common::{read_json, TestApp};

fn order_body(lines: serde_json::Value) -> serde_json::Value {
    json!({
        "items": lines.to_string(),
        "pick_up": 1_772_000_000_i64,
        "name": "Alex Shopper",
        "phone": "555-0199",
        "email": "alex@example.com",
        "amount": 12.5
    })
}

async fn current_stock(app: &TestApp, item_id: Uuid) -> i32 {
    item::Entity::find_by_id(item_id)
        .one(&*app.db)
        .await
        .expect("query item")
        .expect("item exists")
        .stock
}

#[tokio::test]
async fn placing_an_order_decrements_stock_and_returns_order_number() {
    let app = TestApp::new().await;
    let store = app.seed_store("Corner Grocer").await;
    let milk = app
        .seed_item(store.id, "Milk", Decimal::new(250, 2), 5)
        .await;

    let response = app
        .request(
            Method::POST,
            &format!("/web/stores/{}/orders", store.id),
            Some(order_body(json!([{ "item": milk.id, "quantity": 2 }]))),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["status"], "SUCCESS");

    let order_no = body["data"]["order_no"].as_str().expect("order number");
    let pattern = Regex::new(r"^[A-Z]{3}[0-9]{3}$").unwrap();
    assert!(pattern.is_match(order_no), "bad order number: {order_no}");
    assert!(body["data"]["id"].as_str().is_some());
    assert_eq!(body["data"]["items"][0]["item_name"], "Milk");
    assert!(body["data"]["status"].is_null());

    assert_eq!(current_stock(&app, milk.id).await, 3);
}

#[tokio::test]
async fn over_stock_line_rejects_order_and_leaves_stock_untouched() {
    let app = TestApp::new().await;
    let store = app.seed_store("Corner Grocer").await;
    let eggs = app
        .seed_item(store.id, "Eggs", Decimal::new(499, 2), 2)
        .await;

    let response = app
        .request(
            Method::POST,
            &format!("/web/stores/{}/orders", store.id),
            Some(order_body(json!([{ "item": eggs.id, "quantity": 3 }]))),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = read_json(response).await;
    assert_eq!(body["status"], "FAIL");
    assert_eq!(body["error"], "OUT_OF_STOCK");

    assert_eq!(current_stock(&app, eggs.id).await, 2);
    let orders = order::Entity::find().count(&*app.db).await.unwrap();
    assert_eq!(orders, 0);
}

#[tokio::test]
async fn one_bad_line_aborts_the_whole_cart_without_partial_decrements() {
    let app = TestApp::new().await;
    let store = app.seed_store("Corner Grocer").await;
    let bread = app
        .seed_item(store.id, "Bread", Decimal::new(350, 2), 5)
        .await;
    let butter = app
        .seed_item(store.id, "Butter", Decimal::new(600, 2), 1)
        .await;

    let response = app
        .request(
            Method::POST,
            &format!("/web/stores/{}/orders", store.id),
            Some(order_body(json!([
                { "item": bread.id, "quantity": 2 },
                { "item": butter.id, "quantity": 3 }
            ]))),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"], "OUT_OF_STOCK");

    assert_eq!(current_stock(&app, bread.id).await, 5);
    assert_eq!(current_stock(&app, butter.id).await, 1);
    assert_eq!(order::Entity::find().count(&*app.db).await.unwrap(), 0);
}

#[tokio::test]
async fn non_positive_quantity_line_rejects_order_and_never_raises_stock() {
    let app = TestApp::new().await;
    let store = app.seed_store("Corner Grocer").await;
    let milk = app
        .seed_item(store.id, "Milk", Decimal::new(250, 2), 5)
        .await;

    for quantity in [-3, 0] {
        let response = app
            .request(
                Method::POST,
                &format!("/web/stores/{}/orders", store.id),
                Some(order_body(json!([{ "item": milk.id, "quantity": quantity }]))),
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body["status"], "FAIL");
        assert_eq!(body["error"], "INVALID_QUANTITY");
    }

    assert_eq!(current_stock(&app, milk.id).await, 5);
    assert_eq!(order::Entity::find().count(&*app.db).await.unwrap(), 0);
}

#[tokio::test]
async fn empty_cart_is_rejected() {
    let app = TestApp::new().await;
    let store = app.seed_store("Corner Grocer").await;

    for items in ["", "[]"] {
        let mut payload = order_body(json!([]));
        payload["items"] = json!(items);
        let response = app
            .request(
                Method::POST,
                &format!("/web/stores/{}/orders", store.id),
                Some(payload),
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body["error"], "EMPTY_CART");
    }
}

#[tokio::test]
async fn unknown_or_malformed_store_is_invalid_store() {
    let app = TestApp::new().await;

    for store_ref in [Uuid::new_v4().to_string(), "not-a-uuid".to_string()] {
        let response = app
            .request(
                Method::POST,
                &format!("/web/stores/{store_ref}/orders"),
                Some(order_body(json!([{ "item": Uuid::new_v4(), "quantity": 1 }]))),
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body["error"], "INVALID_STORE");
    }
}

#[tokio::test]
async fn cart_line_with_unknown_item_is_invalid_item() {
    let app = TestApp::new().await;
    let store = app.seed_store("Corner Grocer").await;

    let response = app
        .request(
            Method::POST,
            &format!("/web/stores/{}/orders", store.id),
            Some(order_body(json!([{ "item": Uuid::new_v4(), "quantity": 1 }]))),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"], "INVALID_ITEM");
}

#[tokio::test]
async fn order_listing_carries_line_counts_and_detail_populates_items() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let store = app.seed_store("Corner Grocer").await;
    let milk = app
        .seed_item(store.id, "Milk", Decimal::new(250, 2), 10)
        .await;
    let eggs = app
        .seed_item(store.id, "Eggs", Decimal::new(499, 2), 10)
        .await;

    let response = app
        .request(
            Method::POST,
            &format!("/web/stores/{}/orders", store.id),
            Some(order_body(json!([
                { "item": milk.id, "quantity": 1 },
                { "item": eggs.id, "quantity": 2 }
            ]))),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let placed = read_json(response).await;
    let order_id = placed["data"]["id"].as_str().unwrap().to_string();

    let listing = app
        .request_with_token(
            Method::GET,
            &format!("/admin/stores/{}/orders", store.id),
            None,
            &token,
        )
        .await;
    assert_eq!(listing.status(), StatusCode::OK);
    let listing = read_json(listing).await;
    assert_eq!(listing["count"], 1);
    assert_eq!(listing["data"][0]["no_of_items"], 2);

    let detail = app
        .request_with_token(
            Method::GET,
            &format!("/admin/stores/{}/orders/{}", store.id, order_id),
            None,
            &token,
        )
        .await;
    assert_eq!(detail.status(), StatusCode::OK);
    let detail = read_json(detail).await;
    let items = detail["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().any(|line| line["item_name"] == "Eggs"));

    let missing = app
        .request_with_token(
            Method::GET,
            &format!("/admin/stores/{}/orders/{}", store.id, Uuid::new_v4()),
            None,
            &token,
        )
        .await;
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(missing).await["error"], "INVALID_ORDER");
}
