//! Storefront API Library
//!
//! Backend for a multi-store inventory and pickup-ordering platform.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod notifications;
pub mod openapi;
pub mod services;

use axum::{
    http::{StatusCode, Uri},
    middleware,
    response::Json,
    routing::{get, post, put},
    Router,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use utoipa::{IntoParams, ToSchema};

use crate::notifications::Notifier;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub auth: Arc<auth::AuthService>,
    pub services: handlers::AppServices,
    pub notifier: Arc<Notifier>,
}

/// Common query parameters for list endpoints. A missing `limit` means
/// "return everything"; `page` is 1-indexed.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListQuery {
    pub limit: Option<u64>,
    pub page: Option<u64>,
}

/// The envelope every endpoint responds with. `count` appears on listings,
/// `token` only on login.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub status: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            data: Some(data),
            count: None,
            token: None,
            status: "SUCCESS".to_string(),
            message: message.into(),
        }
    }

    pub fn listing(records: T, count: u64, message: impl Into<String>) -> Self {
        Self {
            data: Some(records),
            count: Some(count),
            token: None,
            status: "SUCCESS".to_string(),
            message: message.into(),
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            data: None,
            count: None,
            token: None,
            status: "SUCCESS".to_string(),
            message: message.into(),
        }
    }

    pub fn with_token(mut self, token: String) -> Self {
        self.token = Some(token);
        self
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

async fn liveness() -> &'static str {
    "Server Running"
}

async fn not_found(uri: Uri) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "url": uri.to_string(), "error": "Not found" })),
    )
}

fn shopper_routes() -> Router<AppState> {
    Router::new()
        .route("/stores", get(handlers::shopper::list_stores))
        .route("/stores/:store_id", get(handlers::shopper::store_details))
        .route(
            "/stores/:store_id/items",
            get(handlers::shopper::store_inventory),
        )
        .route(
            "/stores/:store_id/items/:item_id",
            get(handlers::shopper::item_details),
        )
        .route(
            "/stores/:store_id/orders",
            post(handlers::shopper::place_order),
        )
        .route(
            "/stores/:store_id/requests",
            post(handlers::shopper::request_item),
        )
}

fn admin_routes(state: AppState) -> Router<AppState> {
    let open = Router::new()
        .route("/create", post(handlers::admin::create_admin))
        .route("/login", post(handlers::admin::login));

    let protected = Router::new()
        .route(
            "/stores",
            get(handlers::shopper::list_stores).post(handlers::admin::create_store),
        )
        .route(
            "/stores/:store_id",
            put(handlers::admin::edit_store).delete(handlers::admin::delete_store),
        )
        .route(
            "/stores/:store_id/items",
            get(handlers::shopper::store_inventory).post(handlers::admin::create_item),
        )
        .route(
            "/stores/:store_id/items/:item_id",
            put(handlers::admin::edit_item).delete(handlers::admin::delete_item),
        )
        .route(
            "/stores/:store_id/requests",
            get(handlers::admin::list_requests),
        )
        .route("/stores/:store_id/orders", get(handlers::admin::list_orders))
        .route(
            "/stores/:store_id/orders/:order_id",
            get(handlers::admin::order_details),
        )
        .route_layer(middleware::from_fn_with_state(state, auth::require_admin));

    open.merge(protected)
}

/// Builds the full application router with the standard middleware stack.
pub fn router(state: AppState) -> Router {
    router_with_cors(state, CorsLayer::permissive())
}

pub fn router_with_cors(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(liveness))
        .nest("/web", shopper_routes())
        .nest("/admin", admin_routes(state.clone()))
        .merge(openapi::swagger_ui())
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod response_tests {
    use super::*;

    #[test]
    fn success_envelope_omits_empty_fields() {
        let body = serde_json::to_value(ApiResponse::success("payload", "done")).unwrap();
        assert_eq!(body["status"], "SUCCESS");
        assert_eq!(body["data"], "payload");
        assert!(body.get("count").is_none());
        assert!(body.get("token").is_none());
    }

    #[test]
    fn listing_envelope_carries_count() {
        let body = serde_json::to_value(ApiResponse::listing(vec![1, 2], 7, "ok")).unwrap();
        assert_eq!(body["count"], 7);
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn login_envelope_carries_token() {
        let body =
            serde_json::to_value(ApiResponse::success((), "ok").with_token("abc".into())).unwrap();
        assert_eq!(body["token"], "abc");
    }
}
