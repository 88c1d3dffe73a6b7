#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, Response, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde_json::Value;
use storefront_api::{
    auth::AuthService,
    config::AppConfig,
    db,
    entities::{item, store},
    handlers::AppServices,
    notifications::{LogMailer, Notifier},
    AppState,
};
use tower::ServiceExt;
use uuid::Uuid;

/// Test harness backed by an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub db: Arc<DatabaseConnection>,
    pub state: AppState,
}

impl TestApp {
    /// Constructs a fresh application over a private in-memory database.
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "test_secret_key_for_testing_purposes_only_32chars".to_string(),
            "127.0.0.1".to_string(),
            0,
            "test".to_string(),
        );
        // A single connection keeps the in-memory database alive and shared.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);
        let auth = Arc::new(AuthService::new(cfg.jwt_secret.clone(), cfg.session_ttl_secs));
        let notifier = Arc::new(Notifier::new(
            Arc::new(LogMailer),
            cfg.admin_email.clone(),
            cfg.mail_from.clone(),
        ));
        let services = AppServices::new(db_arc.clone(), auth.clone());

        let state = AppState {
            db: db_arc.clone(),
            auth,
            services,
            notifier,
        };
        let router = storefront_api::router(state.clone());

        Self {
            router,
            db: db_arc,
            state,
        }
    }

    /// Sends a request without credentials.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> Response<Body> {
        self.send(method, uri, body, None, None).await
    }

    /// Sends a request with a bearer token.
    pub async fn request_with_token(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: &str,
    ) -> Response<Body> {
        self.send(method, uri, body, Some(token), None).await
    }

    /// Sends a request carrying only a session cookie.
    pub async fn request_with_cookie(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        cookie: &str,
    ) -> Response<Body> {
        self.send(method, uri, body, None, Some(cookie)).await
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
        cookie: Option<&str>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .expect("build request"),
            None => builder.body(Body::empty()).expect("build request"),
        };

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("request failed")
    }

    /// Seeds a store row directly, bypassing the API.
    pub async fn seed_store(&self, name: &str) -> store::Model {
        self.seed_store_at(name, Utc::now()).await
    }

    pub async fn seed_store_at(&self, name: &str, created_at: DateTime<Utc>) -> store::Model {
        store::ActiveModel {
            id: Set(Uuid::new_v4()),
            store_name: Set(name.to_string()),
            address: Set("1 Main St".to_string()),
            phone: Set("555-0100".to_string()),
            email: Set(format!("{}@example.com", name.to_lowercase().replace(' ', "-"))),
            image: Set(None),
            deleted: Set(false),
            created_at: Set(created_at),
            updated_at: Set(created_at),
        }
        .insert(&*self.db)
        .await
        .expect("seed store")
    }

    /// Seeds an item row directly, bypassing the API.
    pub async fn seed_item(
        &self,
        store_id: Uuid,
        name: &str,
        price: Decimal,
        stock: i32,
    ) -> item::Model {
        let now = Utc::now();
        item::ActiveModel {
            id: Set(Uuid::new_v4()),
            item_name: Set(name.to_string()),
            category: Set(None),
            price: Set(price),
            image: Set(None),
            description: Set(None),
            store_id: Set(store_id),
            stock: Set(stock),
            deleted: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db)
        .await
        .expect("seed item")
    }

    /// Creates an admin via the API and logs in, returning the bearer token.
    pub async fn admin_token(&self) -> String {
        let email = format!("admin-{}@example.com", Uuid::new_v4().simple());
        let create = self
            .request(
                Method::POST,
                "/admin/create",
                Some(serde_json::json!({ "email": email, "password": "hunter2" })),
            )
            .await;
        assert_eq!(create.status(), StatusCode::OK, "admin create failed");

        let login = self
            .request(
                Method::POST,
                "/admin/login",
                Some(serde_json::json!({ "email": email, "password": "hunter2" })),
            )
            .await;
        assert_eq!(login.status(), StatusCode::OK, "admin login failed");

        let body = read_json(login).await;
        body["token"].as_str().expect("login token").to_string()
    }
}

/// Reads a response body as JSON.
pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    serde_json::from_slice(&bytes).expect("parse response body")
}
