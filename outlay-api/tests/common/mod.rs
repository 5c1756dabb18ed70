//! Common test utilities for integration tests
//!
//! Each test context connects to the MongoDB named by `MONGO_URI`, builds
//! the router against a database with a unique name, and drops that
//! database on cleanup. When `MONGO_URI` is unset the context is `None`
//! and tests skip themselves, so the suite stays green without a live
//! store.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use bson::oid::ObjectId;
use mongodb::Database;
use outlay_api::app::{build_router, AppState};
use outlay_api::config::{ApiConfig, Config, MongoConfig};
use outlay_shared::db::ConnectionManager;
use tower::ServiceExt;

pub struct TestContext {
    pub app: Router,
    pub db: Database,
}

impl TestContext {
    /// Creates a context against a uniquely named test database, or
    /// `None` when no store is configured.
    pub async fn new() -> Option<Self> {
        let uri = std::env::var("MONGO_URI").ok()?;
        let database = format!("outlay_test_{}", ObjectId::new().to_hex());

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            store: MongoConfig {
                uri,
                database,
            },
        };

        let manager = ConnectionManager::new(config.store_config());
        let db = manager
            .database()
            .await
            .expect("MONGO_URI is set but the store is unreachable");

        let state = AppState::new(db.clone(), config);
        Some(Self {
            app: build_router(state),
            db,
        })
    }

    /// Drops the test database.
    pub async fn cleanup(self) {
        let _ = self.db.drop().await;
    }
}

/// Sends one request through the router and returns status + parsed body.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            builder.body(Body::from(value.to_string())).unwrap()
        }
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Creates a record through the API and returns its generated ID.
pub async fn create(
    app: &Router,
    uri: &str,
    body: serde_json::Value,
) -> String {
    let (status, envelope) = send(app, "POST", uri, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {envelope}");
    envelope["data"].as_str().expect("create returns an id").to_string()
}
