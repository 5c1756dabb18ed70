//! Application state and router builder
//!
//! The state carries the shared database handle established once at
//! startup plus the configuration; repositories and the aggregator are
//! stateless views over that handle and are created per use.

use crate::config::Config;
use crate::routes;
use axum::routing::get;
use axum::Router;
use mongodb::Database;
use outlay_shared::db::{ProjectDetailsAggregator, Repository};
use outlay_shared::models::{Category, Expense, Project, ProjectMember, User};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Shared application state
///
/// Cloned into each request handler via Axum's `State` extractor; the
/// database handle and the Arc are both cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Shared database handle, connected before the server starts
    pub db: Database,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: Database, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    pub fn users(&self) -> Repository<User> {
        Repository::new(&self.db)
    }

    pub fn categories(&self) -> Repository<Category> {
        Repository::new(&self.db)
    }

    pub fn projects(&self) -> Repository<Project> {
        Repository::new(&self.db)
    }

    pub fn project_members(&self) -> Repository<ProjectMember> {
        Repository::new(&self.db)
    }

    pub fn expenses(&self) -> Repository<Expense> {
        Repository::new(&self.db)
    }

    pub fn project_details(&self) -> ProjectDetailsAggregator {
        ProjectDetailsAggregator::new(&self.db)
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                          # liveness (no storage access)
/// ├── /health/db                       # storage ping
/// └── /api/v1/
///     ├── /users          POST GET     # create, list
///     ├── /users/:id      GET PUT DELETE
///     ├── /categories     POST GET
///     ├── /categories/:id GET PUT DELETE
///     ├── /projects       POST GET
///     ├── /projects/:id   GET DELETE   # delete is soft
///     ├── /projects/:id/details                 GET
///     ├── /projects/:id/members                 POST GET
///     ├── /projects/:id/members/:member_id      GET DELETE
///     ├── /expenses       POST GET
///     └── /expenses/:id   GET PUT DELETE
/// ```
///
/// Middleware: request tracing (tower-http `TraceLayer`) and permissive
/// CORS, matching the logger/CORS stack of the original service.
pub fn build_router(state: AppState) -> Router {
    let health_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/health/db", get(routes::health::db_check));

    let v1_routes = Router::new()
        .route(
            "/users",
            axum::routing::post(routes::users::create).get(routes::users::list),
        )
        .route(
            "/users/:id",
            get(routes::users::get)
                .put(routes::users::update)
                .delete(routes::users::remove),
        )
        .route(
            "/categories",
            axum::routing::post(routes::categories::create).get(routes::categories::list),
        )
        .route(
            "/categories/:id",
            get(routes::categories::get)
                .put(routes::categories::update)
                .delete(routes::categories::remove),
        )
        .route(
            "/projects",
            axum::routing::post(routes::projects::create).get(routes::projects::list),
        )
        .route(
            "/projects/:id",
            get(routes::projects::get).delete(routes::projects::remove),
        )
        .route("/projects/:id/details", get(routes::projects::details))
        .route(
            "/projects/:id/members",
            axum::routing::post(routes::projects::create_member).get(routes::projects::list_members),
        )
        .route(
            "/projects/:id/members/:member_id",
            get(routes::projects::get_member).delete(routes::projects::remove_member),
        )
        .route(
            "/expenses",
            axum::routing::post(routes::expenses::create).get(routes::expenses::list),
        )
        .route(
            "/expenses/:id",
            get(routes::expenses::get)
                .put(routes::expenses::update)
                .delete(routes::expenses::remove),
        );

    Router::new()
        .merge(health_routes)
        .nest("/api/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
