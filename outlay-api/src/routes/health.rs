//! Health endpoints
//!
//! `/health` answers without touching storage; `/health/db` pings the
//! store over the shared connection.

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use crate::response;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use bson::doc;

pub async fn health_check() -> Response {
    response::ok(
        StatusCode::OK,
        serde_json::Value::Null,
        "server is up and running",
    )
}

pub async fn db_check(State(state): State<AppState>) -> ApiResult<Response> {
    state
        .db
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(|err| ApiError::Unavailable(err.to_string()))?;
    Ok(response::ok(
        StatusCode::OK,
        serde_json::Value::Null,
        "store connected",
    ))
}
