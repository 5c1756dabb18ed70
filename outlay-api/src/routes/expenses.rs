//! Expense endpoints
//!
//! Creation resolves the referenced category and submitting user and
//! embeds *copies* of both into the new document. The reads and the
//! insert are independent round trips: if the source record is deleted in
//! between, the expense still lands with the snapshot it read. That is
//! the intended consistency trade-off, not a race to fix.

use crate::app::AppState;
use crate::error::{self, ApiError, ApiResult};
use crate::response;
use crate::routes::{self, missing};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use bson::doc;
use bson::oid::ObjectId;
use chrono::Utc;
use outlay_shared::models::{Category, Expense, ExpenseStatus, User};
use outlay_shared::query::filter;
use outlay_shared::query::window::parse_day;
use serde::Deserialize;
use std::collections::HashMap;
use validator::Validate;

/// Create/update expense request
///
/// `category_id` and `inserted_by` reference existing records; both are
/// resolved before the write and embedded as snapshots.
#[derive(Debug, Deserialize, Validate)]
pub struct ExpenseRequest {
    /// Day the expense was incurred, `YYYY-MM-DD`
    #[validate(length(min = 1, message = "must not be empty"))]
    pub date: String,

    #[validate(length(min = 1, message = "must not be empty"))]
    pub title: String,

    #[validate(length(min = 1, message = "must not be empty"))]
    pub description: String,

    #[serde(default)]
    pub location: String,

    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub total: f64,

    /// Out-of-set values are rejected during deserialization
    pub status: ExpenseStatus,

    /// Owning project
    pub project_id: String,

    pub category_id: String,

    /// ID of the submitting user
    pub inserted_by: String,
}

/// Resolves the category and user referenced by a request.
///
/// Fails with NotFound when either ID does not resolve; nothing is
/// written in that case.
async fn resolve_snapshots(
    state: &AppState,
    input: &ExpenseRequest,
) -> ApiResult<(Category, User)> {
    let category_id = routes::parse_object_id(&input.category_id)?;
    let category = state
        .categories()
        .find_one(doc! { "_id": category_id })
        .await
        .map_err(missing("category"))?;

    let user_id = routes::parse_object_id(&input.inserted_by)?;
    let user = state
        .users()
        .find_one(doc! { "_id": user_id })
        .await
        .map_err(missing("user"))?;

    Ok((category, user))
}

/// `POST /api/v1/expenses`
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<ExpenseRequest>,
) -> ApiResult<Response> {
    error::validate(&input)?;

    let project_id = routes::parse_object_id(&input.project_id)?;
    let (category, user) = resolve_snapshots(&state, &input).await?;
    let date = parse_day("date", &input.date)?;

    let now = Utc::now();
    let expense = Expense {
        id: ObjectId::new(),
        created_at: now,
        updated_at: now,
        date,
        title: input.title,
        description: input.description,
        location: input.location,
        total: input.total,
        status: input.status,
        project_id,
        category,
        inserted_by: user,
    };

    let id = state.expenses().insert_one(&expense).await?;
    Ok(response::ok(
        StatusCode::CREATED,
        id.to_hex(),
        "expense created",
    ))
}

/// `GET /api/v1/expenses`
///
/// Optional `start`/`end` window (both required together); results come
/// back date-descending either way.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Response> {
    let filter = filter::expenses(&params)?;
    let expenses = state
        .expenses()
        .find_many_sorted(filter, doc! { "date": -1 })
        .await?;
    Ok(response::ok(StatusCode::OK, expenses, "expense details"))
}

/// `GET /api/v1/expenses/:id`
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let expense_id = routes::parse_object_id(&id)?;
    let expense = state
        .expenses()
        .find_one(doc! { "_id": expense_id })
        .await
        .map_err(missing("expense"))?;
    Ok(response::ok(StatusCode::OK, expense, "expense detail"))
}

/// `PUT /api/v1/expenses/:id`
///
/// Re-resolves the referenced category and user, so an update takes fresh
/// snapshots; historical expenses are only rewritten by updating them
/// explicitly like this.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ExpenseRequest>,
) -> ApiResult<Response> {
    let expense_id = routes::parse_object_id(&id)?;
    error::validate(&input)?;

    let project_id = routes::parse_object_id(&input.project_id)?;
    let (category, user) = resolve_snapshots(&state, &input).await?;
    let date = parse_day("date", &input.date)?;

    let patch = doc! {
        "date": bson::DateTime::from_chrono(date),
        "title": input.title,
        "description": input.description,
        "location": input.location,
        "total": input.total,
        "status": bson::to_bson(&input.status).map_err(internal)?,
        "project_id": project_id,
        "category": bson::to_bson(&category).map_err(internal)?,
        "inserted_by": bson::to_bson(&user).map_err(internal)?,
        "updated_at": bson::DateTime::from_chrono(Utc::now()),
    };
    let count = state
        .expenses()
        .update_one(patch, doc! { "_id": expense_id })
        .await
        .map_err(missing("expense"))?;
    Ok(response::ok(StatusCode::OK, count, "expense updated"))
}

/// `DELETE /api/v1/expenses/:id` (hard delete)
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let expense_id = routes::parse_object_id(&id)?;
    let count = state
        .expenses()
        .delete_one(doc! { "_id": expense_id })
        .await
        .map_err(missing("expense"))?;
    Ok(response::ok(StatusCode::ACCEPTED, count, "expense removed"))
}

fn internal(err: bson::ser::Error) -> ApiError {
    ApiError::Internal(err.to_string())
}
