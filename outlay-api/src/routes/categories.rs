//! Category endpoints
//!
//! Categories are immutable after creation except for an explicit rename
//! via the update endpoint. Deletion is hard; expenses that embedded the
//! category keep their snapshot.

use crate::app::AppState;
use crate::error::{self, ApiResult};
use crate::response;
use crate::routes::{self, missing};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use bson::doc;
use bson::oid::ObjectId;
use chrono::Utc;
use outlay_shared::models::Category;
use outlay_shared::query::filter;
use serde::Deserialize;
use std::collections::HashMap;
use validator::Validate;

/// Create category request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(custom(function = crate::routes::alphabetic))]
    pub name: String,
}

/// Rename request; the name is the only mutable field
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCategoryRequest {
    #[validate(custom(function = crate::routes::alphabetic))]
    pub name: String,
}

/// `POST /api/v1/categories`
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateCategoryRequest>,
) -> ApiResult<Response> {
    error::validate(&input)?;

    let now = Utc::now();
    let category = Category {
        id: ObjectId::new(),
        created_at: now,
        updated_at: now,
        name: input.name,
    };

    let id = state.categories().insert_one(&category).await?;
    Ok(response::ok(
        StatusCode::CREATED,
        id.to_hex(),
        "category created",
    ))
}

/// `GET /api/v1/categories` with optional `name` filter
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Response> {
    let filter = filter::categories(&params)?;
    let categories = state.categories().find_many(filter).await?;
    Ok(response::ok(StatusCode::OK, categories, "category details"))
}

/// `GET /api/v1/categories/:id`
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let category_id = routes::parse_object_id(&id)?;
    let category = state
        .categories()
        .find_one(doc! { "_id": category_id })
        .await
        .map_err(missing("category"))?;
    Ok(response::ok(StatusCode::OK, category, "category detail"))
}

/// `PUT /api/v1/categories/:id`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateCategoryRequest>,
) -> ApiResult<Response> {
    let category_id = routes::parse_object_id(&id)?;
    error::validate(&input)?;

    let patch = doc! {
        "name": input.name,
        "updated_at": bson::DateTime::from_chrono(Utc::now()),
    };
    let count = state
        .categories()
        .update_one(patch, doc! { "_id": category_id })
        .await
        .map_err(missing("category"))?;
    Ok(response::ok(StatusCode::OK, count, "category updated"))
}

/// `DELETE /api/v1/categories/:id` (hard delete)
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let category_id = routes::parse_object_id(&id)?;
    let count = state
        .categories()
        .delete_one(doc! { "_id": category_id })
        .await
        .map_err(missing("category"))?;
    Ok(response::ok(StatusCode::ACCEPTED, count, "category removed"))
}
