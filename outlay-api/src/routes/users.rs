//! User endpoints
//!
//! Users support the full CRUD set; deletion is hard (the record is
//! physically removed). Updates touch only `name` and `is_active`.

use crate::app::AppState;
use crate::error::{self, ApiResult};
use crate::response;
use crate::routes::{self, missing};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use bson::oid::ObjectId;
use bson::doc;
use chrono::Utc;
use outlay_shared::models::{Role, User};
use outlay_shared::query::filter;
use serde::Deserialize;
use std::collections::HashMap;
use validator::Validate;

/// Create user request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email(message = "must be a valid email"))]
    pub email: String,

    #[validate(custom(function = crate::routes::digits))]
    pub phone_number: String,

    #[validate(custom(function = crate::routes::alphabetic))]
    pub name: String,

    /// Out-of-set values are rejected during deserialization
    pub role: Role,

    pub is_active: bool,
}

/// Update user request; only these two fields are mutable
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 20, message = "must be 1-20 characters"))]
    pub name: String,

    pub is_active: bool,
}

/// `POST /api/v1/users`
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateUserRequest>,
) -> ApiResult<Response> {
    error::validate(&input)?;

    let now = Utc::now();
    let user = User {
        id: ObjectId::new(),
        created_at: now,
        updated_at: now,
        email: input.email,
        phone_number: input.phone_number,
        name: input.name,
        role: input.role,
        is_active: input.is_active,
    };

    let id = state.users().insert_one(&user).await?;
    Ok(response::ok(StatusCode::CREATED, id.to_hex(), "user created"))
}

/// `GET /api/v1/users` with optional `is_active` and `role` filters
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Response> {
    let filter = filter::users(&params)?;
    let users = state.users().find_many(filter).await?;
    Ok(response::ok(StatusCode::OK, users, "user details"))
}

/// `GET /api/v1/users/:id`
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let user_id = routes::parse_object_id(&id)?;
    let user = state
        .users()
        .find_one(doc! { "_id": user_id })
        .await
        .map_err(missing("user"))?;
    Ok(response::ok(StatusCode::OK, user, "user detail"))
}

/// `PUT /api/v1/users/:id`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateUserRequest>,
) -> ApiResult<Response> {
    let user_id = routes::parse_object_id(&id)?;
    error::validate(&input)?;

    let patch = doc! {
        "name": input.name,
        "is_active": input.is_active,
        "updated_at": bson::DateTime::from_chrono(Utc::now()),
    };
    let count = state
        .users()
        .update_one(patch, doc! { "_id": user_id })
        .await
        .map_err(missing("user"))?;
    Ok(response::ok(StatusCode::OK, count, "user updated"))
}

/// `DELETE /api/v1/users/:id` (hard delete)
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let user_id = routes::parse_object_id(&id)?;
    let count = state
        .users()
        .delete_one(doc! { "_id": user_id })
        .await
        .map_err(missing("user"))?;
    Ok(response::ok(StatusCode::ACCEPTED, count, "user removed"))
}
