//! Project and project-member endpoints
//!
//! Projects and members are soft-deletable: deletion flips `is_active` to
//! false and refreshes `updated_at`; the record stays visible in
//! unfiltered listings. The details endpoint serves the joined view
//! assembled by the aggregation pipeline.

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
use outlay_shared::models::{Project, ProjectMember, Role};
use outlay_shared::query::filter;
use serde::Deserialize;
use std::collections::HashMap;
use validator::Validate;

/// Create project request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub title: String,

    #[validate(length(min = 1, message = "must not be empty"))]
    pub description: String,

    pub is_active: bool,
}

/// Add-member request; the project comes from the path
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMemberRequest {
    #[validate(email(message = "must be a valid email"))]
    pub email: String,

    #[validate(custom(function = crate::routes::digits))]
    pub phone_number: String,

    #[validate(custom(function = crate::routes::alphabetic))]
    pub name: String,

    pub role: Role,

    pub is_active: bool,
}

/// `POST /api/v1/projects`
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateProjectRequest>,
) -> ApiResult<Response> {
    error::validate(&input)?;

    let now = Utc::now();
    let project = Project {
        id: ObjectId::new(),
        created_at: now,
        updated_at: now,
        title: input.title,
        description: input.description,
        is_active: input.is_active,
    };

    let id = state.projects().insert_one(&project).await?;
    Ok(response::ok(
        StatusCode::CREATED,
        id.to_hex(),
        "project created",
    ))
}

/// `GET /api/v1/projects` with optional `name` filter
///
/// Soft-deleted projects are not special-cased: without a filter they are
/// listed like any other.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Response> {
    let filter = filter::projects(&params)?;
    let projects = state.projects().find_many(filter).await?;
    Ok(response::ok(StatusCode::OK, projects, "project details"))
}

/// `GET /api/v1/projects/:id`
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let project_id = routes::parse_object_id(&id)?;
    let project = state
        .projects()
        .find_one(doc! { "_id": project_id })
        .await
        .map_err(missing("project"))?;
    Ok(response::ok(StatusCode::OK, project, "project detail"))
}

/// `DELETE /api/v1/projects/:id` (soft delete)
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let project_id = routes::parse_object_id(&id)?;
    let patch = doc! {
        "is_active": false,
        "updated_at": bson::DateTime::from_chrono(Utc::now()),
    };
    let count = state
        .projects()
        .update_one(patch, doc! { "_id": project_id })
        .await
        .map_err(missing("project"))?;
    Ok(response::ok(StatusCode::ACCEPTED, count, "project removed"))
}

/// `GET /api/v1/projects/:id/details`
///
/// Accepts `start`, `end` (`YYYY-MM-DD`) and `is_active`; the window
/// defaults to the calendar month containing now and the member filter to
/// active members. The join, sort and both filters run inside the
/// aggregation pipeline.
pub async fn details(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Response> {
    let project_id = routes::parse_object_id(&id)?;
    let selector = filter::project_details(&params)?;

    let details = state
        .project_details()
        .lookup(project_id, &selector)
        .await
        .map_err(missing("project"))?;
    Ok(response::ok(
        StatusCode::OK,
        details,
        "complete project details",
    ))
}

/// `POST /api/v1/projects/:id/members`
pub async fn create_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<CreateMemberRequest>,
) -> ApiResult<Response> {
    let project_id = routes::parse_object_id(&id)?;
    error::validate(&input)?;

    // The project must exist before a member can be attached to it.
    state
        .projects()
        .find_one(doc! { "_id": project_id })
        .await
        .map_err(missing("project"))?;

    let now = Utc::now();
    let member = ProjectMember {
        id: ObjectId::new(),
        created_at: now,
        updated_at: now,
        project_id,
        email: input.email,
        phone_number: input.phone_number,
        name: input.name,
        role: input.role,
        is_active: input.is_active,
    };

    let member_id = state.project_members().insert_one(&member).await?;
    Ok(response::ok(
        StatusCode::CREATED,
        member_id.to_hex(),
        "project member created",
    ))
}

/// `GET /api/v1/projects/:id/members` with optional `is_active` filter
pub async fn list_members(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Response> {
    let project_id = routes::parse_object_id(&id)?;
    let filter = filter::project_members(project_id, &params)?;
    let members = state.project_members().find_many(filter).await?;
    Ok(response::ok(
        StatusCode::OK,
        members,
        "project member details",
    ))
}

/// `GET /api/v1/projects/:id/members/:member_id`
pub async fn get_member(
    State(state): State<AppState>,
    Path((id, member_id)): Path<(String, String)>,
) -> ApiResult<Response> {
    let project_id = routes::parse_object_id(&id)?;
    let member_id = routes::parse_object_id(&member_id)?;
    let member = state
        .project_members()
        .find_one(doc! { "_id": member_id, "project_id": project_id })
        .await
        .map_err(missing("project member"))?;
    Ok(response::ok(StatusCode::OK, member, "project member detail"))
}

/// `DELETE /api/v1/projects/:id/members/:member_id` (soft delete)
pub async fn remove_member(
    State(state): State<AppState>,
    Path((id, member_id)): Path<(String, String)>,
) -> ApiResult<Response> {
    let project_id = routes::parse_object_id(&id)?;
    let member_id = routes::parse_object_id(&member_id)?;
    let patch = doc! {
        "is_active": false,
        "updated_at": bson::DateTime::from_chrono(Utc::now()),
    };
    let count = state
        .project_members()
        .update_one(patch, doc! { "_id": member_id, "project_id": project_id })
        .await
        .map_err(missing("project member"))?;
    Ok(response::ok(
        StatusCode::ACCEPTED,
        count,
        "project member removed",
    ))
}
