//! Project, project member, and the derived details view
//!
//! Projects and their members are both soft-deletable: deletion flips
//! `is_active` to false and the record stays in its collection, so
//! unfiltered listings keep returning it.

use crate::db::Persist;
use crate::models::expense::Expense;
use crate::models::user::Role;
use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A project, stored in the `projects` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Document ID
    #[serde(rename = "_id")]
    pub id: ObjectId,

    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,

    pub title: String,

    pub description: String,

    /// False once the project is soft-deleted
    pub is_active: bool,
}

impl Persist for Project {
    const COLLECTION: &'static str = "projects";
}

/// A member of exactly one project, stored in `projectMembers`.
///
/// Members carry the same contact shape as users but belong to a project
/// by foreign reference; they are not linked to the `users` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMember {
    /// Document ID
    #[serde(rename = "_id")]
    pub id: ObjectId,

    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,

    /// Owning project
    pub project_id: ObjectId,

    pub email: String,

    pub phone_number: String,

    pub name: String,

    pub role: Role,

    /// False once the member is soft-deleted
    pub is_active: bool,
}

impl Persist for ProjectMember {
    const COLLECTION: &'static str = "projectMembers";
}

/// The joined read-only view assembled by the details pipeline.
///
/// Never persisted; decoded straight out of the aggregation cursor. The
/// embedded expenses arrive windowed and date-descending, the members
/// filtered to the requested active state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDetails {
    /// Project document ID
    #[serde(rename = "_id")]
    pub id: ObjectId,

    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,

    pub title: String,

    pub description: String,

    /// Expenses inside the requested date window, newest first
    pub expenses: Vec<Expense>,

    /// Members matching the requested active state
    pub members: Vec<ProjectMember>,
}
