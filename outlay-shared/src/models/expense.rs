//! Expense model
//!
//! An expense belongs to a project by ID but embeds *copies* of its
//! category and submitting user, taken at write time. That denormalization
//! is deliberate: expense history stays accurate even when the source
//! category or user is later renamed or deleted, at the cost of not
//! reflecting such edits. Do not "fix" this into live references.

use crate::db::Persist;
use crate::models::category::Category;
use crate::models::user::User;
use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Confirmation state of an expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseStatus {
    Pending,
    Confirmed,
}

/// An expense record, stored in the `expenses` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    /// Document ID
    #[serde(rename = "_id")]
    pub id: ObjectId,

    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,

    /// Day the expense was incurred (midnight UTC of the submitted date)
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub date: DateTime<Utc>,

    pub title: String,

    pub description: String,

    pub location: String,

    /// Currency amount
    pub total: f64,

    pub status: ExpenseStatus,

    /// Owning project
    pub project_id: ObjectId,

    /// Snapshot of the category at creation time
    pub category: Category,

    /// Snapshot of the submitting user at creation time
    pub inserted_by: User,
}

impl Persist for Expense {
    const COLLECTION: &'static str = "expenses";
}
