//! Category model
//!
//! Categories classify expenses. Like users they are embedded into
//! expenses as snapshots, so renaming a category never rewrites history.

use crate::db::Persist;
use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An expense category, stored in the `categories` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Document ID
    #[serde(rename = "_id")]
    pub id: ObjectId,

    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,

    /// Alphabetic-only name, validated at the API boundary
    pub name: String,
}

impl Persist for Category {
    const COLLECTION: &'static str = "categories";
}
