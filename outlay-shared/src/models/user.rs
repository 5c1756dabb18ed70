//! User model
//!
//! Users are the people who submit expenses. They are referenced from
//! expenses by *copy*, not by ID: an expense embeds the user as it looked
//! at creation time, and later edits to the user never reach historical
//! expenses.

use crate::db::Persist;
use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role a user holds within the organization.
///
/// Deserialization rejects anything outside this set, which is where the
/// "role must be one of the enumerated values" invariant is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Supervisor,
    Staff,
    User,
}

/// A user account, stored in the `users` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Document ID
    #[serde(rename = "_id")]
    pub id: ObjectId,

    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,

    /// Email address, syntactically validated at the API boundary
    pub email: String,

    /// Phone number, digits only
    pub phone_number: String,

    pub name: String,

    pub role: Role,

    /// Inactive users stay in the collection; listings filter on this flag
    pub is_active: bool,
}

impl Persist for User {
    const COLLECTION: &'static str = "users";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_serialize_to_upper_snake_strings() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
        assert_eq!(
            serde_json::to_string(&Role::Supervisor).unwrap(),
            "\"SUPERVISOR\""
        );
        assert_eq!(serde_json::to_string(&Role::Staff).unwrap(), "\"STAFF\"");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"USER\"");
    }

    #[test]
    fn unknown_role_is_rejected() {
        let result: Result<Role, _> = serde_json::from_str("\"INTERN\"");
        assert!(result.is_err());
    }
}
