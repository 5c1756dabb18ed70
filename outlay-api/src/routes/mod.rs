//! API route handlers
//!
//! One module per entity plus health. Handlers are the orchestrators:
//! they parse and validate at the boundary, resolve referenced IDs, call
//! the repositories or the aggregator, and wrap the result in the
//! envelope. No storage call happens before parsing and validation pass.

pub mod categories;
pub mod expenses;
pub mod health;
pub mod projects;
pub mod users;

use crate::error::ApiError;
use bson::oid::ObjectId;
use outlay_shared::db::DbError;
use validator::ValidationError;

/// Parses a path or body ID into an ObjectId.
pub(crate) fn parse_object_id(value: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(value)
        .map_err(|_| ApiError::BadRequest(format!("malformed id `{value}`")))
}

/// Rewrites a storage `NotFound` with the name of the missing entity;
/// other storage errors pass through unchanged.
pub(crate) fn missing(entity: &'static str) -> impl FnOnce(DbError) -> ApiError {
    move |err| match err {
        DbError::NotFound => ApiError::NotFound(format!("{entity} not found")),
        other => other.into(),
    }
}

/// Validator: ASCII letters only, non-empty.
pub(crate) fn alphabetic(value: &str) -> Result<(), ValidationError> {
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_alphabetic()) {
        return Ok(());
    }
    let mut error = ValidationError::new("alphabetic");
    error.message = Some("must contain letters only".into());
    Err(error)
}

/// Validator: ASCII digits only, non-empty.
pub(crate) fn digits(value: &str) -> Result<(), ValidationError> {
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
        return Ok(());
    }
    let mut error = ValidationError::new("digits");
    error.message = Some("must contain digits only".into());
    Err(error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_object_id_accepts_hex_and_rejects_junk() {
        let id = ObjectId::new();
        assert_eq!(parse_object_id(&id.to_hex()).unwrap(), id);
        assert!(matches!(
            parse_object_id("not-an-id"),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn missing_names_the_entity() {
        let err = missing("category")(DbError::NotFound);
        match err {
            ApiError::NotFound(msg) => assert_eq!(msg, "category not found"),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn alphabetic_and_digits_validators() {
        assert!(alphabetic("Food").is_ok());
        assert!(alphabetic("Food1").is_err());
        assert!(alphabetic("").is_err());
        assert!(digits("0171234567").is_ok());
        assert!(digits("0171-234").is_err());
        assert!(digits("").is_err());
    }
}
