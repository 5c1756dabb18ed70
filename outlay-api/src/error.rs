//! Error handling for the API server
//!
//! One unified error type that every handler returns and that maps onto
//! the response envelope. Validation and ID-parsing failures are raised at
//! the handler boundary before any storage call; storage errors propagate
//! here without retries.

use crate::response;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use outlay_shared::db::DbError;
use outlay_shared::query::FilterError;
use std::fmt;
use validator::Validate;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Malformed ID, date, boolean, or otherwise bad input (400)
    BadRequest(String),

    /// Field-level validation failures (400)
    Validation(Vec<FieldError>),

    /// Referenced entity absent, or zero rows affected (404)
    NotFound(String),

    /// Unexpected storage-driver failure (500)
    Internal(String),

    /// Storage connection not available (503)
    Unavailable(String),
}

/// One failed field from request validation.
#[derive(Debug, Clone)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "bad request: {}", msg),
            ApiError::Validation(errors) => {
                write!(f, "validation failed: {} field(s)", errors.len())
            }
            ApiError::NotFound(msg) => write!(f, "not found: {}", msg),
            ApiError::Internal(msg) => write!(f, "internal error: {}", msg),
            ApiError::Unavailable(msg) => write!(f, "unavailable: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Validation(errors) => {
                let joined = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect::<Vec<_>>()
                    .join(", ");
                (StatusCode::BAD_REQUEST, joined)
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => {
                // Log the details, hand the client the underlying message
                // without a stack of driver context.
                tracing::error!("internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            ApiError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };

        response::fail(status, message)
    }
}

/// Convert storage errors to API errors
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound => ApiError::NotFound("document not found".to_string()),
            DbError::Connection(e) => ApiError::Unavailable(e.to_string()),
            DbError::Driver(e) => ApiError::Internal(e.to_string()),
            DbError::Decode(msg) => ApiError::Internal(msg),
        }
    }
}

/// Convert filter-building errors to API errors
impl From<FilterError> for ApiError {
    fn from(err: FilterError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

/// Runs derive-based validation and flattens the result into field errors.
///
/// Handlers call this on every inbound body before touching storage.
pub fn validate<T: Validate>(input: &T) -> ApiResult<()> {
    let errors = match input.validate() {
        Ok(()) => return Ok(()),
        Err(errors) => errors,
    };

    let mut fields = Vec::new();
    for (field, failures) in errors.field_errors() {
        for failure in failures {
            let message = failure
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("failed `{}` validation", failure.code));
            fields.push(FieldError {
                field: field.to_string(),
                message,
            });
        }
    }
    Err(ApiError::Validation(fields))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn display_is_terse() {
        let err = ApiError::BadRequest("invalid id".to_string());
        assert_eq!(err.to_string(), "bad request: invalid id");

        let err = ApiError::Validation(vec![FieldError {
            field: "email".to_string(),
            message: "not an email".to_string(),
        }]);
        assert_eq!(err.to_string(), "validation failed: 1 field(s)");
    }

    #[test]
    fn db_not_found_maps_to_not_found() {
        let err: ApiError = DbError::NotFound.into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn filter_errors_map_to_bad_request() {
        let err: ApiError = FilterError::MissingBound("end").into();
        match err {
            ApiError::BadRequest(msg) => assert!(msg.contains("end")),
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[derive(Deserialize, Validate)]
    struct Probe {
        #[validate(email(message = "must be a valid email"))]
        email: String,
    }

    #[test]
    fn validate_flattens_field_errors() {
        let probe = Probe {
            email: "not-an-email".to_string(),
        };
        match validate(&probe) {
            Err(ApiError::Validation(fields)) => {
                assert_eq!(fields.len(), 1);
                assert_eq!(fields[0].field, "email");
                assert_eq!(fields[0].message, "must be a valid email");
            }
            other => panic!("expected validation error, got {:?}", other),
        }

        let probe = Probe {
            email: "user@example.com".to_string(),
        };
        assert!(validate(&probe).is_ok());
    }
}
