//! Uniform response envelope
//!
//! Every operation, success or failure, answers with the same JSON shape:
//!
//! ```json
//! { "code": 200, "data": ..., "message": "user details", "success": true }
//! ```
//!
//! `code` mirrors the HTTP status so clients reading only the body still
//! see it; `data` is null on errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// The wire envelope shared by all endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope {
    pub code: u16,
    pub data: serde_json::Value,
    pub message: String,
    pub success: bool,
}

/// Wraps a successful result.
pub fn ok<T: Serialize>(code: StatusCode, data: T, message: &str) -> Response {
    let body = Envelope {
        code: code.as_u16(),
        data: serde_json::to_value(data).unwrap_or(serde_json::Value::Null),
        message: message.to_string(),
        success: true,
    };
    (code, Json(body)).into_response()
}

/// Wraps a failure; used by the error type's `IntoResponse`.
pub fn fail(code: StatusCode, message: String) -> Response {
    let body = Envelope {
        code: code.as_u16(),
        data: serde_json::Value::Null,
        message,
        success: false,
    };
    (code, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_serializes_all_four_fields() {
        let envelope = Envelope {
            code: 201,
            data: serde_json::json!({"id": "abc"}),
            message: "created".to_string(),
            success: true,
        };
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["code"], 201);
        assert_eq!(value["data"]["id"], "abc");
        assert_eq!(value["message"], "created");
        assert_eq!(value["success"], true);
    }
}
