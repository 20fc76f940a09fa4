//! Helpers for API controllers.
//!
//! Every API answer uses the same envelope:
//!
//! ```json
//! {
//!   "success": true,
//!   "message": "OK",
//!   "data": { ... },
//!   "timestamp": "2025-11-04 10:30:00"
//! }
//! ```
//!
//! Failures carry `errors` instead of `data`.

use chrono::Local;
use http::StatusCode;
use serde::Serialize;
use serde_json::Value;

use crate::response::Response;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The JSON body of every API response.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Value>,
    pub timestamp: String,
}

fn now() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// A successful envelope around `data`.
pub fn success<T: Serialize>(data: T, message: &str, status: StatusCode) -> Response {
    let body = Envelope {
        success: true,
        message: message.to_owned(),
        data: Some(data),
        errors: None,
        timestamp: now(),
    };
    Response::builder().status(status).json(&body)
}

/// A failed envelope, optionally with structured `errors`.
pub fn error(message: &str, status: StatusCode, errors: Option<Value>) -> Response {
    let body: Envelope<()> = Envelope {
        success: false,
        message: message.to_owned(),
        data: None,
        // Failures always carry the key, `null` when there is nothing to add.
        errors: Some(errors.unwrap_or(Value::Null)),
        timestamp: now(),
    };
    Response::builder().status(status).json(&body)
}

/// `404` with "`<resource>` not found".
pub fn not_found(resource: &str) -> Response {
    error(&format!("{resource} not found"), StatusCode::NOT_FOUND, None)
}

/// `422` with per-field messages.
pub fn validation_error(errors: Value) -> Response {
    error("Invalid input data", StatusCode::UNPROCESSABLE_ENTITY, Some(errors))
}
