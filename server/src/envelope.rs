//! Uniform response body shared by every endpoint.
//!
//! ```json
//! {"status": "ok", "data": [...]}
//! {"status": "error", "data": null, "error_message": "name cannot be empty"}
//! ```

use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status: Status,
    /// Always present on the wire; `null` when there is nothing to return.
    pub data: Option<T>,
    /// Omitted entirely on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: Status::Ok,
            data: Some(data),
            error_message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            data: None,
            error_message: Some(message.into()),
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_omits_error_message() {
        let json = serde_json::to_value(Envelope::ok("token")).unwrap();
        assert_eq!(json, serde_json::json!({"status": "ok", "data": "token"}));
    }

    #[test]
    fn error_keeps_null_data() {
        let json = serde_json::to_value(Envelope::<()>::error("boom")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "error", "data": null, "error_message": "boom"})
        );
    }

    #[test]
    fn parses_envelope_without_error_message() {
        let env: Envelope<Vec<u32>> =
            serde_json::from_str(r#"{"status":"ok","data":[1,2]}"#).unwrap();
        assert_eq!(env.status, Status::Ok);
        assert_eq!(env.data, Some(vec![1, 2]));
        assert!(env.error_message.is_none());
    }
}
