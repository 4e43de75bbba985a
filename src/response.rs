//! JSON response envelope shared by every non-health endpoint.

use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// `{success, data, error}` wrapper. Exactly one of `data` or `error` is
/// present, and `success` tells which.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_omits_error() {
        let value = serde_json::to_value(ApiResponse::ok(vec![1, 2])).unwrap();
        assert_eq!(value, json!({"success": true, "data": [1, 2]}));
    }

    #[test]
    fn test_error_omits_data() {
        let value = serde_json::to_value(ApiResponse::error("boom")).unwrap();
        assert_eq!(value, json!({"success": false, "error": "boom"}));
    }
}
