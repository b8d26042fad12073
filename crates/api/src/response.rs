//! Shared response envelope types for API handlers.
//!
//! All successful responses use a `{ "success": true, "result": ... }`
//! envelope. Errors are rendered by [`crate::error::AppError`] as
//! `{ "success": false, "code": ..., "message": ... }`.

use serde::Serialize;

/// Standard success envelope.
///
/// # Example
///
/// ```ignore
/// Ok(Json(ApiResponse::ok(menus)))
/// ```
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub result: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(result: T) -> Self {
        Self {
            success: true,
            result,
            message: None,
        }
    }

    pub fn with_message(result: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            result,
            message: Some(message.into()),
        }
    }
}
