//! Success envelope: `{ "success": true, "data": ..., "message"?: ... }`.

use axum::{Json, http::StatusCode};
use serde::Serialize;

/// Body of every successful response.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Always `true`.
    pub success: bool,
    /// Short human readable note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    /// Payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// 200 with `data`.
pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        success: true,
        message: None,
        data: Some(data),
    })
}

/// 201 with `data` and a message.
pub fn created<T: Serialize>(message: &'static str, data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (
        StatusCode::CREATED,
        Json(ApiResponse {
            success: true,
            message: Some(message),
            data: Some(data),
        }),
    )
}

/// 200 with only a message.
pub fn message(message: &'static str) -> Json<ApiResponse<()>> {
    Json(ApiResponse {
        success: true,
        message: Some(message),
        data: None,
    })
}
