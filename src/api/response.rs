use axum::Json;
use axum::http::StatusCode;
use serde_json::Value;

use crate::api::models::RelayReply;

// The relay always answers 200: callers read `success`, not the status line.
pub fn success(data: Value) -> (StatusCode, Json<RelayReply>) {
    (
        StatusCode::OK,
        Json(RelayReply {
            success: true,
            data: Some(data),
            error: None,
        }),
    )
}

pub fn failure(message: String) -> (StatusCode, Json<RelayReply>) {
    (
        StatusCode::OK,
        Json(RelayReply {
            success: false,
            data: None,
            error: Some(message),
        }),
    )
}
