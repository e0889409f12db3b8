use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

pub const MESSAGE_SUCCESS: &str = "success";
pub const MESSAGE_ERROR: &str = "error";

#[derive(Debug, Serialize)]
pub struct SuccessBody<T> {
    pub message: &'static str,
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: &'static str,
    pub error: String,
}

pub fn success<T: Serialize>(data: T) -> Response {
    (
        StatusCode::OK,
        Json(SuccessBody {
            message: MESSAGE_SUCCESS,
            data,
        }),
    )
        .into_response()
}

pub fn error_body(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            message: MESSAGE_ERROR,
            error: error.into(),
        }),
    )
        .into_response()
}
