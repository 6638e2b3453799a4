use serde_json::{json, Value};
use vercel_runtime::{Body, Response, StatusCode};

use crate::error::AppError;

/// Every failure leaves as `{ "error": "<message>" }`.
pub fn error_response(err: &AppError) -> (StatusCode, Value) {
    let status = match err {
        AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        AppError::Config(_)
        | AppError::Provider(_)
        | AppError::Network(_)
        | AppError::Parse(_)
        | AppError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, json!({ "error": err.to_string() }))
}

pub fn json_response<T: serde::Serialize>(status: StatusCode, value: &T) -> anyhow::Result<Response<Body>> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(serde_json::to_string(value)?.into())?)
}

pub fn empty_response(status: StatusCode) -> anyhow::Result<Response<Body>> {
    Ok(Response::builder().status(status).body(Body::Empty)?)
}
