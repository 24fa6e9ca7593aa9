use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use serde_json::json;
use thiserror::Error;
use tracing::debug;

/// Failures raised by the slot engine itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    #[error("malformed slot identifier '{0}', expected YYYY-MM-DDTHH:00")]
    MalformedSlot(String),
    #[error("hour {0} is out of range (0-23)")]
    HourOutOfRange(u8),
    #[error("a session on {0} cannot run past midnight")]
    DateOutOfRange(NaiveDate),
    #[error("year {0} cannot be written as YYYY")]
    YearOutOfRange(i32),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Slot(#[from] SlotError),
    #[error("Invalid input: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match self {
            AppError::Slot(e) => e.to_string(),
            AppError::BadRequest(msg) => msg,
        };
        debug!("rejected request: {}", message);

        (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}
