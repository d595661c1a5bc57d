use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tile_quant::PixelError;

use crate::models::JobId;
use crate::services::WorkerClosed;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid worker message: {0}")]
    InvalidMessage(String),

    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    #[error("Job {job_id} failed: {message}")]
    JobFailed { job_id: JobId, message: String },

    #[error("Worker unavailable")]
    WorkerUnavailable,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// A job that was accepted but cannot produce a result.
///
/// Reported to the caller as an `error` notification for that job id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobError {
    #[error("no source image in request or session")]
    NoSource,

    #[error("{0}")]
    InvalidBlockSize(PixelError),

    #[error("could not decode source image: {0}")]
    Source(String),

    #[error("compute task failed: {0}")]
    TaskFailed(String),

    #[error("export failed: {0}")]
    Export(String),
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("PNG decode error: {0}")]
    PngDecode(String),

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("Unsupported PNG layout: {0}")]
    Unsupported(String),

    #[error("Invalid pixel data: {0}")]
    Pixels(#[from] PixelError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<WorkerClosed> for ApiError {
    fn from(_: WorkerClosed) -> Self {
        ApiError::WorkerUnavailable
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::InvalidMessage(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Image(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            ApiError::JobFailed { .. } => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            ApiError::WorkerUnavailable => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "status": status.as_u16(),
            "error": message,
        }));

        (status, body).into_response()
    }
}
