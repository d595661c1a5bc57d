use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};

use crate::error::ApiError;
use crate::models::{WorkerEvent, WorkerMessage};
use crate::services::{Request, WorkerHandle};

/// Send a message to the worker
///
/// `process` waits for the job and returns its `result` event. `cancel`
/// returns immediately. `generateExport` returns the PNG file for the last
/// emitted job. A job that was superseded, cancelled, or has nothing to
/// export answers with 204. A PNG source is decoded by the worker, so one
/// that fails to decode is reported as a job error.
#[utoipa::path(
    post,
    path = "/api/worker",
    request_body = WorkerMessage,
    responses(
        (status = 200, description = "Job result, or the exported PNG file", body = WorkerEvent),
        (status = 202, description = "Cancel accepted"),
        (status = 204, description = "Superseded, cancelled, or nothing to export"),
        (status = 400, description = "Malformed message or raw source buffer"),
        (status = 422, description = "Job failed, including undecodable PNG sources"),
        (status = 503, description = "Worker unavailable"),
    ),
    tag = "Worker"
)]
pub async fn handle_worker(
    State(worker): State<WorkerHandle>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let message: WorkerMessage =
        serde_json::from_slice(&body).map_err(|e| ApiError::InvalidMessage(e.to_string()))?;

    let request = Request::from_message(message)?;

    let job_id = request.job_id();
    if let Request::Cancel(_) = request {
        worker.send(request)?;
        tracing::info!(job_id = %job_id, "Cancel requested");
        return Ok(StatusCode::ACCEPTED.into_response());
    }

    let wants_export = matches!(request, Request::Export(_));
    let Some(event) = worker.post(request)?.recv().await else {
        tracing::info!(job_id = %job_id, "No notification for request");
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    match event {
        WorkerEvent::Error(failure) => Err(ApiError::JobFailed {
            job_id: failure.job_id,
            message: failure.message,
        }),
        WorkerEvent::ExportFile(file) if wants_export => {
            tracing::info!(job_id = %job_id, size_bytes = file.file_bytes.len(), "Export served");
            Ok((
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "image/png".to_string()),
                    (header::CONTENT_LENGTH, file.file_bytes.len().to_string()),
                ],
                Bytes::from(file.file_bytes),
            )
                .into_response())
        }
        event @ WorkerEvent::Result(_) if !wants_export => {
            tracing::info!(job_id = %job_id, "Job result served");
            Ok(Json(event).into_response())
        }
        other => Err(ApiError::Internal(format!(
            "unexpected worker event for job {}",
            other.job_id()
        ))),
    }
}
