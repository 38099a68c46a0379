// src/handlers/quiz.rs

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{error::AppError, models::quiz_result::SubmitRequest, store::SharedStore};

/// Records one quiz submission.
///
/// Missing `userInfo` fields default to empty strings, a missing score to 0,
/// missing answers to an empty sheet and a missing `submitTime` to now.
pub async fn submit_result(
    State(store): State<SharedStore>,
    payload: Result<Json<SubmitRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;

    let id = store.insert(req.into()).await?;
    tracing::info!("Recorded quiz result {}", id);

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "success": true,
            "id": id,
            "message": "Submitted successfully"
        })),
    ))
}
