// src/handlers/dashboard.rs

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
    response::IntoResponse,
};
use validator::Validate;

use crate::{error::AppError, models::quiz_result::StudentListParams, stats, store::SharedStore};

/// Summary metrics over every stored submission.
pub async fn get_stats(State(store): State<SharedStore>) -> Result<impl IntoResponse, AppError> {
    let stats = stats::dashboard_stats(store.as_ref()).await?;
    Ok(Json(stats))
}

/// Lists student records, newest first.
/// Supports an optional class filter and page-number pagination.
pub async fn list_students(
    State(store): State<SharedStore>,
    params: Result<Query<StudentListParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = params?;

    if let Err(validation_errors) = params.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let page = store
        .list(params.class_filter(), params.page, params.per_page)
        .await?;

    Ok(Json(page))
}

/// Deletes one student record. Unknown ids still report success.
pub async fn delete_student(
    State(store): State<SharedStore>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = id?;
    store.delete_by_id(id).await?;
    tracing::info!("Deleted quiz result {}", id);

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Deleted successfully"
    })))
}
