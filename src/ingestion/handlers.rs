use super::types::*;
use crate::error::{SchedulerError, ValidationError};
use crate::scheduler::service::Scheduler;
use crate::scheduler::types::{IngestionId, is_valid_item_id};

use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use std::sync::Arc;

pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Builds the HTTP router in front of a shared scheduler.
pub fn router(scheduler: Arc<Scheduler>) -> Router {
    Router::new()
        .route(ENDPOINT_ROOT, get(handle_root))
        .route(ENDPOINT_HEALTH, get(handle_health))
        .route(ENDPOINT_INGEST, post(handle_ingest))
        .route(ENDPOINT_STATUS, get(handle_get_status))
        .layer(Extension(scheduler))
}

/// Checks every id against the accepted range and converts it to `u64`.
pub fn validate_ids(ids: &[i64]) -> Result<Vec<u64>, ValidationError> {
    ids.iter()
        .map(|&id| match u64::try_from(id) {
            Ok(id) if is_valid_item_id(id) => Ok(id),
            _ => Err(ValidationError::ItemIdOutOfRange { id }),
        })
        .collect()
}

fn bad_request(error: ValidationError) -> ApiError {
    tracing::warn!("Rejected ingestion: {}", error);
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(error)))
}

pub async fn handle_ingest(
    Extension(scheduler): Extension<Arc<Scheduler>>,
    payload: Result<Json<IngestRequest>, JsonRejection>,
) -> Result<Json<IngestResponse>, ApiError> {
    let Json(req) =
        payload.map_err(|e| bad_request(ValidationError::MalformedBody(e.body_text())))?;
    let ids = validate_ids(&req.ids).map_err(bad_request)?;

    let ingestion_id = scheduler.ingest(&ids, req.priority);

    Ok(Json(IngestResponse { ingestion_id }))
}

pub async fn handle_get_status(
    Extension(scheduler): Extension<Arc<Scheduler>>,
    Path(ingestion_id): Path<String>,
) -> Result<Json<IngestionStatusResponse>, ApiError> {
    let ingestion_id = IngestionId(ingestion_id);

    match scheduler.ingestion_status(&ingestion_id) {
        Ok(snapshot) => {
            tracing::debug!("Status query: {} -> {}", ingestion_id, snapshot.status);
            Ok(Json(snapshot.into()))
        }
        Err(e @ SchedulerError::IngestionNotFound(_)) => {
            tracing::debug!("Ingestion not found: {}", ingestion_id);
            Err((StatusCode::NOT_FOUND, Json(ErrorResponse::new(e))))
        }
        Err(e @ SchedulerError::BatchNotFound(_)) => {
            tracing::error!("Registry inconsistent for ingestion {}: {}", ingestion_id, e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::new(e))))
        }
    }
}

pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
    })
}

pub async fn handle_root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Priority batch ingestion service".to_string(),
    })
}
