use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use railgate_core::repository::TrainDirectory;
use railgate_core::{Train, TrainOption};

use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct AddTrainRequest {
    pub name: String,
    pub source: String,
    pub destination: String,
    pub total_seats: i32,
}

#[derive(Debug, Deserialize)]
pub struct ResizeTrainRequest {
    pub total_seats: i32,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub source: Option<String>,
    pub destination: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub trains: Vec<TrainOption>,
}

pub fn public_routes() -> Router<AppState> {
    Router::new().route("/trains", get(search_trains))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/trains", post(add_train))
        .route("/admin/trains/{id}/seats", put(resize_train))
}

/// POST /api/admin/trains
async fn add_train(
    State(state): State<AppState>,
    Json(req): Json<AddTrainRequest>,
) -> Result<(StatusCode, Json<Train>), AppError> {
    if req.name.is_empty() || req.source.is_empty() || req.destination.is_empty() {
        return Err(AppError::ValidationError(
            "All fields are required: name, source, destination, total_seats".to_string(),
        ));
    }
    if req.total_seats < 0 {
        return Err(AppError::ValidationError(
            "total_seats must be a non-negative number.".to_string(),
        ));
    }

    let train = state
        .trains
        .create(&req.name, &req.source, &req.destination, req.total_seats)
        .await
        .map_err(AppError::reservation)?;

    info!("Train added: {} ({} -> {})", train.id, train.source, train.destination);

    Ok((StatusCode::CREATED, Json(train)))
}

/// PUT /api/admin/trains/{id}/seats
async fn resize_train(
    State(state): State<AppState>,
    Path(train_id): Path<Uuid>,
    Json(req): Json<ResizeTrainRequest>,
) -> Result<Json<Train>, AppError> {
    if req.total_seats < 0 {
        return Err(AppError::ValidationError(
            "total_seats must be a non-negative number.".to_string(),
        ));
    }

    let train = state
        .trains
        .resize(train_id, req.total_seats)
        .await
        .map_err(AppError::reservation)?;

    // The committed row is authoritative now; let the next search re-seed.
    let _ = state
        .redis
        .delete_train_availability(&train_id.to_string())
        .await;

    Ok(Json(train))
}

/// GET /api/trains?source=GLA&destination=EUS
async fn search_trains(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, AppError> {
    let (source, destination) = match (query.source, query.destination) {
        (Some(s), Some(d)) => (s, d),
        _ => {
            return Err(AppError::ValidationError(
                "source and destination query parameters are required.".to_string(),
            ))
        }
    };

    let trains = TrainDirectory::find_by_route(state.trains.as_ref(), &source, &destination)
        .await
        .map_err(|e| {
            info!("Search failed: {}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    Ok(Json(SearchResponse { trains }))
}
