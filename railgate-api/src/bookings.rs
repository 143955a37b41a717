use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use railgate_core::booking::BookingDetails;

use crate::{error::AppError, middleware::auth::CustomerClaims, state::AppState};

#[derive(Debug, Deserialize)]
struct BookSeatRequest {
    train_id: Uuid,
}

#[derive(Debug, Serialize)]
struct BookingResponse {
    booking_id: Uuid,
    status: String,
}

#[derive(Debug, Serialize)]
struct BookingLookupResponse {
    booking: BookingDetails,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", post(book_seat))
        .route("/bookings/{id}", get(get_booking))
}

/// POST /api/bookings
///
/// The whole reservation happens inside one store transaction; this handler
/// only translates the outcome. A transient failure maps to 503 and the
/// client retries the request from scratch.
async fn book_seat(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Json(req): Json<BookSeatRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::AuthenticationError("Invalid token subject.".to_string()))?;

    let booking_id = state
        .bookings
        .reserve_seat(req.train_id, user_id)
        .await
        .map_err(AppError::reservation)?;

    // Availability moved; drop the cached counter so searches re-seed from
    // the committed row.
    let _ = state
        .redis
        .delete_train_availability(&req.train_id.to_string())
        .await;

    info!("Booking confirmed: {}", booking_id);

    Ok((
        StatusCode::CREATED,
        Json(BookingResponse {
            booking_id,
            status: "CONFIRMED".to_string(),
        }),
    ))
}

/// GET /api/bookings/{id}
async fn get_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<BookingLookupResponse>, AppError> {
    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::AuthenticationError("Invalid token subject.".to_string()))?;

    let booking = state
        .bookings
        .find_for_user(booking_id, user_id)
        .await
        .map_err(AppError::reservation)?
        .ok_or_else(|| AppError::NotFoundError("Booking not found.".to_string()))?;

    Ok(Json(BookingLookupResponse { booking }))
}
