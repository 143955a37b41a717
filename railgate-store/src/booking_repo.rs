use sqlx::PgPool;
use uuid::Uuid;

use railgate_core::booking::BookingDetails;
use railgate_core::ReservationError;

use crate::reservation::{lock_train, map_db_err};

#[derive(sqlx::FromRow)]
struct BookingDetailsRow {
    id: Uuid,
    train_id: Uuid,
    name: String,
    source: String,
    destination: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Book exactly one seat for the user, or fail with no persistent
    /// effect. Each call is a complete unit of work; on a transient failure
    /// the caller retries from scratch, never from a half-applied state.
    pub async fn reserve_seat(
        &self,
        train_id: Uuid,
        user_id: Uuid,
    ) -> Result<Uuid, ReservationError> {
        let locked = lock_train(&self.pool, train_id).await?;
        locked.reserve_seat(user_id).await
    }

    /// Booking joined with its train, scoped to the owning user. Plain
    /// read-committed lookup; no locking.
    pub async fn find_for_user(
        &self,
        booking_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<BookingDetails>, ReservationError> {
        let row: Option<BookingDetailsRow> = sqlx::query_as(
            "SELECT b.id, b.train_id, t.name, t.source, t.destination, b.created_at \
             FROM bookings b JOIN trains t ON b.train_id = t.id \
             WHERE b.id = $1 AND b.user_id = $2",
        )
        .bind(booking_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)?;

        Ok(row.map(|r| BookingDetails {
            id: r.id,
            train_id: r.train_id,
            name: r.name,
            source: r.source,
            destination: r.destination,
            created_at: r.created_at,
        }))
    }

    /// Bookings currently recorded against a train.
    pub async fn count_for_train(&self, train_id: Uuid) -> Result<i64, ReservationError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bookings WHERE train_id = $1")
            .bind(train_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_err)?;

        Ok(count)
    }
}
