use sqlx::{PgPool, Postgres, Transaction};
use tracing::info;
use uuid::Uuid;

use railgate_core::{ReservationError, Train};

#[derive(sqlx::FromRow)]
pub(crate) struct TrainRow {
    pub id: Uuid,
    pub name: String,
    pub source: String,
    pub destination: String,
    pub total_seats: i32,
    pub available_seats: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<TrainRow> for Train {
    fn from(row: TrainRow) -> Self {
        Train {
            id: row.id,
            name: row.name,
            source: row.source,
            destination: row.destination,
            total_seats: row.total_seats,
            available_seats: row.available_seats,
            created_at: row.created_at,
        }
    }
}

/// A train row held under an exclusive `FOR UPDATE` lock, with its pending
/// writes staged on the owned transaction.
///
/// This is the only handle through which seat counters move: obtaining one
/// requires taking the lock, and both mutations consume the value, so the
/// lock-then-mutate-then-commit sequence cannot be reordered or repeated.
/// Dropping a `LockedTrain` without committing rolls the transaction back
/// and returns the connection to the pool.
pub struct LockedTrain {
    tx: Transaction<'static, Postgres>,
    train: Train,
}

/// Begin a transaction and lock the train row.
///
/// Concurrent calls for the same train queue behind the row lock; calls for
/// distinct trains proceed independently. Returns `TrainNotFound` without
/// having written anything when no such row exists.
pub async fn lock_train(pool: &PgPool, train_id: Uuid) -> Result<LockedTrain, ReservationError> {
    let mut tx = pool.begin().await.map_err(map_db_err)?;

    let row: Option<TrainRow> = sqlx::query_as(
        "SELECT id, name, source, destination, total_seats, available_seats, created_at \
         FROM trains WHERE id = $1 FOR UPDATE",
    )
    .bind(train_id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(map_db_err)?;

    match row {
        Some(row) => Ok(LockedTrain {
            tx,
            train: row.into(),
        }),
        None => {
            let _ = tx.rollback().await;
            Err(ReservationError::TrainNotFound)
        }
    }
}

impl LockedTrain {
    /// Consume one seat and write the paired booking, then commit.
    ///
    /// The decrement and the insert land in the same transaction: either
    /// both become durable or neither does. `SoldOut` is decided on the
    /// locked row, so two concurrent attempts can never both see the last
    /// seat.
    pub async fn reserve_seat(mut self, user_id: Uuid) -> Result<Uuid, ReservationError> {
        if !self.train.has_availability() {
            let _ = self.tx.rollback().await;
            return Err(ReservationError::SoldOut);
        }

        sqlx::query("UPDATE trains SET available_seats = available_seats - 1 WHERE id = $1")
            .bind(self.train.id)
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_err)?;

        let (booking_id,): (Uuid,) =
            sqlx::query_as("INSERT INTO bookings (user_id, train_id) VALUES ($1, $2) RETURNING id")
                .bind(user_id)
                .bind(self.train.id)
                .fetch_one(&mut *self.tx)
                .await
                .map_err(map_db_err)?;

        self.tx.commit().await.map_err(map_db_err)?;

        info!("Seat reserved on train {}: booking {}", self.train.id, booking_id);
        Ok(booking_id)
    }

    /// Rewrite both seat counters for a new total capacity, then commit.
    ///
    /// Runs under the same row lock as `reserve_seat`, so a resize cannot
    /// interleave with an in-flight reservation and compute the booked
    /// count from stale data.
    pub async fn resize(mut self, new_total: i32) -> Result<Train, ReservationError> {
        let resized = self.train.replan_capacity(new_total)?;

        sqlx::query("UPDATE trains SET total_seats = $1, available_seats = $2 WHERE id = $3")
            .bind(resized.total_seats)
            .bind(resized.available_seats)
            .bind(resized.id)
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_err)?;

        self.tx.commit().await.map_err(map_db_err)?;

        info!(
            "Train {} resized: {} total, {} available",
            resized.id, resized.total_seats, resized.available_seats
        );
        Ok(resized)
    }
}

/// Split infrastructure failures into retryable and terminal.
///
/// Deadlock victim (40P01), serialization failure (40001) and
/// lock-not-available (55P03) all clear on a fresh attempt, as do pool
/// acquisition timeouts and dropped connections. Everything else is
/// surfaced as a persistent storage failure.
pub(crate) fn map_db_err(err: sqlx::Error) -> ReservationError {
    match &err {
        sqlx::Error::Database(db) => match db.code().as_deref() {
            Some("40001") | Some("40P01") | Some("55P03") => {
                ReservationError::Transient(db.to_string())
            }
            _ => ReservationError::Storage(err.to_string()),
        },
        sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => {
            ReservationError::Transient(err.to_string())
        }
        _ => ReservationError::Storage(err.to_string()),
    }
}
