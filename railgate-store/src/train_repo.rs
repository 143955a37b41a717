use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use railgate_core::repository::TrainDirectory;
use railgate_core::{ReservationError, Train, TrainOption};

use crate::redis_repo::RedisClient;
use crate::reservation::{lock_train, map_db_err, TrainRow};

pub struct PostgresTrainRepository {
    pub pool: PgPool,
    pub redis: RedisClient,
}

impl PostgresTrainRepository {
    pub fn new(pool: PgPool, redis: RedisClient) -> Self {
        Self { pool, redis }
    }

    /// Register a new train. Every seat starts available.
    pub async fn create(
        &self,
        name: &str,
        source: &str,
        destination: &str,
        total_seats: i32,
    ) -> Result<Train, ReservationError> {
        let row: TrainRow = sqlx::query_as(
            "INSERT INTO trains (name, source, destination, total_seats, available_seats) \
             VALUES ($1, $2, $3, $4, $4) \
             RETURNING id, name, source, destination, total_seats, available_seats, created_at",
        )
        .bind(name)
        .bind(source)
        .bind(destination)
        .bind(total_seats)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_err)?;

        Ok(row.into())
    }

    /// Change a train's total capacity, keeping the booked count intact.
    /// Takes the same row lock as the reservation path so the booked count
    /// is never derived from a row that a reservation is mid-way through
    /// updating.
    pub async fn resize(&self, train_id: Uuid, new_total: i32) -> Result<Train, ReservationError> {
        let locked = lock_train(&self.pool, train_id).await?;
        locked.resize(new_total).await
    }
}

#[async_trait]
impl TrainDirectory for PostgresTrainRepository {
    async fn find_by_route(
        &self,
        source: &str,
        destination: &str,
    ) -> Result<Vec<TrainOption>, Box<dyn std::error::Error + Send + Sync>> {
        let rows: Vec<TrainRow> = sqlx::query_as(
            "SELECT id, name, source, destination, total_seats, available_seats, created_at \
             FROM trains WHERE source = $1 AND destination = $2 ORDER BY name",
        )
        .bind(source)
        .bind(destination)
        .fetch_all(&self.pool)
        .await?;

        let mut options = Vec::new();

        for row in rows {
            // Availability is cache-aside: serve the cached counter when
            // present, otherwise seed it from the row just read.
            let cached: Option<i32> = self
                .redis
                .get_train_availability(&row.id.to_string())
                .await
                .ok()
                .flatten();

            let available = match cached {
                Some(count) => count,
                None => {
                    let _ = self
                        .redis
                        .set_train_availability(&row.id.to_string(), row.available_seats)
                        .await;
                    row.available_seats
                }
            };

            options.push(TrainOption {
                train_id: row.id,
                name: row.name,
                source: row.source,
                destination: row.destination,
                total_seats: row.total_seats,
                available_seats: available,
            });
        }

        Ok(options)
    }
}
