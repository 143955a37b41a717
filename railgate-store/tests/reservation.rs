//! Exercises the reservation transaction against a real Postgres.
//!
//! These tests are ignored by default so the suite stays green on machines
//! without a database. To run them, point DATABASE_URL at a scratch
//! database and use `cargo test -p railgate-store -- --ignored`.

use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use railgate_core::ReservationError;
use railgate_store::{BookingRepository, DbClient};

async fn connect() -> DbClient {
    let url = std::env::var("DATABASE_URL").expect("set DATABASE_URL to run the store tests");
    let db = DbClient::new(&url).await.expect("failed to connect to Postgres");
    db.migrate().await.expect("failed to run migrations");
    db
}

async fn seed_train(pool: &PgPool, total: i32) -> Uuid {
    let (id,): (Uuid,) = sqlx::query_as(
        "INSERT INTO trains (name, source, destination, total_seats, available_seats) \
         VALUES ($1, 'GLA', 'EUS', $2, $2) RETURNING id",
    )
    .bind(format!("test-train-{}", Uuid::new_v4()))
    .bind(total)
    .fetch_one(pool)
    .await
    .expect("failed to seed train");
    id
}

async fn seed_user(pool: &PgPool) -> Uuid {
    let (id,): (Uuid,) = sqlx::query_as(
        "INSERT INTO users (username, password_hash) VALUES ($1, 'x') RETURNING id",
    )
    .bind(format!("test-user-{}", Uuid::new_v4()))
    .fetch_one(pool)
    .await
    .expect("failed to seed user");
    id
}

async fn seat_counters(pool: &PgPool, train_id: Uuid) -> (i32, i32) {
    sqlx::query_as("SELECT total_seats, available_seats FROM trains WHERE id = $1")
        .bind(train_id)
        .fetch_one(pool)
        .await
        .expect("train row missing")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "requires a running Postgres (set DATABASE_URL)"]
async fn concurrent_reservations_never_oversell() {
    let db = connect().await;
    let train_id = seed_train(&db.pool, 5).await;
    let user_id = seed_user(&db.pool).await;

    let repo = Arc::new(BookingRepository::new(db.pool.clone()));

    let mut handles = Vec::new();
    for _ in 0..12 {
        let repo = repo.clone();
        handles.push(tokio::spawn(async move {
            repo.reserve_seat(train_id, user_id).await
        }));
    }

    let mut booked = 0;
    let mut sold_out = 0;
    for handle in handles {
        match handle.await.expect("task panicked") {
            Ok(_) => booked += 1,
            Err(ReservationError::SoldOut) => sold_out += 1,
            Err(other) => panic!("unexpected failure: {other:?}"),
        }
    }

    assert_eq!(booked, 5);
    assert_eq!(sold_out, 7);

    // Every successful decrement is paired with exactly one booking row.
    let (total, available) = seat_counters(&db.pool, train_id).await;
    let recorded = repo.count_for_train(train_id).await.unwrap();
    assert_eq!(available, 0);
    assert_eq!(recorded, (total - available) as i64);
}

#[tokio::test]
#[ignore = "requires a running Postgres (set DATABASE_URL)"]
async fn missing_train_leaves_no_trace() {
    let db = connect().await;
    let user_id = seed_user(&db.pool).await;
    let repo = BookingRepository::new(db.pool.clone());

    let ghost = Uuid::new_v4();
    let err = repo.reserve_seat(ghost, user_id).await.unwrap_err();
    assert!(matches!(err, ReservationError::TrainNotFound));

    assert_eq!(repo.count_for_train(ghost).await.unwrap(), 0);
}

#[tokio::test]
#[ignore = "requires a running Postgres (set DATABASE_URL)"]
async fn sold_out_rolls_back_cleanly() {
    let db = connect().await;
    let train_id = seed_train(&db.pool, 1).await;
    let user_id = seed_user(&db.pool).await;
    let repo = BookingRepository::new(db.pool.clone());

    repo.reserve_seat(train_id, user_id).await.unwrap();

    let err = repo.reserve_seat(train_id, user_id).await.unwrap_err();
    assert!(matches!(err, ReservationError::SoldOut));

    // The failed attempt wrote nothing and the counters did not drift.
    let (total, available) = seat_counters(&db.pool, train_id).await;
    assert_eq!((total, available), (1, 0));
    assert_eq!(repo.count_for_train(train_id).await.unwrap(), 1);
}

#[tokio::test]
#[ignore = "requires a running Postgres (set DATABASE_URL)"]
async fn resize_enforces_booked_floor() {
    use railgate_store::lock_train;

    let db = connect().await;
    let train_id = seed_train(&db.pool, 10).await;
    let user_id = seed_user(&db.pool).await;
    let repo = BookingRepository::new(db.pool.clone());

    for _ in 0..3 {
        repo.reserve_seat(train_id, user_id).await.unwrap();
    }

    // 3 booked: shrinking to 5 is fine, shrinking to 2 is not.
    let resized = lock_train(&db.pool, train_id)
        .await
        .unwrap()
        .resize(5)
        .await
        .unwrap();
    assert_eq!(resized.total_seats, 5);
    assert_eq!(resized.available_seats, 2);

    let err = lock_train(&db.pool, train_id)
        .await
        .unwrap()
        .resize(2)
        .await
        .unwrap_err();
    assert!(matches!(err, ReservationError::ShrinkBelowBooked { booked: 3, .. }));

    // The rejected resize changed nothing.
    assert_eq!(seat_counters(&db.pool, train_id).await, (5, 2));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "requires a running Postgres (set DATABASE_URL)"]
async fn distinct_trains_do_not_interfere() {
    let db = connect().await;
    let train_a = seed_train(&db.pool, 3).await;
    let train_b = seed_train(&db.pool, 3).await;
    let user_id = seed_user(&db.pool).await;

    let repo = Arc::new(BookingRepository::new(db.pool.clone()));

    let mut handles = Vec::new();
    for i in 0..6 {
        let repo = repo.clone();
        let train = if i % 2 == 0 { train_a } else { train_b };
        handles.push(tokio::spawn(async move {
            repo.reserve_seat(train, user_id).await
        }));
    }

    for handle in handles {
        handle.await.expect("task panicked").expect("reservation failed");
    }

    assert_eq!(seat_counters(&db.pool, train_a).await.1, 0);
    assert_eq!(seat_counters(&db.pool, train_b).await.1, 0);
    assert_eq!(repo.count_for_train(train_a).await.unwrap(), 3);
    assert_eq!(repo.count_for_train(train_b).await.unwrap(), 3);
}
