use std::net::SocketAddr;
use std::sync::Arc;

use railgate_api::{app, state::{AppState, AuthConfig}};
use railgate_store::{BookingRepository, DbClient, PostgresTrainRepository, RedisClient, UserRepository};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "railgate_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = railgate_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Railgate API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    let redis = RedisClient::new(&config.redis.url)
        .await
        .expect("Failed to connect to Redis");

    let trains = Arc::new(PostgresTrainRepository::new(db.pool.clone(), redis.clone()));
    let bookings = Arc::new(BookingRepository::new(db.pool.clone()));
    let users = Arc::new(UserRepository::new(db.pool.clone()));

    let app_state = AppState {
        db: Arc::new(db),
        redis: Arc::new(redis),
        trains,
        bookings,
        users,
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
            admin_api_key: config.auth.admin_api_key.clone(),
        },
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}
