use std::sync::Arc;

use railgate_store::{BookingRepository, DbClient, PostgresTrainRepository, RedisClient, UserRepository};

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
    pub admin_api_key: String,
}

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbClient>,
    pub redis: Arc<RedisClient>,
    pub trains: Arc<PostgresTrainRepository>,
    pub bookings: Arc<BookingRepository>,
    pub users: Arc<UserRepository>,
    pub auth: AuthConfig,
}
