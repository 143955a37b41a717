pub mod app_config;
pub mod booking_repo;
pub mod database;
pub mod redis_repo;
pub mod reservation;
pub mod train_repo;
pub mod user_repo;

pub use booking_repo::BookingRepository;
pub use database::DbClient;
pub use redis_repo::RedisClient;
pub use reservation::{lock_train, LockedTrain};
pub use train_repo::PostgresTrainRepository;
pub use user_repo::UserRepository;
