pub mod booking;
pub mod error;
pub mod repository;
pub mod train;
pub mod user;

pub use error::ReservationError;
pub use train::{Train, TrainOption};
