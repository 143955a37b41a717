use thiserror::Error;

/// Failure taxonomy for the seat-reservation path and capacity resizes.
///
/// Business-rule failures (`TrainNotFound`, `SoldOut`, `ShrinkBelowBooked`)
/// are detected before any write and never retried. `Transient` covers
/// infrastructure faults the caller may retry from scratch (deadlock victim,
/// lock or pool timeout, dropped connection); `Storage` covers everything
/// that needs an operator instead of a retry.
#[derive(Debug, Error)]
pub enum ReservationError {
    #[error("Train not found.")]
    TrainNotFound,

    #[error("No seats available.")]
    SoldOut,

    #[error("Cannot set total seats to {requested} because {booked} seats are already booked.")]
    ShrinkBelowBooked { requested: i32, booked: i32 },

    #[error("transient store failure: {0}")]
    Transient(String),

    #[error("store failure: {0}")]
    Storage(String),
}

impl ReservationError {
    /// True for failures where a fresh attempt through the whole
    /// transaction is worth making.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ReservationError::Transient(_))
    }
}
