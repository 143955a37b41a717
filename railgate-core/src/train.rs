use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ReservationError;

/// Capacity record for one train: total seats and the seats still open.
///
/// `available_seats` is always `total_seats` minus the number of bookings
/// referencing this train; only the reservation transaction and a capacity
/// resize are allowed to move the counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Train {
    pub id: Uuid,
    pub name: String,
    pub source: String,
    pub destination: String,
    pub total_seats: i32,
    pub available_seats: i32,
    pub created_at: DateTime<Utc>,
}

/// Search result entry for a route query. Availability may be served from
/// the cache, so this is a distinct type from the stored record.
#[derive(Debug, Serialize)]
pub struct TrainOption {
    pub train_id: Uuid,
    pub name: String,
    pub source: String,
    pub destination: String,
    pub total_seats: i32,
    pub available_seats: i32,
}

impl Train {
    pub fn booked_seats(&self) -> i32 {
        self.total_seats - self.available_seats
    }

    pub fn has_availability(&self) -> bool {
        self.available_seats > 0
    }

    /// Recompute both counters for a new total capacity, preserving the
    /// booked count. Fails without producing a value when the new total
    /// would drop below the seats already committed to bookings.
    pub fn replan_capacity(&self, new_total: i32) -> Result<Train, ReservationError> {
        let booked = self.booked_seats();
        if new_total < booked {
            return Err(ReservationError::ShrinkBelowBooked {
                requested: new_total,
                booked,
            });
        }

        Ok(Train {
            total_seats: new_total,
            available_seats: new_total - booked,
            ..self.clone()
        })
    }
}
