use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Booking joined with its train, as returned by the detail lookup.
///
/// Bookings are immutable once written: the row is inserted in the same
/// transaction that decrements the train's availability and is never
/// updated or deleted afterwards.
#[derive(Debug, Serialize)]
pub struct BookingDetails {
    pub id: Uuid,
    pub train_id: Uuid,
    pub name: String,
    pub source: String,
    pub destination: String,
    pub created_at: DateTime<Utc>,
}
