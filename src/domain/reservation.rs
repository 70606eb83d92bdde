// src/domain/reservation.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::guest::Guest;
use crate::domain::room::RoomType;

/// A future, not-yet-checked-in booking. Exists only while the booking
/// is in the future and uncancelled; same-day check-ins never produce
/// one (the room is occupied directly).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: String,
    pub room_id: String,
    pub guest: Guest,
    pub created_at: i64,
}

/// How a committed reservation landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationOutcome {
    /// Check-in was today or earlier: the room went straight to occupied.
    CheckedIn,
    /// Future booking: a reservation row was created, room untouched.
    Reserved,
}

/// Lifecycle status of a guest-history ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryStatus {
    Active,
    Completed,
    Cancelled,
}

impl HistoryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryStatus::Active => "active",
            HistoryStatus::Completed => "completed",
            HistoryStatus::Cancelled => "cancelled",
        }
    }

}

/// Append-mostly ledger record of a stay. Created when a reservation is
/// committed, transitioned to completed/cancelled by checkout and
/// cancellation, otherwise immutable.
///
/// `room_id` (and `reservation_id` for future bookings) tie the entry to
/// its owner explicitly, so checkout and cancellation never have to match
/// on guest name strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestHistoryEntry {
    pub id: String,
    pub room_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reservation_id: Option<String>,
    pub guest: Guest,
    pub room_number: String,
    pub room_type: RoomType,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub total_price: f64,
    pub status: HistoryStatus,
    pub created_at: i64,
}
