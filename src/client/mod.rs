// src/client/mod.rs
//
// Remote data-access client: the seam between the hotel state store and
// whatever backend serves the REST API. The store only ever talks to
// the `RemoteHotel` trait; `HttpHotelClient` is the production
// implementation, tests substitute an in-memory fake.

pub mod http;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{
    Guest, GuestHistoryEntry, Reservation, ReservationOutcome, Room, RoomStatus, RoomType, User,
};

/// Failures surfaced by the remote client. No retries, no
/// partial-success handling: every error propagates to the caller.
#[derive(Debug)]
pub enum ClientError {
    /// Transport-level failure (connect, timeout, read).
    Network(String),
    /// The server answered with a non-success status.
    Api { status: u16, message: String },
    /// The payload did not decode into the expected shape.
    Decode(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Network(msg) => write!(f, "network error: {msg}"),
            ClientError::Api { status, message } => write!(f, "api error ({status}): {message}"),
            ClientError::Decode(msg) => write!(f, "decode error: {msg}"),
        }
    }
}

impl std::error::Error for ClientError {}

/// Fields sent when provisioning a room.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomFields {
    pub number: String,
    #[serde(rename = "type")]
    pub room_type: RoomType,
    pub capacity: u32,
    pub beds: u32,
    pub price: f64,
    pub amenities: Vec<String>,
}

/// Partial room update; only the populated fields go on the wire.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub room_type: Option<RoomType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amenities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RoomStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginSession {
    pub user: User,
    pub token: String,
}

/// Everything the state store needs from a backend. Operations that
/// were multi-write sequences in older revisions (reserve, checkout,
/// cancel) are single calls here; the backend owns their atomicity.
pub trait RemoteHotel {
    fn list_rooms(&self) -> Result<Vec<Room>, ClientError>;
    fn create_room(&self, room: &RoomFields) -> Result<String, ClientError>;
    fn update_room(&self, id: &str, updates: &RoomUpdate) -> Result<(), ClientError>;
    fn delete_room(&self, id: &str) -> Result<(), ClientError>;

    fn list_future_reservations(&self) -> Result<Vec<Reservation>, ClientError>;
    /// Commit a booking: same-day check-in occupies the room, a future
    /// date creates a reservation; the ledger entry is appended either
    /// way, all in one backend transaction.
    fn commit_reservation(
        &self,
        room_id: &str,
        guest: &Guest,
    ) -> Result<(String, ReservationOutcome), ClientError>;
    fn cancel_reservation(&self, id: &str) -> Result<(), ClientError>;

    /// Check the occupying guest out: room back to available, guest
    /// cleared, active ledger entry completed.
    fn checkout(&self, room_id: &str) -> Result<(), ClientError>;
    fn add_expense(&self, room_id: &str, description: &str, value: f64)
        -> Result<(), ClientError>;

    fn list_guest_history(&self) -> Result<Vec<GuestHistoryEntry>, ClientError>;
    fn delete_guest_history(&self, id: &str) -> Result<(), ClientError>;

    fn login(&self, email: &str, password: &str) -> Result<LoginSession, ClientError>;
}
