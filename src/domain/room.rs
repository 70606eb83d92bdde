// src/domain/room.rs
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::guest::Guest;

/// Room categories offered by the hotel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomType {
    Solteiro,
    Casal,
    Triplo,
    #[serde(rename = "Suíte")]
    Suite,
    #[serde(rename = "Suíte Premium")]
    SuitePremium,
}

impl RoomType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomType::Solteiro => "Solteiro",
            RoomType::Casal => "Casal",
            RoomType::Triplo => "Triplo",
            RoomType::Suite => "Suíte",
            RoomType::SuitePremium => "Suíte Premium",
        }
    }

    pub fn parse(s: &str) -> Option<RoomType> {
        match s {
            "Solteiro" => Some(RoomType::Solteiro),
            "Casal" => Some(RoomType::Casal),
            "Triplo" => Some(RoomType::Triplo),
            "Suíte" => Some(RoomType::Suite),
            "Suíte Premium" => Some(RoomType::SuitePremium),
            _ => None,
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Available,
    Occupied,
    Maintenance,
    Reserved,
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomStatus::Available => "available",
            RoomStatus::Occupied => "occupied",
            RoomStatus::Maintenance => "maintenance",
            RoomStatus::Reserved => "reserved",
        }
    }

}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single room as exposed over the wire.
///
/// Invariant: `guest` is populated iff `status == Occupied`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    pub number: String,
    #[serde(rename = "type")]
    pub room_type: RoomType,
    pub capacity: u32,
    pub beds: u32,
    /// Nightly rate per person.
    pub price: f64,
    pub amenities: Vec<String>,
    pub status: RoomStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest: Option<Guest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

/// Built-in fallback room set the store installs when the very first
/// synchronization fails, so the dashboard is never empty.
pub fn default_rooms() -> Vec<Room> {
    fn room(number: &str, room_type: RoomType, capacity: u32, beds: u32, price: f64, amenities: &[&str]) -> Room {
        Room {
            id: format!("room_{number}"),
            number: number.to_string(),
            room_type,
            capacity,
            beds,
            price,
            amenities: amenities.iter().map(|a| a.to_string()).collect(),
            status: RoomStatus::Available,
            guest: None,
            updated_at: None,
        }
    }

    vec![
        room("101", RoomType::Solteiro, 1, 1, 80.0, &["wifi", "tv"]),
        room("102", RoomType::Casal, 2, 1, 120.0, &["wifi", "tv", "ar-condicionado"]),
        room("103", RoomType::Triplo, 3, 2, 150.0, &["wifi", "tv", "minibar"]),
        room("104", RoomType::Solteiro, 1, 1, 80.0, &["wifi", "tv"]),
        room("105", RoomType::Casal, 2, 1, 120.0, &["wifi", "tv"]),
    ]
}
