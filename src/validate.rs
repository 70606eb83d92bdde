// src/validate.rs
//
// Boundary validation, applied uniformly by the router after a body has
// been deserialized. Every failure is a BadRequest naming the field, so
// handlers never invent their own ad-hoc checks.

use crate::db::rooms::NewRoom;
use crate::domain::Guest;
use crate::errors::ServerError;

pub fn require_non_empty(field: &str, value: &str) -> Result<(), ServerError> {
    if value.trim().is_empty() {
        return Err(ServerError::BadRequest(format!("{field} is required")));
    }
    Ok(())
}

pub fn require_at_least(field: &str, value: u32, min: u32) -> Result<(), ServerError> {
    if value < min {
        return Err(ServerError::BadRequest(format!("{field} must be at least {min}")));
    }
    Ok(())
}

pub fn require_positive(field: &str, value: f64) -> Result<(), ServerError> {
    if !(value > 0.0) {
        return Err(ServerError::BadRequest(format!("{field} must be positive")));
    }
    Ok(())
}

pub fn validate_new_room(room: &NewRoom) -> Result<(), ServerError> {
    require_non_empty("number", &room.number)?;
    require_at_least("capacity", room.capacity, 1)?;
    require_at_least("beds", room.beds, 1)?;
    require_positive("price", room.price)
}

pub fn validate_guest(guest: &Guest) -> Result<(), ServerError> {
    require_non_empty("guest.name", &guest.name)?;
    require_at_least("guest.guests", guest.guests, 1)?;
    if guest.check_out < guest.check_in {
        return Err(ServerError::BadRequest(
            "guest.checkOut must not be before guest.checkIn".into(),
        ));
    }
    Ok(())
}

pub fn validate_credentials(email: &str, password: &str) -> Result<(), ServerError> {
    require_non_empty("email", email)?;
    require_non_empty("password", password)
}
