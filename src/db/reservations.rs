// src/db/reservations.rs
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::history::{self, NewHistoryEntry};
use crate::db::{fresh_id, rooms};
use crate::domain::pricing::{is_future_check_in, total_stay_price};
use crate::domain::{Guest, Reservation, ReservationOutcome, RoomStatus};
use crate::errors::ServerError;

fn reservation_from_row(row: &Row) -> rusqlite::Result<Reservation> {
    let guest_json: String = row.get(2)?;
    let guest: Guest = serde_json::from_str(&guest_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Reservation {
        id: row.get(0)?,
        room_id: row.get(1)?,
        guest,
        created_at: row.get(3)?,
    })
}

pub fn list_future_reservations(conn: &Connection) -> Result<Vec<Reservation>, ServerError> {
    let mut stmt = conn
        .prepare(
            "select id, room_id, guest_data, created_at from reservations order by created_at desc",
        )
        .map_err(|e| ServerError::DbError(format!("prepare reservations failed: {e}")))?;

    let rows = stmt
        .query_map([], reservation_from_row)
        .map_err(|e| ServerError::DbError(format!("query reservations failed: {e}")))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r.map_err(|e| ServerError::DbError(format!("read reservation row failed: {e}")))?);
    }
    Ok(out)
}

pub fn get_reservation(conn: &Connection, id: &str) -> Result<Option<Reservation>, ServerError> {
    conn.query_row(
        "select id, room_id, guest_data, created_at from reservations where id = ?",
        params![id],
        reservation_from_row,
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("reservation lookup failed: {e}")))
}

/// The single domain-level commit for a booking. One transaction covers
/// the room/reservation write and the ledger append, so a failure can
/// never leave the ledger out of step with the live state.
///
/// Check-in today or earlier occupies the room immediately; a strictly
/// future check-in creates a reservation row and leaves the room's own
/// status untouched ("reserved" is a view-time overlay, not a persisted
/// status).
pub fn commit_reservation(
    conn: &mut Connection,
    room_id: &str,
    guest: &Guest,
    today: NaiveDate,
    now: i64,
) -> Result<(String, ReservationOutcome), ServerError> {
    let tx = conn
        .transaction()
        .map_err(|e| ServerError::DbError(format!("begin transaction failed: {e}")))?;

    let room = rooms::get_room(&tx, room_id)?.ok_or(ServerError::NotFound)?;

    let guest_json = serde_json::to_string(guest)
        .map_err(|e| ServerError::DbError(format!("encode guest failed: {e}")))?;

    let (id, outcome, reservation_id) = if is_future_check_in(guest.check_in, today) {
        let id = fresh_id("reservation", now);
        tx.execute(
            "insert into reservations (id, room_id, guest_data, created_at) values (?, ?, ?, ?)",
            params![id, room_id, guest_json, now],
        )
        .map_err(|e| ServerError::DbError(format!("insert reservation failed: {e}")))?;
        (id.clone(), ReservationOutcome::Reserved, Some(id))
    } else {
        tx.execute(
            "update rooms set status = ?, guest_data = ?, updated_at = ? where id = ?",
            params![RoomStatus::Occupied.as_str(), guest_json, now, room_id],
        )
        .map_err(|e| ServerError::DbError(format!("occupy room failed: {e}")))?;
        (room_id.to_string(), ReservationOutcome::CheckedIn, None)
    };

    let total_price = total_stay_price(
        room.price,
        guest.guests,
        guest.check_in,
        guest.check_out,
        &guest.expenses,
    );

    history::append_history(
        &tx,
        &NewHistoryEntry {
            room_id,
            reservation_id: reservation_id.as_deref(),
            guest,
            room_number: &room.number,
            room_type: room.room_type,
            check_in: guest.check_in,
            check_out: guest.check_out,
            total_price,
        },
        now,
    )?;

    tx.commit()
        .map_err(|e| ServerError::DbError(format!("commit failed: {e}")))?;

    Ok((id, outcome))
}

/// Cancel a future booking: the active ledger entry referencing the
/// reservation is marked cancelled and the reservation row removed, in
/// one transaction.
pub fn cancel_reservation(conn: &mut Connection, id: &str) -> Result<(), ServerError> {
    let tx = conn
        .transaction()
        .map_err(|e| ServerError::DbError(format!("begin transaction failed: {e}")))?;

    if get_reservation(&tx, id)?.is_none() {
        return Err(ServerError::NotFound);
    }

    history::cancel_active_for_reservation(&tx, id)?;

    tx.execute("delete from reservations where id = ?", params![id])
        .map_err(|e| ServerError::DbError(format!("delete reservation failed: {e}")))?;

    tx.commit()
        .map_err(|e| ServerError::DbError(format!("commit failed: {e}")))
}
