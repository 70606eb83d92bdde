// src/db/history.rs
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use time::OffsetDateTime;

use crate::db::fresh_id;
use crate::domain::{Guest, GuestHistoryEntry, HistoryStatus, RoomType};
use crate::errors::ServerError;

const HISTORY_COLUMNS: &str = "id, room_id, reservation_id, guest_data, room_number, room_type, \
     check_in_date, check_out_date, total_price, status, created_at";

fn entry_from_row(row: &Row) -> rusqlite::Result<GuestHistoryEntry> {
    fn text_err(idx: usize, e: impl std::error::Error + Send + Sync + 'static) -> rusqlite::Error {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    }

    let guest_json: String = row.get(3)?;
    let guest: Guest = serde_json::from_str(&guest_json).map_err(|e| text_err(3, e))?;

    let type_str: String = row.get(5)?;
    let room_type: RoomType =
        serde_json::from_value(serde_json::Value::String(type_str)).map_err(|e| text_err(5, e))?;

    let check_in: String = row.get(6)?;
    let check_out: String = row.get(7)?;
    let status_str: String = row.get(9)?;
    let status: HistoryStatus =
        serde_json::from_value(serde_json::Value::String(status_str)).map_err(|e| text_err(9, e))?;

    Ok(GuestHistoryEntry {
        id: row.get(0)?,
        room_id: row.get(1)?,
        reservation_id: row.get(2)?,
        guest,
        room_number: row.get(4)?,
        room_type,
        check_in_date: check_in.parse().map_err(|e| text_err(6, e))?,
        check_out_date: check_out.parse().map_err(|e| text_err(7, e))?,
        total_price: row.get(8)?,
        status,
        created_at: row.get(10)?,
    })
}

pub fn list_history(conn: &Connection) -> Result<Vec<GuestHistoryEntry>, ServerError> {
    let mut stmt = conn
        .prepare(&format!(
            "select {HISTORY_COLUMNS} from guest_history order by created_at desc, id desc"
        ))
        .map_err(|e| ServerError::DbError(format!("prepare history failed: {e}")))?;

    let rows = stmt
        .query_map([], entry_from_row)
        .map_err(|e| ServerError::DbError(format!("query history failed: {e}")))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r.map_err(|e| ServerError::DbError(format!("read history row failed: {e}")))?);
    }
    Ok(out)
}

/// Everything needed to open a ledger entry; id, active status and
/// creation time are filled in here.
pub struct NewHistoryEntry<'a> {
    pub room_id: &'a str,
    pub reservation_id: Option<&'a str>,
    pub guest: &'a Guest,
    pub room_number: &'a str,
    pub room_type: RoomType,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub total_price: f64,
}

pub fn append_history(
    conn: &Connection,
    entry: &NewHistoryEntry<'_>,
    now: i64,
) -> Result<String, ServerError> {
    let id = fresh_id("history", now);
    let guest_json = serde_json::to_string(entry.guest)
        .map_err(|e| ServerError::DbError(format!("encode guest failed: {e}")))?;

    conn.execute(
        "insert into guest_history (id, room_id, reservation_id, guest_data, room_number, room_type,
                                    check_in_date, check_out_date, total_price, status, created_at)
         values (?, ?, ?, ?, ?, ?, ?, ?, ?, 'active', ?)",
        params![
            id,
            entry.room_id,
            entry.reservation_id,
            guest_json,
            entry.room_number,
            entry.room_type.as_str(),
            entry.check_in.to_string(),
            entry.check_out.to_string(),
            entry.total_price,
            now
        ],
    )
    .map_err(|e| ServerError::DbError(format!("insert history failed: {e}")))?;

    Ok(id)
}

pub fn set_history_status(
    conn: &Connection,
    id: &str,
    status: HistoryStatus,
) -> Result<(), ServerError> {
    let changed = conn
        .execute(
            "update guest_history set status = ? where id = ?",
            params![status.as_str(), id],
        )
        .map_err(|e| ServerError::DbError(format!("update history status failed: {e}")))?;

    if changed == 0 {
        return Err(ServerError::NotFound);
    }
    Ok(())
}

pub fn delete_history(conn: &Connection, id: &str) -> Result<(), ServerError> {
    let changed = conn
        .execute("delete from guest_history where id = ?", params![id])
        .map_err(|e| ServerError::DbError(format!("delete history failed: {e}")))?;

    if changed == 0 {
        return Err(ServerError::NotFound);
    }
    Ok(())
}

/// Checkout support: close the active entry for the guest occupying a
/// room. Called inside the room-status transaction.
///
/// Only immediate check-ins write a NULL `reservation_id`, so the
/// filter leaves entries of still-pending future bookings for the same
/// room untouched.
pub fn complete_active_for_room(conn: &Connection, room_id: &str) -> Result<(), ServerError> {
    conn.execute(
        "update guest_history set status = 'completed'
         where room_id = ? and reservation_id is null and status = 'active'",
        params![room_id],
    )
    .map_err(|e| ServerError::DbError(format!("complete history failed: {e}")))?;
    Ok(())
}

/// Cancellation support: mark the active entry tied to a reservation as
/// cancelled. Called inside the cancel-reservation transaction.
pub fn cancel_active_for_reservation(
    conn: &Connection,
    reservation_id: &str,
) -> Result<(), ServerError> {
    conn.execute(
        "update guest_history set status = 'cancelled' where reservation_id = ? and status = 'active'",
        params![reservation_id],
    )
    .map_err(|e| ServerError::DbError(format!("cancel history failed: {e}")))?;
    Ok(())
}

/// Counts ledger entries opened in the current calendar month (UTC),
/// cancelled bookings excluded. Shown on the dashboard as "check-ins
/// this month".
pub fn count_entries_this_month(conn: &Connection, now: i64) -> Result<i64, ServerError> {
    let dt = OffsetDateTime::from_unix_timestamp(now).unwrap_or_else(|_| OffsetDateTime::now_utc());

    // Day 1 is valid for every month.
    let start_of_month = dt
        .replace_day(1)
        .unwrap_or(dt)
        .replace_time(time::Time::MIDNIGHT)
        .unix_timestamp();

    conn.query_row(
        "select count(*) from guest_history where created_at >= ? and status != 'cancelled'",
        params![start_of_month],
        |r| r.get(0),
    )
    .map_err(|e| ServerError::DbError(format!("count history failed: {e}")))
}
