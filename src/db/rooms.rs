// src/db/rooms.rs
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::db::{fresh_id, history};
use crate::domain::{Expense, Guest, Room, RoomStatus, RoomType};
use crate::errors::ServerError;

const ROOM_COLUMNS: &str =
    "id, number, type, capacity, beds, price, amenities, status, guest_data, updated_at";

/// Fields accepted when provisioning a room. Status always starts as
/// available, guest empty.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRoom {
    pub number: String,
    #[serde(rename = "type")]
    pub room_type: RoomType,
    pub capacity: u32,
    pub beds: u32,
    pub price: f64,
    #[serde(default)]
    pub amenities: Vec<String>,
}

/// Partial update for PUT /rooms/:id. `guest` distinguishes "absent"
/// (leave as-is) from explicit null (clear).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomPatch {
    pub number: Option<String>,
    #[serde(rename = "type")]
    pub room_type: Option<RoomType>,
    pub capacity: Option<u32>,
    pub beds: Option<u32>,
    pub price: Option<f64>,
    pub amenities: Option<Vec<String>>,
    pub status: Option<RoomStatus>,
    #[serde(default, deserialize_with = "double_option")]
    pub guest: Option<Option<Guest>>,
}

fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

/// Parse a TEXT column holding a serde-encoded enum or JSON blob.
fn json_col<T: DeserializeOwned>(row: &Row, idx: usize, raw: serde_json::Value) -> rusqlite::Result<T> {
    serde_json::from_value(raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn room_from_row(row: &Row) -> rusqlite::Result<Room> {
    let type_str: String = row.get(2)?;
    let amenities_json: String = row.get(6)?;
    let status_str: String = row.get(7)?;
    let guest_json: Option<String> = row.get(8)?;

    let amenities_raw: serde_json::Value = serde_json::from_str(&amenities_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let guest = match guest_json {
        Some(json) => {
            let raw: serde_json::Value = serde_json::from_str(&json).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(8, rusqlite::types::Type::Text, Box::new(e))
            })?;
            Some(json_col(row, 8, raw)?)
        }
        None => None,
    };

    Ok(Room {
        id: row.get(0)?,
        number: row.get(1)?,
        room_type: json_col(row, 2, serde_json::Value::String(type_str))?,
        capacity: row.get(3)?,
        beds: row.get(4)?,
        price: row.get(5)?,
        amenities: json_col(row, 6, amenities_raw)?,
        status: json_col(row, 7, serde_json::Value::String(status_str))?,
        guest,
        updated_at: row.get(9)?,
    })
}

fn guest_to_json(guest: &Guest) -> Result<String, ServerError> {
    serde_json::to_string(guest)
        .map_err(|e| ServerError::DbError(format!("encode guest failed: {e}")))
}

pub fn list_rooms(conn: &Connection) -> Result<Vec<Room>, ServerError> {
    let mut stmt = conn
        .prepare(&format!("select {ROOM_COLUMNS} from rooms order by number"))
        .map_err(|e| ServerError::DbError(format!("prepare rooms failed: {e}")))?;

    let rows = stmt
        .query_map([], room_from_row)
        .map_err(|e| ServerError::DbError(format!("query rooms failed: {e}")))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r.map_err(|e| ServerError::DbError(format!("read room row failed: {e}")))?);
    }
    Ok(out)
}

pub fn get_room(conn: &Connection, id: &str) -> Result<Option<Room>, ServerError> {
    conn.query_row(
        &format!("select {ROOM_COLUMNS} from rooms where id = ?"),
        params![id],
        room_from_row,
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("room lookup failed: {e}")))
}

pub fn create_room(conn: &Connection, room: &NewRoom, now: i64) -> Result<String, ServerError> {
    let id = format!("room_{}", room.number);
    let amenities = serde_json::to_string(&room.amenities)
        .map_err(|e| ServerError::DbError(format!("encode amenities failed: {e}")))?;

    let result = conn.execute(
        "insert into rooms (id, number, type, capacity, beds, price, amenities, status, created_at, updated_at)
         values (?, ?, ?, ?, ?, ?, ?, 'available', ?, ?)",
        params![
            id,
            room.number,
            room.room_type.as_str(),
            room.capacity,
            room.beds,
            room.price,
            amenities,
            now,
            now
        ],
    );

    match result {
        Ok(_) => Ok(id),
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Err(ServerError::BadRequest("room number already exists".into()))
        }
        Err(e) => Err(ServerError::DbError(format!("insert room failed: {e}"))),
    }
}

/// Apply a partial update. Only the fields present in the patch make it
/// into the SET clause, mirroring the wire contract of PUT /rooms/:id.
///
/// Patches touching `status` or `guest` must keep the guest-iff-occupied
/// pairing; moving a room out of occupied goes through `set_room_status`
/// so the ledger stays in step.
pub fn update_room(
    conn: &Connection,
    id: &str,
    patch: &RoomPatch,
    now: i64,
) -> Result<(), ServerError> {
    if patch.status.is_some() || patch.guest.is_some() {
        let current = get_room(conn, id)?.ok_or(ServerError::NotFound)?;
        let status = patch.status.unwrap_or(current.status);
        let has_guest = match &patch.guest {
            Some(g) => g.is_some(),
            None => current.guest.is_some(),
        };

        if current.status == RoomStatus::Occupied && status != RoomStatus::Occupied {
            return Err(ServerError::BadRequest(
                "use the room status endpoint to move a room out of occupied".into(),
            ));
        }
        if status == RoomStatus::Occupied && !has_guest {
            return Err(ServerError::BadRequest("guest is required to occupy a room".into()));
        }
        if status != RoomStatus::Occupied && has_guest {
            return Err(ServerError::BadRequest(
                "guest can only be set on an occupied room".into(),
            ));
        }
    }

    let mut set_clause: Vec<&str> = Vec::new();
    let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if let Some(number) = &patch.number {
        set_clause.push("number = ?");
        values.push(Box::new(number.clone()));
    }
    if let Some(room_type) = patch.room_type {
        set_clause.push("type = ?");
        values.push(Box::new(room_type.as_str()));
    }
    if let Some(capacity) = patch.capacity {
        set_clause.push("capacity = ?");
        values.push(Box::new(capacity));
    }
    if let Some(beds) = patch.beds {
        set_clause.push("beds = ?");
        values.push(Box::new(beds));
    }
    if let Some(price) = patch.price {
        set_clause.push("price = ?");
        values.push(Box::new(price));
    }
    if let Some(amenities) = &patch.amenities {
        let json = serde_json::to_string(amenities)
            .map_err(|e| ServerError::DbError(format!("encode amenities failed: {e}")))?;
        set_clause.push("amenities = ?");
        values.push(Box::new(json));
    }
    if let Some(status) = patch.status {
        set_clause.push("status = ?");
        values.push(Box::new(status.as_str()));
    }
    if let Some(guest) = &patch.guest {
        let json = match guest {
            Some(g) => Some(guest_to_json(g)?),
            None => None,
        };
        set_clause.push("guest_data = ?");
        values.push(Box::new(json));
    }

    if set_clause.is_empty() {
        return Err(ServerError::BadRequest("no fields to update".into()));
    }

    set_clause.push("updated_at = ?");
    values.push(Box::new(now));
    values.push(Box::new(id.to_string()));

    let sql = format!("update rooms set {} where id = ?", set_clause.join(", "));
    let changed = conn
        .execute(&sql, rusqlite::params_from_iter(values.iter().map(|v| v.as_ref())))
        .map_err(|e| ServerError::DbError(format!("update room failed: {e}")))?;

    if changed == 0 {
        return Err(ServerError::NotFound);
    }
    Ok(())
}

pub fn delete_room(conn: &Connection, id: &str) -> Result<(), ServerError> {
    let changed = conn
        .execute("delete from rooms where id = ?", params![id])
        .map_err(|e| ServerError::DbError(format!("delete room failed: {e}")))?;

    if changed == 0 {
        return Err(ServerError::NotFound);
    }
    Ok(())
}

/// Status transition for a single room, with the ledger kept in step.
///
/// Occupying requires a guest; any other status clears it (guest is
/// populated iff occupied). A transition from occupied to available is
/// a checkout: the active history entry referencing this room is
/// completed in the same transaction.
pub fn set_room_status(
    conn: &mut Connection,
    id: &str,
    status: RoomStatus,
    guest: Option<Guest>,
    now: i64,
) -> Result<(), ServerError> {
    let tx = conn
        .transaction()
        .map_err(|e| ServerError::DbError(format!("begin transaction failed: {e}")))?;

    let room = get_room(&tx, id)?.ok_or(ServerError::NotFound)?;

    let guest = match status {
        RoomStatus::Occupied => Some(
            guest.ok_or_else(|| ServerError::BadRequest("guest is required to occupy a room".into()))?,
        ),
        _ => None,
    };

    if room.status == RoomStatus::Occupied && status == RoomStatus::Available {
        history::complete_active_for_room(&tx, id)?;
    }

    let guest_json = match &guest {
        Some(g) => Some(guest_to_json(g)?),
        None => None,
    };

    tx.execute(
        "update rooms set status = ?, guest_data = ?, updated_at = ? where id = ?",
        params![status.as_str(), guest_json, now, id],
    )
    .map_err(|e| ServerError::DbError(format!("update room status failed: {e}")))?;

    tx.commit()
        .map_err(|e| ServerError::DbError(format!("commit failed: {e}")))
}

/// Append an incidental expense to the guest currently occupying the
/// room. Only legal while the room is occupied.
pub fn add_expense(
    conn: &Connection,
    room_id: &str,
    description: &str,
    value: f64,
    today: NaiveDate,
    now: i64,
) -> Result<Expense, ServerError> {
    let room = get_room(conn, room_id)?.ok_or(ServerError::NotFound)?;

    let mut guest = match (room.status, room.guest) {
        (RoomStatus::Occupied, Some(guest)) => guest,
        _ => return Err(ServerError::BadRequest("room is not occupied".into())),
    };

    let expense = Expense {
        id: fresh_id("expense", now),
        description: description.to_string(),
        value,
        date: today,
    };
    guest.expenses.push(expense.clone());

    conn.execute(
        "update rooms set guest_data = ?, updated_at = ? where id = ?",
        params![guest_to_json(&guest)?, now, room_id],
    )
    .map_err(|e| ServerError::DbError(format!("append expense failed: {e}")))?;

    Ok(expense)
}
