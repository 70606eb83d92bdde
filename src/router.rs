use std::io::Read;
use std::time::{SystemTime, UNIX_EPOCH};

use astra::Request;
use chrono::{NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::auth::sessions;
use crate::db::rooms::{NewRoom, RoomPatch};
use crate::db::{history, reservations, rooms, users, Database};
use crate::domain::{Guest, HistoryStatus, RoomStatus, RoomType};
use crate::errors::ServerError;
use crate::responses::{html_response, json_created, json_response, ResultResp};
use crate::spreadsheets::export_history_xlsx;
use crate::templates::pages::{dashboard_page, DashboardVm};
use crate::validate;

pub fn handle(mut req: Request, db: &Database) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    match (method.as_str(), segments.as_slice()) {
        ("GET", [""]) => dashboard(db),
        ("GET", ["health"]) => health(),

        ("POST", ["auth", "login"]) => login(&mut req, db),

        ("GET", ["rooms"]) => json_response(&db.with_conn(|conn| rooms::list_rooms(conn))?),
        ("POST", ["rooms"]) => {
            require_auth(&req, db)?;
            create_room(&mut req, db)
        }
        ("GET", ["rooms", id]) => {
            let room = db
                .with_conn(|conn| rooms::get_room(conn, id))?
                .ok_or(ServerError::NotFound)?;
            json_response(&room)
        }
        ("PUT", ["rooms", id, "status"]) => {
            require_auth(&req, db)?;
            let id = id.to_string();
            update_room_status(&mut req, db, &id)
        }
        ("PUT", ["rooms", id]) => {
            require_auth(&req, db)?;
            let id = id.to_string();
            update_room(&mut req, db, &id)
        }
        ("DELETE", ["rooms", id]) => {
            require_auth(&req, db)?;
            db.with_conn(|conn| rooms::delete_room(conn, id))?;
            json_response(&json!({ "message": "room deleted" }))
        }

        ("GET", ["reservations"]) => {
            json_response(&db.with_conn(|conn| reservations::list_future_reservations(conn))?)
        }
        ("POST", ["reservations"]) => {
            require_auth(&req, db)?;
            make_reservation(&mut req, db)
        }
        ("DELETE", ["reservations", id]) => {
            require_auth(&req, db)?;
            db.with_conn(|conn| reservations::cancel_reservation(conn, id))?;
            json_response(&json!({ "message": "reservation cancelled" }))
        }

        ("POST", ["expenses"]) => {
            require_auth(&req, db)?;
            add_expense(&mut req, db)
        }

        ("GET", ["history", "export.xlsx"]) => {
            let entries = db.with_conn(|conn| history::list_history(conn))?;
            export_history_xlsx(&entries)
        }
        ("GET", ["history"]) => json_response(&db.with_conn(|conn| history::list_history(conn))?),
        ("POST", ["history"]) => {
            require_auth(&req, db)?;
            append_history(&mut req, db)
        }
        ("PUT", ["history", id]) => {
            require_auth(&req, db)?;
            let id = id.to_string();
            update_history_status(&mut req, db, &id)
        }
        ("DELETE", ["history", id]) => {
            require_auth(&req, db)?;
            db.with_conn(|conn| history::delete_history(conn, id))?;
            json_response(&json!({ "message": "history entry deleted" }))
        }

        _ => Err(ServerError::NotFound),
    }
}

fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Deserialize a JSON request body into a typed DTO. Malformed or
/// missing-field bodies surface as a single BadRequest kind.
fn read_json<T: DeserializeOwned>(req: &mut Request) -> Result<T, ServerError> {
    let mut buf = Vec::new();
    req.body_mut()
        .reader()
        .read_to_end(&mut buf)
        .map_err(|e| ServerError::BadRequest(format!("failed to read body: {e}")))?;

    serde_json::from_slice(&buf)
        .map_err(|e| ServerError::BadRequest(format!("invalid request body: {e}")))
}

/// Mutating endpoints require a live session token in the
/// Authorization header. Returns the authenticated user id.
fn require_auth(req: &Request, db: &Database) -> Result<String, ServerError> {
    let header = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ServerError::Unauthorized("access token required".into()))?;

    db.with_conn(|conn| sessions::load_user_from_session(conn, token, now_unix()))?
        .ok_or_else(|| ServerError::Unauthorized("invalid or expired token".into()))
}

// ---- handlers ----

fn health() -> ResultResp {
    json_response(&json!({
        "status": "OK",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

fn dashboard(db: &Database) -> ResultResp {
    let vm = db.with_conn(|conn| {
        Ok(DashboardVm {
            rooms: rooms::list_rooms(conn)?,
            reservation_count: reservations::list_future_reservations(conn)?.len(),
            checkins_this_month: history::count_entries_this_month(conn, now_unix())?,
        })
    })?;
    html_response(dashboard_page(&vm))
}

#[derive(Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

fn login(req: &mut Request, db: &Database) -> ResultResp {
    let body: LoginRequest = read_json(req)?;
    validate::validate_credentials(&body.email, &body.password)?;

    let row = db
        .with_conn(|conn| users::find_by_email(conn, body.email.trim()))?
        .ok_or_else(|| ServerError::Unauthorized("invalid email or password".into()))?;

    if !crate::auth::password::verify_password(&body.password, &row.password_hash) {
        return Err(ServerError::Unauthorized("invalid email or password".into()));
    }

    let token = db.with_conn(|conn| sessions::create_session(conn, &row.user.id, now_unix()))?;

    json_response(&json!({ "user": row.user, "token": token }))
}

fn create_room(req: &mut Request, db: &Database) -> ResultResp {
    let room: NewRoom = read_json(req)?;
    validate::validate_new_room(&room)?;

    let id = db.with_conn(|conn| rooms::create_room(conn, &room, now_unix()))?;
    json_created(&json!({ "id": id, "message": "room created" }))
}

fn update_room(req: &mut Request, db: &Database, id: &str) -> ResultResp {
    let patch: RoomPatch = read_json(req)?;
    if let Some(Some(guest)) = &patch.guest {
        validate::validate_guest(guest)?;
    }

    db.with_conn(|conn| rooms::update_room(conn, id, &patch, now_unix()))?;
    json_response(&json!({ "message": "room updated" }))
}

#[derive(Deserialize)]
struct StatusUpdateRequest {
    status: RoomStatus,
    #[serde(default)]
    guest: Option<Guest>,
}

fn update_room_status(req: &mut Request, db: &Database, id: &str) -> ResultResp {
    let body: StatusUpdateRequest = read_json(req)?;
    if let Some(guest) = &body.guest {
        validate::validate_guest(guest)?;
    }

    db.with_conn(|conn| rooms::set_room_status(conn, id, body.status, body.guest.clone(), now_unix()))?;
    json_response(&json!({ "message": "room status updated" }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReservationRequest {
    room_id: String,
    guest: Guest,
}

fn make_reservation(req: &mut Request, db: &Database) -> ResultResp {
    let body: ReservationRequest = read_json(req)?;
    validate::require_non_empty("roomId", &body.room_id)?;
    validate::validate_guest(&body.guest)?;

    let (id, outcome) = db.with_conn(|conn| {
        reservations::commit_reservation(conn, &body.room_id, &body.guest, today(), now_unix())
    })?;

    json_created(&json!({ "id": id, "outcome": outcome }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExpenseRequest {
    room_id: String,
    description: String,
    value: f64,
}

fn add_expense(req: &mut Request, db: &Database) -> ResultResp {
    let body: ExpenseRequest = read_json(req)?;
    validate::require_non_empty("roomId", &body.room_id)?;
    validate::require_non_empty("description", &body.description)?;
    validate::require_positive("value", body.value)?;

    let expense = db.with_conn(|conn| {
        rooms::add_expense(conn, &body.room_id, &body.description, body.value, today(), now_unix())
    })?;

    json_created(&json!({ "message": "expense added", "expense": expense }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryAppendRequest {
    room_id: String,
    #[serde(default)]
    reservation_id: Option<String>,
    guest: Guest,
    room_number: String,
    room_type: RoomType,
    check_in_date: NaiveDate,
    check_out_date: NaiveDate,
    total_price: f64,
}

fn append_history(req: &mut Request, db: &Database) -> ResultResp {
    let body: HistoryAppendRequest = read_json(req)?;
    validate::require_non_empty("roomId", &body.room_id)?;
    validate::validate_guest(&body.guest)?;

    let id = db.with_conn(|conn| {
        history::append_history(
            conn,
            &history::NewHistoryEntry {
                room_id: &body.room_id,
                reservation_id: body.reservation_id.as_deref(),
                guest: &body.guest,
                room_number: &body.room_number,
                room_type: body.room_type,
                check_in: body.check_in_date,
                check_out: body.check_out_date,
                total_price: body.total_price,
            },
            now_unix(),
        )
    })?;

    json_created(&json!({ "id": id }))
}

#[derive(Deserialize)]
struct HistoryStatusRequest {
    status: HistoryStatus,
}

fn update_history_status(req: &mut Request, db: &Database, id: &str) -> ResultResp {
    let body: HistoryStatusRequest = read_json(req)?;
    db.with_conn(|conn| history::set_history_status(conn, id, body.status))?;
    json_response(&json!({ "message": "history status updated" }))
}
