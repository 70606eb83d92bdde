// src/tests/utils.rs
use std::io::Read;
use std::time::{SystemTime, UNIX_EPOCH};

use astra::Body;
use chrono::NaiveDate;
use http::Method;
use serde_json::Value;

use crate::auth::sessions;
use crate::db::rooms::{self, NewRoom};
use crate::db::users;
use crate::db::{init_db, Database};
use crate::domain::{Guest, RoomType};
use crate::router::handle;

pub fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

/// Fresh test DB on a unique temp path, using the production schema.
pub fn make_db(label: &str) -> Database {
    let path = std::env::temp_dir().join(format!(
        "hotel_{label}_{}.sqlite",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    let db = Database::new(path.to_string_lossy().to_string());
    init_db(&db, "sql/schema.sql").expect("failed to initialize test db");
    db
}

/// Insert a staff user and return a live bearer token for it.
pub fn issue_token(db: &Database) -> String {
    db.with_conn(|conn| {
        users::insert_user(
            conn,
            "staff_test",
            "Test Staff",
            "staff-test@hotel.com",
            "unused-hash",
            "staff",
            None,
            now_unix(),
        )?;
        sessions::create_session(conn, "staff_test", now_unix())
    })
    .expect("failed to issue test token")
}

/// Insert one room directly and return its id.
pub fn insert_room(db: &Database, number: &str, room_type: RoomType, capacity: u32, price: f64) -> String {
    db.with_conn(|conn| {
        rooms::create_room(
            conn,
            &NewRoom {
                number: number.to_string(),
                room_type,
                capacity,
                beds: 1,
                price,
                amenities: vec!["wifi".to_string()],
            },
            now_unix(),
        )
    })
    .expect("failed to insert test room")
}

/// Build a request for the router, optionally with a JSON body and a
/// bearer token.
pub fn request(method: Method, uri: &str, body: Option<Value>, token: Option<&str>) -> astra::Request {
    let mut builder = http::Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }

    let body = match body {
        Some(json) => Body::from(serde_json::to_vec(&json).unwrap()),
        None => Body::empty(),
    };
    builder.body(body).unwrap()
}

/// Run a request through the router and return (status, parsed body).
pub fn call(db: &Database, method: Method, uri: &str, body: Option<Value>, token: Option<&str>) -> (u16, Value) {
    let req = request(method, uri, body, token);
    match handle(req, db) {
        Ok(resp) => {
            let status = resp.status().as_u16();
            let mut bytes = Vec::new();
            resp.into_body().reader().read_to_end(&mut bytes).unwrap();
            let value = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap_or(Value::Null)
            };
            (status, value)
        }
        Err(err) => {
            let resp = crate::responses::error_to_response(err);
            let status = resp.status().as_u16();
            let mut bytes = Vec::new();
            resp.into_body().reader().read_to_end(&mut bytes).unwrap();
            (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
        }
    }
}

pub fn guest(name: &str, party: u32, check_in: NaiveDate, check_out: NaiveDate) -> Guest {
    Guest {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        phone: String::new(),
        document: String::new(),
        guests: party,
        check_in,
        check_out,
        expenses: vec![],
    }
}

pub fn guest_json(g: &Guest) -> Value {
    serde_json::to_value(g).unwrap()
}
