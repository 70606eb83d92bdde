// src/db/seed.rs
//
// First-run provisioning: the default floor plan and the three demo
// accounts, inserted only when the tables are empty.

use rusqlite::Connection;

use crate::auth::password::hash_password;
use crate::db::rooms::{self, NewRoom};
use crate::db::users;
use crate::db::Database;
use crate::domain::RoomType;
use crate::errors::ServerError;

pub fn seed_if_empty(db: &Database, now: i64) -> Result<(), ServerError> {
    db.with_conn(|conn| {
        seed_users(conn, now)?;
        seed_rooms(conn, now)?;
        Ok(())
    })
}

fn seed_users(conn: &Connection, now: i64) -> Result<(), ServerError> {
    if users::count_users(conn)? > 0 {
        return Ok(());
    }

    let demo = [
        ("admin_1", "Administrador", "admin@hotel.com", "admin123", "admin", "(11) 99999-9999"),
        ("staff_1", "Funcionário", "staff@hotel.com", "staff123", "staff", "(11) 88888-8888"),
        ("guest_1", "Hóspede", "guest@hotel.com", "guest123", "guest", "(11) 77777-7777"),
    ];

    for (id, name, email, password, role, phone) in demo {
        let hash = hash_password(password)?;
        users::insert_user(conn, id, name, email, &hash, role, Some(phone), now)?;
    }
    Ok(())
}

fn count_rooms(conn: &Connection) -> Result<i64, ServerError> {
    conn.query_row("select count(*) from rooms", [], |r| r.get(0))
        .map_err(|e| ServerError::DbError(format!("count rooms failed: {e}")))
}

/// Floors 1 and 2: twenty rooms each, rotating Solteiro/Casal/Triplo,
/// floor 2 five units pricier. Floor 3: eight suites plus the premium
/// suite in 309.
fn seed_rooms(conn: &Connection, now: i64) -> Result<(), ServerError> {
    if count_rooms(conn)? > 0 {
        return Ok(());
    }

    for floor in [1, 2] {
        let surcharge = if floor == 2 { 5.0 } else { 0.0 };
        for i in 0..20 {
            let number = (floor * 100 + 1 + i).to_string();
            let (room_type, capacity, beds, price, extra) = match i % 3 {
                0 => (RoomType::Solteiro, 1, 1, 80.0, None),
                1 => (RoomType::Casal, 2, 1, 120.0, Some("ar-condicionado")),
                _ => (RoomType::Triplo, 3, 2, 150.0, Some("minibar")),
            };

            let mut amenities = vec!["wifi".to_string(), "tv".to_string()];
            if let Some(extra) = extra {
                amenities.push(extra.to_string());
            }

            let room = NewRoom {
                number,
                room_type,
                capacity,
                beds,
                price: price + surcharge,
                amenities,
            };
            rooms::create_room(conn, &room, now)?;
        }
    }

    for i in 0..9 {
        let number = (301 + i).to_string();
        let premium = i == 8;
        let capacity = if premium { 4 } else if i % 2 == 0 { 2 } else { 3 };
        let beds = if premium { 2 } else if capacity == 3 { 2 } else { 1 };
        let price = if premium { 300.0 } else if capacity == 3 { 250.0 } else { 200.0 };

        let mut amenities: Vec<String> = ["wifi", "tv", "ar-condicionado", "minibar", "banheira"]
            .iter()
            .map(|a| a.to_string())
            .collect();
        if premium {
            amenities.push("varanda".to_string());
        }

        let room = NewRoom {
            number,
            room_type: if premium { RoomType::SuitePremium } else { RoomType::Suite },
            capacity,
            beds,
            price,
            amenities,
        };
        rooms::create_room(conn, &room, now)?;
    }

    Ok(())
}
