// src/db/users.rs
use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::User;
use crate::errors::ServerError;

/// A user row with its stored credential; the hash never leaves the
/// db layer.
pub struct UserRow {
    pub user: User,
    pub password_hash: String,
}

pub fn find_by_email(conn: &Connection, email: &str) -> Result<Option<UserRow>, ServerError> {
    conn.query_row(
        "select id, name, email, role, phone, password_hash from users where email = ?",
        params![email],
        |row| {
            Ok(UserRow {
                user: User {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    email: row.get(2)?,
                    role: row.get(3)?,
                    phone: row.get(4)?,
                },
                password_hash: row.get(5)?,
            })
        },
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("user lookup failed: {e}")))
}

pub fn find_by_id(conn: &Connection, id: &str) -> Result<Option<User>, ServerError> {
    conn.query_row(
        "select id, name, email, role, phone from users where id = ?",
        params![id],
        |row| {
            Ok(User {
                id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
                role: row.get(3)?,
                phone: row.get(4)?,
            })
        },
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("user lookup failed: {e}")))
}

pub fn insert_user(
    conn: &Connection,
    id: &str,
    name: &str,
    email: &str,
    password_hash: &str,
    role: &str,
    phone: Option<&str>,
    now: i64,
) -> Result<(), ServerError> {
    conn.execute(
        "insert into users (id, name, email, password_hash, role, phone, created_at)
         values (?, ?, ?, ?, ?, ?, ?)",
        params![id, name, email, password_hash, role, phone, now],
    )
    .map_err(|e| ServerError::DbError(format!("insert user failed: {e}")))?;
    Ok(())
}

pub fn count_users(conn: &Connection) -> Result<i64, ServerError> {
    conn.query_row("select count(*) from users", [], |r| r.get(0))
        .map_err(|e| ServerError::DbError(format!("count users failed: {e}")))
}
