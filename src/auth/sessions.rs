// src/auth/sessions.rs
use rusqlite::{params, Connection, OptionalExtension};

use crate::auth::token::{generate_token_default, hash_token};
use crate::errors::ServerError;

const SESSION_TTL_SECS: i64 = 60 * 60 * 24; // 24h, same as the login token

/// Issue a bearer token for a user and record its hash.
pub fn create_session(conn: &Connection, user_id: &str, now: i64) -> Result<String, ServerError> {
    let raw_token = generate_token_default();
    let hash = hash_token(&raw_token);
    let expires_at = now + SESSION_TTL_SECS;

    conn.execute(
        "insert into sessions (user_id, token_hash, created_at, expires_at)
         values (?, ?, ?, ?)",
        params![user_id, hash.as_slice(), now, expires_at],
    )
    .map_err(|e| ServerError::DbError(format!("create session failed: {e}")))?;

    Ok(raw_token)
}

/// Resolve a raw bearer token to the owning user id, if the session is
/// live (not expired, not revoked).
pub fn load_user_from_session(
    conn: &Connection,
    raw_token: &str,
    now: i64,
) -> Result<Option<String>, ServerError> {
    let hash = hash_token(raw_token);

    conn.query_row(
        "select u.id
         from sessions s
         join users u on u.id = s.user_id
         where s.token_hash = ?
           and s.expires_at > ?
           and s.revoked_at is null",
        params![hash.as_slice(), now],
        |row| row.get(0),
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("session lookup failed: {e}")))
}
