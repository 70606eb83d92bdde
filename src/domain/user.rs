// src/domain/user.rs
use serde::{Deserialize, Serialize};

/// Role-tagged user record as returned by /auth/login. Password
/// material never appears on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub phone: Option<String>,
}
