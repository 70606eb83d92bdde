// src/domain/guest.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A guest record, embedded either inside an occupied `Room` or a
/// future `Reservation`. Name is the only required identity field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub document: String,
    /// Party size.
    pub guests: u32,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

/// An incidental expense attached to a guest. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub description: String,
    pub value: f64,
    pub date: NaiveDate,
}
