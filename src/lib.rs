pub mod auth;
pub mod client;
pub mod db;
pub mod domain;
pub mod errors;
pub mod responses;
pub mod router;
pub mod spreadsheets;
pub mod store;
pub mod templates;
pub mod validate;
