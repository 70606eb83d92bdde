// src/tests/router_tests/auth_tests.rs
use http::Method;
use serde_json::json;

use crate::db::seed;
use crate::tests::utils::*;

#[test]
fn login_issues_a_usable_token() {
    let db = make_db("login_ok");
    seed::seed_if_empty(&db, now_unix()).unwrap();

    let (status, body) = call(
        &db,
        Method::POST,
        "/auth/login",
        Some(json!({ "email": "admin@hotel.com", "password": "admin123" })),
        None,
    );
    assert_eq!(status, 200);
    assert_eq!(body["user"]["email"], "admin@hotel.com");
    assert_eq!(body["user"]["role"], "admin");
    assert!(body.get("password").is_none());
    assert!(body["user"].get("passwordHash").is_none());

    let token = body["token"].as_str().unwrap().to_string();
    assert!(!token.is_empty());

    // The token actually authorizes a mutation.
    let (status, body) = call(
        &db,
        Method::POST,
        "/rooms",
        Some(json!({ "number": "901", "type": "Casal", "capacity": 2, "beds": 1, "price": 180.0 })),
        Some(&token),
    );
    assert_eq!(status, 201);
    assert_eq!(body["id"], "room_901");
}

#[test]
fn login_rejects_bad_credentials() {
    let db = make_db("login_bad");
    seed::seed_if_empty(&db, now_unix()).unwrap();

    let (status, body) = call(
        &db,
        Method::POST,
        "/auth/login",
        Some(json!({ "email": "admin@hotel.com", "password": "wrong" })),
        None,
    );
    assert_eq!(status, 401);
    assert!(body["error"].as_str().unwrap().contains("invalid"));

    let (status, _) = call(
        &db,
        Method::POST,
        "/auth/login",
        Some(json!({ "email": "nobody@hotel.com", "password": "admin123" })),
        None,
    );
    assert_eq!(status, 401);
}

#[test]
fn login_requires_both_fields() {
    let db = make_db("login_fields");

    // Missing field fails the body decode.
    let (status, _) = call(
        &db,
        Method::POST,
        "/auth/login",
        Some(json!({ "email": "admin@hotel.com" })),
        None,
    );
    assert_eq!(status, 400);

    // Whitespace-only fields fail validation.
    let (status, _) = call(
        &db,
        Method::POST,
        "/auth/login",
        Some(json!({ "email": "  ", "password": "admin123" })),
        None,
    );
    assert_eq!(status, 400);
}

#[test]
fn mutations_require_a_live_token() {
    let db = make_db("auth_guard");
    let room_body = json!({ "number": "101", "type": "Solteiro", "capacity": 1, "beds": 1, "price": 80.0 });

    let (status, body) = call(&db, Method::POST, "/rooms", Some(room_body.clone()), None);
    assert_eq!(status, 401);
    assert!(body["error"].as_str().unwrap().contains("token"));

    let (status, _) = call(&db, Method::POST, "/rooms", Some(room_body), Some("not-a-token"));
    assert_eq!(status, 401);
}

#[test]
fn reads_stay_open() {
    let db = make_db("open_reads");

    let (status, body) = call(&db, Method::GET, "/rooms", None, None);
    assert_eq!(status, 200);
    assert_eq!(body.as_array().unwrap().len(), 0);

    let (status, body) = call(&db, Method::GET, "/health", None, None);
    assert_eq!(status, 200);
    assert_eq!(body["status"], "OK");
}
