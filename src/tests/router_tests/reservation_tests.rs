// src/tests/router_tests/reservation_tests.rs
//
// Booking scenarios: the commit decides between immediate check-in and
// a future reservation, and the guest-history ledger is kept in step by
// the same transaction.

use chrono::{Duration, Utc};
use http::Method;
use serde_json::json;

use crate::domain::RoomType;
use crate::tests::utils::*;

#[test]
fn same_day_checkin_occupies_the_room() {
    let db = make_db("res_same_day");
    let token = issue_token(&db);
    let room_id = insert_room(&db, "102", RoomType::Casal, 2, 120.0);

    let today = Utc::now().date_naive();
    let g = guest("Maria", 2, today, today + Duration::days(2));

    let (status, body) = call(
        &db,
        Method::POST,
        "/reservations",
        Some(json!({ "roomId": room_id, "guest": guest_json(&g) })),
        Some(&token),
    );
    assert_eq!(status, 201);
    assert_eq!(body["outcome"], "checked_in");
    assert_eq!(body["id"], room_id);

    let (_, room) = call(&db, Method::GET, &format!("/rooms/{room_id}"), None, None);
    assert_eq!(room["status"], "occupied");
    assert_eq!(room["guest"]["name"], "Maria");

    // No reservation row for an immediate check-in.
    let (_, reservations) = call(&db, Method::GET, "/reservations", None, None);
    assert_eq!(reservations.as_array().unwrap().len(), 0);

    // One active ledger entry, priced rate x party x nights.
    let (_, history) = call(&db, Method::GET, "/history", None, None);
    let entries = history.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["status"], "active");
    assert_eq!(entries[0]["roomId"], room_id);
    assert!(entries[0].get("reservationId").is_none());
    assert_eq!(entries[0]["totalPrice"], 120.0 * 2.0 * 2.0);
}

#[test]
fn future_booking_leaves_the_room_available() {
    let db = make_db("res_future");
    let token = issue_token(&db);
    let room_id = insert_room(&db, "103", RoomType::Triplo, 3, 150.0);

    let today = Utc::now().date_naive();
    let g = guest("Joao", 3, today + Duration::days(5), today + Duration::days(8));

    let (status, body) = call(
        &db,
        Method::POST,
        "/reservations",
        Some(json!({ "roomId": room_id, "guest": guest_json(&g) })),
        Some(&token),
    );
    assert_eq!(status, 201);
    assert_eq!(body["outcome"], "reserved");
    let reservation_id = body["id"].as_str().unwrap().to_string();

    // The persisted room status is untouched.
    let (_, room) = call(&db, Method::GET, &format!("/rooms/{room_id}"), None, None);
    assert_eq!(room["status"], "available");
    assert!(room.get("guest").is_none());

    let (_, reservations) = call(&db, Method::GET, "/reservations", None, None);
    let rows = reservations.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], reservation_id.as_str());
    assert_eq!(rows[0]["roomId"], room_id);

    // The ledger entry points back at the reservation.
    let (_, history) = call(&db, Method::GET, "/history", None, None);
    let entries = history.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["status"], "active");
    assert_eq!(entries[0]["reservationId"], reservation_id.as_str());
    assert_eq!(entries[0]["totalPrice"], 150.0 * 3.0 * 3.0);
}

#[test]
fn zero_night_stay_is_billed_as_one_night() {
    let db = make_db("res_one_night");
    let token = issue_token(&db);
    let room_id = insert_room(&db, "101", RoomType::Solteiro, 1, 80.0);

    let today = Utc::now().date_naive();
    let g = guest("Ana", 1, today, today);

    let (status, _) = call(
        &db,
        Method::POST,
        "/reservations",
        Some(json!({ "roomId": room_id, "guest": guest_json(&g) })),
        Some(&token),
    );
    assert_eq!(status, 201);

    let (_, history) = call(&db, Method::GET, "/history", None, None);
    assert_eq!(history[0]["totalPrice"], 80.0);
}

#[test]
fn checkout_completes_the_ledger_entry() {
    let db = make_db("res_checkout");
    let token = issue_token(&db);
    let room_id = insert_room(&db, "102", RoomType::Casal, 2, 120.0);

    let today = Utc::now().date_naive();
    let g = guest("Maria", 2, today, today + Duration::days(1));
    let (status, _) = call(
        &db,
        Method::POST,
        "/reservations",
        Some(json!({ "roomId": room_id, "guest": guest_json(&g) })),
        Some(&token),
    );
    assert_eq!(status, 201);

    let (status, _) = call(
        &db,
        Method::PUT,
        &format!("/rooms/{room_id}/status"),
        Some(json!({ "status": "available" })),
        Some(&token),
    );
    assert_eq!(status, 200);

    let (_, room) = call(&db, Method::GET, &format!("/rooms/{room_id}"), None, None);
    assert_eq!(room["status"], "available");
    assert!(room.get("guest").is_none());

    let (_, history) = call(&db, Method::GET, "/history", None, None);
    assert_eq!(history[0]["status"], "completed");
}

#[test]
fn checkout_leaves_future_bookings_of_the_room_active() {
    let db = make_db("res_checkout_future");
    let token = issue_token(&db);
    let room_id = insert_room(&db, "102", RoomType::Casal, 2, 120.0);
    let today = Utc::now().date_naive();

    // Ana occupies the room today; Joao holds it for next week.
    let ana = guest("Ana", 1, today, today + Duration::days(1));
    let (status, _) = call(
        &db,
        Method::POST,
        "/reservations",
        Some(json!({ "roomId": room_id, "guest": guest_json(&ana) })),
        Some(&token),
    );
    assert_eq!(status, 201);

    let joao = guest("Joao", 2, today + Duration::days(7), today + Duration::days(9));
    let (status, _) = call(
        &db,
        Method::POST,
        "/reservations",
        Some(json!({ "roomId": room_id, "guest": guest_json(&joao) })),
        Some(&token),
    );
    assert_eq!(status, 201);

    let (status, _) = call(
        &db,
        Method::PUT,
        &format!("/rooms/{room_id}/status"),
        Some(json!({ "status": "available" })),
        Some(&token),
    );
    assert_eq!(status, 200);

    // Ana's entry is completed; Joao's booking and ledger entry survive.
    let (_, reservations) = call(&db, Method::GET, "/reservations", None, None);
    assert_eq!(reservations.as_array().unwrap().len(), 1);

    let (_, history) = call(&db, Method::GET, "/history", None, None);
    for entry in history.as_array().unwrap() {
        match entry["guest"]["name"].as_str().unwrap() {
            "Ana" => assert_eq!(entry["status"], "completed"),
            "Joao" => assert_eq!(entry["status"], "active"),
            other => panic!("unexpected ledger entry for {other}"),
        }
    }
}

#[test]
fn cancelling_a_reservation_cancels_its_ledger_entry() {
    let db = make_db("res_cancel");
    let token = issue_token(&db);
    let room_id = insert_room(&db, "103", RoomType::Triplo, 3, 150.0);

    let today = Utc::now().date_naive();
    let g = guest("Joao", 2, today + Duration::days(4), today + Duration::days(6));
    let (_, body) = call(
        &db,
        Method::POST,
        "/reservations",
        Some(json!({ "roomId": room_id, "guest": guest_json(&g) })),
        Some(&token),
    );
    let reservation_id = body["id"].as_str().unwrap().to_string();

    let (status, _) = call(
        &db,
        Method::DELETE,
        &format!("/reservations/{reservation_id}"),
        None,
        Some(&token),
    );
    assert_eq!(status, 200);

    let (_, reservations) = call(&db, Method::GET, "/reservations", None, None);
    assert_eq!(reservations.as_array().unwrap().len(), 0);

    let (_, history) = call(&db, Method::GET, "/history", None, None);
    assert_eq!(history[0]["status"], "cancelled");

    // Cancelling twice is a 404.
    let (status, _) = call(
        &db,
        Method::DELETE,
        &format!("/reservations/{reservation_id}"),
        None,
        Some(&token),
    );
    assert_eq!(status, 404);
}

#[test]
fn booking_an_unknown_room_is_404() {
    let db = make_db("res_404");
    let token = issue_token(&db);
    let today = Utc::now().date_naive();
    let g = guest("Maria", 1, today, today + Duration::days(1));

    let (status, _) = call(
        &db,
        Method::POST,
        "/reservations",
        Some(json!({ "roomId": "room_999", "guest": guest_json(&g) })),
        Some(&token),
    );
    assert_eq!(status, 404);
}

#[test]
fn guest_payload_is_validated() {
    let db = make_db("res_validate");
    let token = issue_token(&db);
    let room_id = insert_room(&db, "101", RoomType::Solteiro, 1, 80.0);
    let today = Utc::now().date_naive();

    // Empty guest name.
    let mut g = guest("", 1, today, today + Duration::days(1));
    let (status, _) = call(
        &db,
        Method::POST,
        "/reservations",
        Some(json!({ "roomId": room_id, "guest": guest_json(&g) })),
        Some(&token),
    );
    assert_eq!(status, 400);

    // Check-out before check-in.
    g = guest("Maria", 1, today + Duration::days(3), today + Duration::days(1));
    let (status, _) = call(
        &db,
        Method::POST,
        "/reservations",
        Some(json!({ "roomId": room_id, "guest": guest_json(&g) })),
        Some(&token),
    );
    assert_eq!(status, 400);
}

#[test]
fn expenses_only_attach_to_occupied_rooms() {
    let db = make_db("expenses");
    let token = issue_token(&db);
    let room_id = insert_room(&db, "102", RoomType::Casal, 2, 120.0);

    let (status, body) = call(
        &db,
        Method::POST,
        "/expenses",
        Some(json!({ "roomId": room_id, "description": "Minibar", "value": 35.0 })),
        Some(&token),
    );
    assert_eq!(status, 400);
    assert!(body["error"].as_str().unwrap().contains("not occupied"));

    let today = Utc::now().date_naive();
    let g = guest("Maria", 2, today, today + Duration::days(1));
    call(
        &db,
        Method::POST,
        "/reservations",
        Some(json!({ "roomId": room_id, "guest": guest_json(&g) })),
        Some(&token),
    );

    let (status, body) = call(
        &db,
        Method::POST,
        "/expenses",
        Some(json!({ "roomId": room_id, "description": "Minibar", "value": 35.0 })),
        Some(&token),
    );
    assert_eq!(status, 201);
    assert_eq!(body["expense"]["description"], "Minibar");
    assert_eq!(body["expense"]["value"], 35.0);

    let (_, room) = call(&db, Method::GET, &format!("/rooms/{room_id}"), None, None);
    let expenses = room["guest"]["expenses"].as_array().unwrap();
    assert_eq!(expenses.len(), 1);

    // Non-positive values are rejected.
    let (status, _) = call(
        &db,
        Method::POST,
        "/expenses",
        Some(json!({ "roomId": room_id, "description": "Minibar", "value": 0.0 })),
        Some(&token),
    );
    assert_eq!(status, 400);
}
