// src/tests/router_tests/history_tests.rs
use std::io::Read;

use chrono::{Duration, Utc};
use http::Method;
use serde_json::json;

use crate::domain::RoomType;
use crate::router::handle;
use crate::tests::utils::*;

#[test]
fn manual_ledger_entry_lifecycle() {
    let db = make_db("history_manual");
    let token = issue_token(&db);
    let room_id = insert_room(&db, "102", RoomType::Casal, 2, 120.0);

    let today = Utc::now().date_naive();
    let (status, body) = call(
        &db,
        Method::POST,
        "/history",
        Some(json!({
            "roomId": room_id,
            "guest": guest_json(&guest("Carla", 2, today, today + Duration::days(2))),
            "roomNumber": "102",
            "roomType": "Casal",
            "checkInDate": today.to_string(),
            "checkOutDate": (today + Duration::days(2)).to_string(),
            "totalPrice": 480.0
        })),
        Some(&token),
    );
    assert_eq!(status, 201);
    let entry_id = body["id"].as_str().unwrap().to_string();

    let (_, history) = call(&db, Method::GET, "/history", None, None);
    assert_eq!(history[0]["id"], entry_id.as_str());
    assert_eq!(history[0]["status"], "active");

    let (status, _) = call(
        &db,
        Method::PUT,
        &format!("/history/{entry_id}"),
        Some(json!({ "status": "completed" })),
        Some(&token),
    );
    assert_eq!(status, 200);

    let (_, history) = call(&db, Method::GET, "/history", None, None);
    assert_eq!(history[0]["status"], "completed");

    let (status, _) = call(&db, Method::DELETE, &format!("/history/{entry_id}"), None, Some(&token));
    assert_eq!(status, 200);

    let (_, history) = call(&db, Method::GET, "/history", None, None);
    assert_eq!(history.as_array().unwrap().len(), 0);
}

#[test]
fn history_lists_newest_first() {
    let db = make_db("history_order");
    let room_id = insert_room(&db, "101", RoomType::Solteiro, 1, 80.0);
    let today = Utc::now().date_naive();
    let base = now_unix();

    // Distinct timestamps so the ordering is deterministic.
    for (offset, name) in [(0i64, "First"), (10, "Second")] {
        let g = guest(name, 1, today, today + Duration::days(1));
        db.with_conn(|conn| {
            crate::db::history::append_history(
                conn,
                &crate::db::history::NewHistoryEntry {
                    room_id: &room_id,
                    reservation_id: None,
                    guest: &g,
                    room_number: "101",
                    room_type: RoomType::Solteiro,
                    check_in: today,
                    check_out: today + Duration::days(1),
                    total_price: 80.0,
                },
                base + offset,
            )
        })
        .unwrap();
    }

    let (_, history) = call(&db, Method::GET, "/history", None, None);
    let names: Vec<&str> = history
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["guest"]["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Second", "First"]);
}

#[test]
fn monthly_counter_skips_cancelled_entries() {
    let db = make_db("history_month");
    let token = issue_token(&db);
    let room_id = insert_room(&db, "103", RoomType::Triplo, 3, 150.0);
    let today = Utc::now().date_naive();

    // One kept booking, one cancelled.
    let mut cancelled_id = String::new();
    for name in ["Maria", "Joao"] {
        let g = guest(name, 2, today + Duration::days(3), today + Duration::days(5));
        let (status, body) = call(
            &db,
            Method::POST,
            "/reservations",
            Some(json!({ "roomId": room_id, "guest": guest_json(&g) })),
            Some(&token),
        );
        assert_eq!(status, 201);
        cancelled_id = body["id"].as_str().unwrap().to_string();
    }
    let (status, _) = call(
        &db,
        Method::DELETE,
        &format!("/reservations/{cancelled_id}"),
        None,
        Some(&token),
    );
    assert_eq!(status, 200);

    let count = db
        .with_conn(|conn| crate::db::history::count_entries_this_month(conn, now_unix()))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn invalid_status_value_is_rejected() {
    let db = make_db("history_status");
    let token = issue_token(&db);

    let (status, _) = call(
        &db,
        Method::PUT,
        "/history/history_x",
        Some(json!({ "status": "archived" })),
        Some(&token),
    );
    assert_eq!(status, 400);
}

#[test]
fn export_returns_a_spreadsheet_attachment() {
    let db = make_db("history_export");
    let token = issue_token(&db);
    let room_id = insert_room(&db, "102", RoomType::Casal, 2, 120.0);
    let today = Utc::now().date_naive();
    let g = guest("Maria", 2, today, today + Duration::days(1));
    call(
        &db,
        Method::POST,
        "/reservations",
        Some(json!({ "roomId": room_id, "guest": guest_json(&g) })),
        Some(&token),
    );

    let req = request(Method::GET, "/history/export.xlsx", None, None);
    let resp = handle(req, &db).unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(
        resp.headers()["Content-Type"],
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert!(resp.headers()["Content-Disposition"]
        .to_str()
        .unwrap()
        .contains("guest_history.xlsx"));

    let mut bytes = Vec::new();
    resp.into_body().reader().read_to_end(&mut bytes).unwrap();
    // XLSX is a zip container.
    assert_eq!(&bytes[..2], b"PK");
}
