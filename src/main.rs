use std::net::SocketAddr;
use std::time::{SystemTime, UNIX_EPOCH};

use astra::Server;

use hotel_simple::db::{init_db, seed, Database};
use hotel_simple::responses::error_to_response;
use hotel_simple::router::handle;

fn main() {
    let db_path = std::env::var("HOTEL_DB_PATH").unwrap_or_else(|_| "hotel.sqlite3".to_string());
    let db = Database::new(db_path);

    if let Err(e) = init_db(&db, "sql/schema.sql") {
        eprintln!("Database initialization failed: {e}");
        std::process::exit(1);
    }

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0);
    if let Err(e) = seed::seed_if_empty(&db, now) {
        eprintln!("Database seeding failed: {e}");
        std::process::exit(1);
    }

    let addr_str = std::env::var("HOTEL_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    let addr: SocketAddr = match addr_str.parse() {
        Ok(addr) => addr,
        Err(e) => {
            eprintln!("Invalid HOTEL_ADDR {addr_str:?}: {e}");
            std::process::exit(1);
        }
    };

    println!("Starting server at http://{addr}");

    let server = Server::bind(&addr).max_workers(8);

    let result = server.serve(move |req, _info| match handle(req, &db) {
        Ok(resp) => resp,
        Err(err) => error_to_response(err),
    });

    if let Err(e) = result {
        eprintln!("Server ended with error: {e}");
    }

    println!("Server shut down cleanly.");
}
