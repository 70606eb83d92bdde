mod auth_tests;
mod history_tests;
mod reservation_tests;
