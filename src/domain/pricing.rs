// src/domain/pricing.rs

use chrono::NaiveDate;

use crate::domain::guest::Expense;

/// Number of billable nights between two dates, floored to a minimum
/// of one. A same-day stay still bills a single night.
///
/// Callers are responsible for validating that check-out is not before
/// check-in; this function just clamps.
pub fn nights_between(check_in: NaiveDate, check_out: NaiveDate) -> i64 {
    let nights = (check_out - check_in).num_days();
    nights.max(1)
}

/// Total price of a stay: nightly per-person rate x party size x nights,
/// plus every incidental expense. Pure, no side effects.
pub fn total_stay_price(
    nightly_rate: f64,
    guests: u32,
    check_in: NaiveDate,
    check_out: NaiveDate,
    expenses: &[Expense],
) -> f64 {
    let nights = nights_between(check_in, check_out) as f64;
    let expenses_total: f64 = expenses.iter().map(|e| e.value).sum();
    nightly_rate * guests as f64 * nights + expenses_total
}

/// Whether a check-in date counts as a future booking. Both sides are
/// calendar dates (already truncated to midnight), so a same-day
/// check-in is always "now", never "future".
pub fn is_future_check_in(check_in: NaiveDate, today: NaiveDate) -> bool {
    check_in > today
}
