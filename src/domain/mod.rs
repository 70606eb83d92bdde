pub mod guest;
pub mod pricing;
pub mod reservation;
pub mod room;
pub mod user;

pub use guest::{Expense, Guest};
pub use reservation::{GuestHistoryEntry, HistoryStatus, Reservation, ReservationOutcome};
pub use room::{Room, RoomStatus, RoomType};
pub use user::User;
