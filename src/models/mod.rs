pub mod user;
pub mod room;
pub mod booking;

pub use user::{Role, User};
pub use room::{Room, RoomStatus};
pub use booking::{Booking, BookingStatus};
