pub mod auth;
pub mod availability;
pub mod booking;
pub mod room;
pub mod seed;

use chrono::{NaiveDateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Source of "now" for services; tests pin it to a fixed instant.
pub type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

pub fn system_clock() -> Clock {
    Arc::new(|| Utc::now().naive_utc())
}

/// Serialises every check-then-write on bookings, across services.
pub type WriteLock = Arc<Mutex<()>>;

pub fn write_lock() -> WriteLock {
    Arc::new(Mutex::new(()))
}

#[cfg(test)]
pub(crate) fn fixed_clock(at: NaiveDateTime) -> Clock {
    Arc::new(move || at)
}
