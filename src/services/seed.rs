use chrono::{Duration, NaiveDate};
use std::sync::Arc;
use tracing::info;

use crate::models::{Booking, BookingStatus, Role, Room, RoomStatus, User};
use crate::repository::{BookingRepository, RepositoryError, RoomRepository, UserRepository};
use crate::services::auth::{AuthError, PasswordChecker};
use crate::services::{system_clock, Clock};

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("invalid seed date {0}-{1}-{2}")]
    InvalidDate(i32, u32, u32),
    #[error(transparent)]
    Hashing(#[from] AuthError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub rooms: usize,
    pub bookings: usize,
}

/// Loads the fixed demo data set.
pub struct Seeder {
    users: Arc<dyn UserRepository>,
    rooms: Arc<dyn RoomRepository>,
    bookings: Arc<dyn BookingRepository>,
    checker: Arc<dyn PasswordChecker>,
    clock: Clock,
}

impl Seeder {
    pub fn new(
        users: Arc<dyn UserRepository>,
        rooms: Arc<dyn RoomRepository>,
        bookings: Arc<dyn BookingRepository>,
        checker: Arc<dyn PasswordChecker>,
    ) -> Self {
        Self {
            users,
            rooms,
            bookings,
            checker,
            clock: system_clock(),
        }
    }

    pub async fn seed(&self) -> Result<SeedSummary, SeedError> {
        let now = (self.clock)();

        let users = [
            ("user-admin-1", "admin@stayflex.test", "admin123", Role::Admin),
            ("user-guest-1", "guest1@stayflex.test", "password123", Role::Guest),
            ("user-guest-2", "guest2@stayflex.test", "password456", Role::Guest),
        ];
        for (id, email, password, role) in users {
            self.users
                .save_user(User {
                    id: id.to_string(),
                    email: email.to_string(),
                    password_hash: self.checker.hash(password)?,
                    role,
                })
                .await?;
        }

        let rooms = [
            ("room-101", "Standard 101", "Standard", 2, 100.0),
            ("room-102", "Standard 102", "Standard", 2, 120.0),
            ("room-201", "Deluxe Suite", "Deluxe", 3, 180.0),
            ("room-301", "Suite 301", "Suite", 4, 250.0),
        ];
        for (id, name, room_type, capacity, base_price) in rooms {
            self.rooms
                .save_room(Room {
                    id: id.to_string(),
                    name: name.to_string(),
                    room_type: room_type.to_string(),
                    capacity,
                    base_price,
                    status: RoomStatus::Available,
                })
                .await?;
        }

        let bookings = [
            ("booking-1", "user-guest-1", "room-101", (2025, 12, 1), (2025, 12, 5), BookingStatus::Confirmed),
            ("booking-102", "user-guest-1", "room-102", (2025, 12, 1), (2025, 12, 5), BookingStatus::Confirmed),
            ("booking-2", "user-guest-2", "room-201", (2025, 12, 10), (2025, 12, 12), BookingStatus::Confirmed),
            ("booking-4", "user-guest-1", "room-201", (2025, 12, 1), (2025, 12, 5), BookingStatus::Confirmed),
            ("booking-5", "user-guest-1", "room-101", (2025, 12, 20), (2025, 12, 22), BookingStatus::Confirmed),
            ("booking-6", "user-guest-2", "room-201", (2025, 12, 12), (2025, 12, 15), BookingStatus::Confirmed),
            ("booking-3", "user-guest-1", "room-301", (2024, 11, 1), (2024, 11, 3), BookingStatus::CheckedOut),
        ];
        for (id, user_id, room_id, check_in, check_out, status) in bookings {
            let check_in = seed_date(check_in)?;
            let check_out = seed_date(check_out)?;
            let created_at = if status == BookingStatus::CheckedOut { now - Duration::days(30) } else { now };
            self.bookings
                .save_booking(Booking {
                    id: id.to_string(),
                    user_id: user_id.to_string(),
                    room_id: room_id.to_string(),
                    check_in,
                    check_out,
                    status,
                    created_at,
                })
                .await?;
        }

        let summary = SeedSummary {
            users: users.len(),
            rooms: rooms.len(),
            bookings: bookings.len(),
        };
        info!(
            "seeded users={} rooms={} bookings={}",
            summary.users, summary.rooms, summary.bookings
        );
        Ok(summary)
    }
}

fn seed_date((y, m, d): (i32, u32, u32)) -> Result<NaiveDate, SeedError> {
    NaiveDate::from_ymd_opt(y, m, d).ok_or(SeedError::InvalidDate(y, m, d))
}
