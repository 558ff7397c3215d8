//! Storage ports.
//!
//! Services only see these traits, so the in-memory store in
//! [`crate::database`] can be swapped for a persistent backend without
//! touching business logic.

use async_trait::async_trait;

use crate::models::{Booking, Room, RoomStatus, User};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("storage error: {0}")]
    Storage(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn save_user(&self, user: User) -> RepositoryResult<()>;
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
}

#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn list_rooms(&self) -> RepositoryResult<Vec<Room>>;
    async fn find_room_by_id(&self, id: &str) -> RepositoryResult<Option<Room>>;
    async fn save_room(&self, room: Room) -> RepositoryResult<()>;
    async fn update_room_status(&self, id: &str, status: RoomStatus) -> RepositoryResult<Room>;
    async fn delete_room(&self, id: &str) -> RepositoryResult<()>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn list_bookings(&self) -> RepositoryResult<Vec<Booking>>;
    async fn find_booking_by_id(&self, id: &str) -> RepositoryResult<Option<Booking>>;
    async fn find_bookings_by_user(&self, user_id: &str) -> RepositoryResult<Vec<Booking>>;
    /// Inserts or replaces by id.
    async fn save_booking(&self, booking: Booking) -> RepositoryResult<()>;
}
