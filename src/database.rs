use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use crate::models::{Booking, Room, RoomStatus, User};
use crate::repository::{
    BookingRepository, RepositoryError, RepositoryResult, RoomRepository, UserRepository,
};

/// Process-wide in-memory store.
///
/// Each collection sits behind its own `RwLock`, so there is at most one
/// writer per collection at a time. Locks are never held across an `.await`.
#[derive(Default)]
pub struct InMemoryStore {
    users: RwLock<BTreeMap<String, User>>,
    rooms: RwLock<BTreeMap<String, Room>>,
    bookings: RwLock<BTreeMap<String, Booking>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn read<T>(lock: &RwLock<T>) -> RepositoryResult<RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|_| RepositoryError::Storage("store lock poisoned".to_string()))
}

fn write<T>(lock: &RwLock<T>) -> RepositoryResult<RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|_| RepositoryError::Storage("store lock poisoned".to_string()))
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn save_user(&self, mut user: User) -> RepositoryResult<()> {
        user.email = user.email.trim().to_string();
        if user.email.is_empty() {
            return Err(RepositoryError::Validation("user email required".to_string()));
        }
        let mut users = write(&self.users)?;
        if users
            .values()
            .any(|u| u.id != user.id && u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(RepositoryError::Validation(format!(
                "email {} already registered",
                user.email
            )));
        }
        debug!("saving user {}", user.id);
        users.insert(user.id.clone(), user);
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        // same rule as the duplicate check in save_user
        let email = email.trim();
        let users = read(&self.users)?;
        Ok(users.values().find(|u| u.email.eq_ignore_ascii_case(email)).cloned())
    }
}

#[async_trait]
impl RoomRepository for InMemoryStore {
    async fn list_rooms(&self) -> RepositoryResult<Vec<Room>> {
        Ok(read(&self.rooms)?.values().cloned().collect())
    }

    async fn find_room_by_id(&self, id: &str) -> RepositoryResult<Option<Room>> {
        Ok(read(&self.rooms)?.get(id).cloned())
    }

    async fn save_room(&self, room: Room) -> RepositoryResult<()> {
        if room.id.is_empty() {
            return Err(RepositoryError::Validation("room id required".to_string()));
        }
        write(&self.rooms)?.insert(room.id.clone(), room);
        Ok(())
    }

    async fn update_room_status(&self, id: &str, status: RoomStatus) -> RepositoryResult<Room> {
        let mut rooms = write(&self.rooms)?;
        let room = rooms
            .get_mut(id)
            .ok_or_else(|| RepositoryError::NotFound(format!("room {}", id)))?;
        room.status = status;
        Ok(room.clone())
    }

    async fn delete_room(&self, id: &str) -> RepositoryResult<()> {
        write(&self.rooms)?
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::NotFound(format!("room {}", id)))
    }
}

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn list_bookings(&self) -> RepositoryResult<Vec<Booking>> {
        Ok(read(&self.bookings)?.values().cloned().collect())
    }

    async fn find_booking_by_id(&self, id: &str) -> RepositoryResult<Option<Booking>> {
        Ok(read(&self.bookings)?.get(id).cloned())
    }

    async fn find_bookings_by_user(&self, user_id: &str) -> RepositoryResult<Vec<Booking>> {
        let bookings = read(&self.bookings)?;
        Ok(bookings
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn save_booking(&self, booking: Booking) -> RepositoryResult<()> {
        if booking.id.is_empty() {
            return Err(RepositoryError::Validation("booking id required".to_string()));
        }
        write(&self.bookings)?.insert(booking.id.clone(), booking);
        Ok(())
    }
}
