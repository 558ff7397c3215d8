use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::models::{Room, RoomStatus};
use crate::repository::{BookingRepository, RepositoryError, RoomRepository};
use crate::services::availability::{AvailabilityEngine, StayRequest};
use crate::services::booking::start_of_day;
use crate::services::{system_clock, write_lock, Clock, WriteLock};

#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    #[error("invalid room data: {0}")]
    InvalidRoomData(String),
    #[error("invalid room status")]
    InvalidStatus,
    #[error("room not found")]
    NotFound,
    #[error("room {0} already exists")]
    AlreadyExists(String),
    #[error("cannot delete room with future bookings")]
    HasFutureBookings,
    #[error("invalid date range")]
    InvalidDateRange,
    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for RoomError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(_) => RoomError::NotFound,
            other => RoomError::Repository(other),
        }
    }
}

#[derive(Debug, Clone, Default, Validate)]
pub struct CreateRoomRequest {
    pub id: Option<String>,
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "type is required"))]
    pub room_type: String,
    #[validate(range(min = 1, message = "capacity must be positive"))]
    pub capacity: u32,
    #[validate(range(exclusive_min = 0.0, message = "base price must be positive"))]
    pub base_price: f64,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct SearchInput {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
}

pub struct RoomService {
    rooms: Arc<dyn RoomRepository>,
    bookings: Arc<dyn BookingRepository>,
    availability: AvailabilityEngine,
    write_lock: WriteLock,
    clock: Clock,
}

impl RoomService {
    pub fn new(
        rooms: Arc<dyn RoomRepository>,
        bookings: Arc<dyn BookingRepository>,
        availability: AvailabilityEngine,
    ) -> Self {
        Self {
            rooms,
            bookings,
            availability,
            write_lock: write_lock(),
            clock: system_clock(),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_write_lock(mut self, lock: WriteLock) -> Self {
        self.write_lock = lock;
        self
    }

    pub async fn search(&self, input: SearchInput) -> Result<Vec<Room>, RoomError> {
        if input.check_out <= input.check_in {
            return Err(RoomError::InvalidDateRange);
        }
        let stay = StayRequest {
            check_in: input.check_in,
            check_out: input.check_out,
            guests: input.guests,
            excluding: None,
        };
        Ok(self.availability.available_rooms(stay).await?)
    }

    pub async fn list(&self) -> Result<Vec<Room>, RoomError> {
        Ok(self.rooms.list_rooms().await?)
    }

    pub async fn create(&self, req: CreateRoomRequest) -> Result<Room, RoomError> {
        let name = req.name.trim().to_string();
        let room_type = req.room_type.trim().to_string();
        let trimmed = CreateRoomRequest { name, room_type, ..req };
        trimmed
            .validate()
            .map_err(|e| RoomError::InvalidRoomData(e.to_string()))?;

        let status = RoomStatus::normalize(trimmed.status.as_deref().unwrap_or(""))
            .ok_or(RoomError::InvalidStatus)?;

        let id = match trimmed.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => {
                if self.rooms.find_room_by_id(id).await?.is_some() {
                    return Err(RoomError::AlreadyExists(id.to_string()));
                }
                id.to_string()
            }
            _ => format!("room-{}", Uuid::new_v4()),
        };

        let room = Room {
            id,
            name: trimmed.name,
            room_type: trimmed.room_type,
            capacity: trimmed.capacity,
            base_price: trimmed.base_price,
            status,
        };
        self.rooms.save_room(room.clone()).await?;
        info!("room {} created ({})", room.id, room.status.as_str());
        Ok(room)
    }

    pub async fn update_status(&self, id: &str, status: &str) -> Result<Room, RoomError> {
        if id.is_empty() {
            return Err(RoomError::NotFound);
        }
        if status.trim().is_empty() {
            return Err(RoomError::InvalidStatus);
        }
        let status = RoomStatus::normalize(status).ok_or(RoomError::InvalidStatus)?;

        let room = self.rooms.update_room_status(id, status).await?;
        info!("room {} status set to {}", room.id, room.status.as_str());
        Ok(room)
    }

    pub async fn delete(&self, id: &str) -> Result<(), RoomError> {
        if id.is_empty() {
            return Err(RoomError::NotFound);
        }

        // no booking may land between the check and the removal
        let _guard = self.write_lock.lock().await;
        let now = (self.clock)();
        let bookings = self.bookings.list_bookings().await?;
        let blocking = bookings
            .iter()
            .any(|b| b.room_id == id && !b.is_cancelled() && start_of_day(b.check_out) > now);
        if blocking {
            warn!("refusing to delete room {}: it has current or future bookings", id);
            return Err(RoomError::HasFutureBookings);
        }

        self.rooms.delete_room(id).await?;
        info!("room {} deleted", id);
        Ok(())
    }
}
