//! Availability / overlap engine.
//!
//! Decides whether a room can take a stay over `[check_in, check_out)`.
//! Occupancy is half-open: the check-out day is free for the next guest.
//! Cancelled bookings never block a room.

use chrono::NaiveDate;
use std::sync::Arc;

use crate::models::{Booking, Room};
use crate::repository::{BookingRepository, RepositoryError, RoomRepository};

#[derive(Debug, thiserror::Error)]
pub enum AvailabilityError {
    #[error("room not found")]
    RoomNotFound,
    #[error("room is out of order")]
    RoomOutOfOrder,
    #[error("guests exceed room capacity")]
    GuestsExceedCapacity,
    #[error("room is not available for the selected dates")]
    Overlap,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// A stay being checked against the room's existing bookings.
#[derive(Debug, Clone, Copy)]
pub struct StayRequest<'a> {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
    /// Booking to ignore, e.g. when re-validating an existing reservation.
    pub excluding: Option<&'a str>,
}

#[derive(Clone)]
pub struct AvailabilityEngine {
    rooms: Arc<dyn RoomRepository>,
    bookings: Arc<dyn BookingRepository>,
}

impl AvailabilityEngine {
    pub fn new(rooms: Arc<dyn RoomRepository>, bookings: Arc<dyn BookingRepository>) -> Self {
        Self { rooms, bookings }
    }

    /// Returns the room when the stay can be accepted, or the reason it can't.
    pub async fn check(&self, room_id: &str, stay: StayRequest<'_>) -> Result<Room, AvailabilityError> {
        let room = self
            .rooms
            .find_room_by_id(room_id)
            .await?
            .ok_or(AvailabilityError::RoomNotFound)?;

        let bookings = self.bookings.list_bookings().await?;
        check_room(&room, &bookings, stay)?;
        Ok(room)
    }

    pub async fn is_available(
        &self,
        room_id: &str,
        check_in: NaiveDate,
        check_out: NaiveDate,
        excluding: Option<&str>,
    ) -> Result<bool, RepositoryError> {
        let stay = StayRequest { check_in, check_out, guests: 0, excluding };
        match self.check(room_id, stay).await {
            Ok(_) => Ok(true),
            Err(AvailabilityError::Repository(e)) => Err(e),
            Err(_) => Ok(false),
        }
    }

    /// Every room that could take the stay, in id order.
    pub async fn available_rooms(&self, stay: StayRequest<'_>) -> Result<Vec<Room>, RepositoryError> {
        let rooms = self.rooms.list_rooms().await?;
        let bookings = self.bookings.list_bookings().await?;

        Ok(rooms
            .into_iter()
            .filter(|room| check_room(room, &bookings, stay).is_ok())
            .collect())
    }
}

/// Pure eligibility check of one room against a snapshot of bookings.
pub fn check_room(room: &Room, bookings: &[Booking], stay: StayRequest<'_>) -> Result<(), AvailabilityError> {
    if !room.is_available() {
        return Err(AvailabilityError::RoomOutOfOrder);
    }
    if !room.fits(stay.guests) {
        return Err(AvailabilityError::GuestsExceedCapacity);
    }
    if has_overlap(bookings, &room.id, stay.check_in, stay.check_out, stay.excluding) {
        return Err(AvailabilityError::Overlap);
    }
    Ok(())
}

pub fn has_overlap(
    bookings: &[Booking],
    room_id: &str,
    check_in: NaiveDate,
    check_out: NaiveDate,
    excluding: Option<&str>,
) -> bool {
    bookings.iter().any(|b| {
        b.room_id == room_id
            && !b.is_cancelled()
            && excluding != Some(b.id.as_str())
            && b.overlaps(check_in, check_out)
    })
}
