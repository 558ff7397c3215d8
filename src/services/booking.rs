use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{Booking, BookingStatus};
use crate::repository::{BookingRepository, RepositoryError};
use crate::services::availability::{AvailabilityEngine, AvailabilityError, StayRequest};
use crate::services::{system_clock, write_lock, Clock, WriteLock};

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("invalid date range")]
    InvalidDateRange,
    #[error("booking not found")]
    NotFound,
    #[error("cannot cancel past bookings")]
    CannotCancelPast,
    #[error("cannot check in before the check-in date")]
    TooEarlyCheckIn,
    #[error("cannot check out before the check-out date")]
    TooEarlyCheckOut,
    #[error("cannot move booking from {from} to {to}")]
    InvalidTransition { from: BookingStatus, to: BookingStatus },
    #[error(transparent)]
    Unavailable(#[from] AvailabilityError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, Clone)]
pub struct CreateBookingRequest {
    pub user_id: String,
    pub room_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
}

/// Optional, independently applied bounds for the admin overview.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListFilters {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl ListFilters {
    fn matches(&self, booking: &Booking) -> bool {
        // day-granular: a stay ending on `to` is inside the range
        if let Some(from) = self.from {
            if booking.check_in < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if booking.check_out > to {
                return false;
            }
        }
        true
    }
}

pub struct BookingService {
    bookings: Arc<dyn BookingRepository>,
    availability: AvailabilityEngine,
    write_lock: WriteLock,
    clock: Clock,
}

impl BookingService {
    pub fn new(bookings: Arc<dyn BookingRepository>, availability: AvailabilityEngine) -> Self {
        Self {
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

    /// Shares the lock with other services that guard booking invariants.
    pub fn with_write_lock(mut self, lock: WriteLock) -> Self {
        self.write_lock = lock;
        self
    }

    fn now(&self) -> NaiveDateTime {
        (self.clock)()
    }

    pub async fn create(&self, req: CreateBookingRequest) -> Result<Booking, BookingError> {
        if req.check_out <= req.check_in {
            return Err(BookingError::InvalidDateRange);
        }

        let _guard = self.write_lock.lock().await;

        let stay = StayRequest {
            check_in: req.check_in,
            check_out: req.check_out,
            guests: req.guests,
            excluding: None,
        };
        if let Err(e) = self.availability.check(&req.room_id, stay).await {
            warn!("booking for room {} rejected: {}", req.room_id, e);
            return Err(e.into());
        }

        let booking = Booking {
            id: format!("booking-{}", Uuid::new_v4()),
            user_id: req.user_id,
            room_id: req.room_id,
            check_in: req.check_in,
            check_out: req.check_out,
            status: BookingStatus::Confirmed,
            created_at: self.now(),
        };
        self.bookings.save_booking(booking.clone()).await?;

        info!(
            "booking {} created for room {} ({} -> {})",
            booking.id, booking.room_id, booking.check_in, booking.check_out
        );
        Ok(booking)
    }

    pub async fn list_by_user(&self, user_id: &str) -> Result<Vec<Booking>, BookingError> {
        let mut bookings = self.bookings.find_bookings_by_user(user_id).await?;
        sort_by_stay(&mut bookings);
        Ok(bookings)
    }

    pub async fn list(&self, filters: ListFilters) -> Result<Vec<Booking>, BookingError> {
        let mut bookings: Vec<Booking> = self
            .bookings
            .list_bookings()
            .await?
            .into_iter()
            .filter(|b| filters.matches(b))
            .collect();
        sort_by_stay(&mut bookings);
        Ok(bookings)
    }

    pub async fn get(&self, booking_id: &str) -> Result<Booking, BookingError> {
        self.find(booking_id).await
    }

    pub async fn cancel(&self, booking_id: &str) -> Result<Booking, BookingError> {
        let _guard = self.write_lock.lock().await;
        let mut booking = self.find(booking_id).await?;

        if start_of_day(booking.check_in) < self.now() {
            warn!("refusing to cancel booking {}: stay already started", booking.id);
            return Err(BookingError::CannotCancelPast);
        }

        self.transition(&mut booking, BookingStatus::Cancelled).await?;
        Ok(booking)
    }

    /// `action_date` defaults to today.
    pub async fn check_in(&self, booking_id: &str, action_date: Option<NaiveDate>) -> Result<Booking, BookingError> {
        let _guard = self.write_lock.lock().await;
        let mut booking = self.find(booking_id).await?;

        let action_date = action_date.unwrap_or_else(|| self.now().date());
        if action_date < booking.check_in {
            return Err(BookingError::TooEarlyCheckIn);
        }

        self.transition(&mut booking, BookingStatus::CheckedIn).await?;
        Ok(booking)
    }

    pub async fn check_out(&self, booking_id: &str, action_date: Option<NaiveDate>) -> Result<Booking, BookingError> {
        let _guard = self.write_lock.lock().await;
        let mut booking = self.find(booking_id).await?;

        let action_date = action_date.unwrap_or_else(|| self.now().date());
        if action_date < booking.check_out {
            return Err(BookingError::TooEarlyCheckOut);
        }

        self.transition(&mut booking, BookingStatus::CheckedOut).await?;
        Ok(booking)
    }

    async fn find(&self, booking_id: &str) -> Result<Booking, BookingError> {
        self.bookings
            .find_booking_by_id(booking_id)
            .await?
            .ok_or(BookingError::NotFound)
    }

    async fn transition(&self, booking: &mut Booking, next: BookingStatus) -> Result<(), BookingError> {
        if !booking.status.can_transition_to(next) {
            return Err(BookingError::InvalidTransition { from: booking.status, to: next });
        }
        let previous = booking.status;
        booking.status = next;
        self.bookings.save_booking(booking.clone()).await?;
        info!("booking {} moved {} -> {}", booking.id, previous, next);
        Ok(())
    }
}

fn sort_by_stay(bookings: &mut [Booking]) {
    bookings.sort_by(|a, b| a.check_in.cmp(&b.check_in).then_with(|| a.id.cmp(&b.id)));
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}
