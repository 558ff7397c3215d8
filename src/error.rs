use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::repository::RepositoryError;
use crate::services::{
    auth::AuthError, availability::AvailabilityError, booking::BookingError, room::RoomError,
};

/// Error returned by handlers: a status code and a plain-text message.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    fn internal(err: &dyn std::fmt::Display) -> Self {
        tracing::error!("internal error: {}", err);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, err.to_string()),
            RepositoryError::Validation(_) => Self::bad_request(err.to_string()),
            RepositoryError::Storage(_) => Self::internal(&err),
        }
    }
}

impl From<AvailabilityError> for ApiError {
    fn from(err: AvailabilityError) -> Self {
        match err {
            AvailabilityError::Repository(e) => e.into(),
            // a missing room is a bad booking request, not a missing resource
            other => Self::bad_request(other.to_string()),
        }
    }
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::NotFound => Self::new(StatusCode::NOT_FOUND, err.to_string()),
            BookingError::Unavailable(e) => e.into(),
            BookingError::Repository(e) => e.into(),
            other => Self::bad_request(other.to_string()),
        }
    }
}

impl From<RoomError> for ApiError {
    fn from(err: RoomError) -> Self {
        match err {
            RoomError::NotFound => Self::new(StatusCode::NOT_FOUND, err.to_string()),
            RoomError::Repository(e) => e.into(),
            other => Self::bad_request(other.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::InvalidToken => Self::unauthorized(err.to_string()),
            AuthError::Repository(e) => e.into(),
            other => Self::internal(&other),
        }
    }
}
