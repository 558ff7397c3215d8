pub mod auth;
pub mod bookings;
pub mod rooms;

use axum::extract::rejection::JsonRejection;
use axum::Router;
use chrono::NaiveDate;
use std::sync::Arc;

use crate::error::ApiError;

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(auth::routes())
        .merge(rooms::routes())
        .merge(bookings::routes())
}

/* ---------- helpers ---------- */

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a required `YYYY-MM-DD` value.
pub(crate) fn parse_date(field: &str, value: Option<&str>) -> Result<NaiveDate, ApiError> {
    let value = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::bad_request(format!("{} is required", field)))?;
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| ApiError::bad_request(format!("invalid {}", field)))
}

/// Parses an optional `YYYY-MM-DD` value; empty counts as absent.
pub(crate) fn parse_optional_date(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => parse_date(field, Some(v)).map(Some),
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(format!("invalid body: {}", rejection.body_text()))
    }
}
