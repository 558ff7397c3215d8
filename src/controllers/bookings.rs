use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::controllers::{parse_date, parse_optional_date};
use crate::error::ApiError;
use crate::middleware::{AdminUser, AuthUser};
use crate::models::Booking;
use crate::services::booking::{CreateBookingRequest, ListFilters};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/guest/bookings", get(get_user_bookings).post(create_booking))
        .route("/guest/bookings/{id}/cancel", post(cancel_booking))
        .route("/admin/bookings", get(list_bookings))
        .route("/admin/bookings/{id}/check-in", post(check_in))
        .route("/admin/bookings/{id}/check-out", post(check_out))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: String,
    pub room_id: String,
    pub user_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub status: &'static str,
}

impl From<Booking> for BookingResponse {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            room_id: b.room_id,
            user_id: b.user_id,
            check_in: b.check_in,
            check_out: b.check_out,
            status: b.status.as_str(),
        }
    }
}

#[derive(Debug, Serialize)]
struct BookingsResponse {
    bookings: Vec<BookingResponse>,
}

impl From<Vec<Booking>> for BookingsResponse {
    fn from(bookings: Vec<Booking>) -> Self {
        Self { bookings: bookings.into_iter().map(BookingResponse::from).collect() }
    }
}

/* ---------- GUEST ---------- */

// POST /api/guest/bookings
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateBookingBody {
    #[serde(default)]
    user_id: String,
    #[serde(default)]
    room_id: String,
    check_in: Option<String>,
    check_out: Option<String>,
    #[serde(default)]
    guests: u32,
}

async fn create_booking(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    payload: Result<Json<CreateBookingBody>, JsonRejection>,
) -> Result<(StatusCode, Json<BookingResponse>), ApiError> {
    let Json(body) = payload?;
    if body.user_id.trim().is_empty() {
        return Err(ApiError::bad_request("userId is required"));
    }
    if body.room_id.trim().is_empty() {
        return Err(ApiError::bad_request("roomId is required"));
    }
    user.ensure_can_act_for(&body.user_id)?;

    let check_in = parse_date("checkIn", body.check_in.as_deref())?;
    let check_out = parse_date("checkOut", body.check_out.as_deref())?;

    let booking = state
        .bookings
        .create(CreateBookingRequest {
            user_id: body.user_id,
            room_id: body.room_id,
            check_in,
            check_out,
            guests: body.guests,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(booking.into())))
}

// GET /api/guest/bookings?userId=
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserBookingsQuery {
    user_id: Option<String>,
}

async fn get_user_bookings(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(params): Query<UserBookingsQuery>,
) -> Result<Json<BookingsResponse>, ApiError> {
    let user_id = params
        .user_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("userId required"))?;
    user.ensure_can_act_for(&user_id)?;

    let bookings = state.bookings.list_by_user(&user_id).await?;
    Ok(Json(bookings.into()))
}

// POST /api/guest/bookings/{id}/cancel
async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if user.0.is_some() {
        let booking = state.bookings.get(&id).await?;
        user.ensure_can_act_for(&booking.user_id)?;
    }

    state.bookings.cancel(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/* ---------- ADMIN ---------- */

// GET /api/admin/bookings?from&to
#[derive(Debug, Deserialize)]
struct ListQuery {
    from: Option<String>,
    to: Option<String>,
}

async fn list_bookings(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Query(params): Query<ListQuery>,
) -> Result<Json<BookingsResponse>, ApiError> {
    let filters = ListFilters {
        from: parse_optional_date("from", params.from.as_deref())?,
        to: parse_optional_date("to", params.to.as_deref())?,
    };
    let bookings = state.bookings.list(filters).await?;
    Ok(Json(bookings.into()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActionQuery {
    action_date: Option<String>,
}

// POST /api/admin/bookings/{id}/check-in?actionDate=
async fn check_in(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Query(params): Query<ActionQuery>,
) -> Result<Json<BookingResponse>, ApiError> {
    let action_date = parse_optional_date("actionDate", params.action_date.as_deref())?;
    let booking = state.bookings.check_in(&id, action_date).await?;
    Ok(Json(booking.into()))
}

// POST /api/admin/bookings/{id}/check-out?actionDate=
async fn check_out(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Query(params): Query<ActionQuery>,
) -> Result<Json<BookingResponse>, ApiError> {
    let action_date = parse_optional_date("actionDate", params.action_date.as_deref())?;
    let booking = state.bookings.check_out(&id, action_date).await?;
    Ok(Json(booking.into()))
}
