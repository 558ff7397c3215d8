use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::controllers::parse_date;
use crate::error::ApiError;
use crate::middleware::AdminUser;
use crate::models::Room;
use crate::services::room::{CreateRoomRequest, SearchInput};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/guest/rooms/search", get(search_rooms))
        .route("/admin/rooms", get(list_rooms).post(create_room))
        .route("/admin/rooms/{id}", patch(update_room_status).delete(delete_room))
}

#[derive(Debug, Serialize)]
struct RoomsResponse {
    rooms: Vec<Room>,
}

/* ---------- GUEST ---------- */

// GET /api/guest/rooms/search?checkIn&checkOut&guests
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchQuery {
    check_in: Option<String>,
    check_out: Option<String>,
    guests: Option<String>,
}

async fn search_rooms(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<RoomsResponse>, ApiError> {
    let check_in = parse_date("checkIn", params.check_in.as_deref())?;
    let check_out = parse_date("checkOut", params.check_out.as_deref())?;
    let guests = match params.guests.as_deref().map(str::trim) {
        None | Some("") => 0,
        Some(g) => g
            .parse::<u32>()
            .map_err(|_| ApiError::bad_request("invalid guests"))?,
    };

    let rooms = state
        .rooms
        .search(SearchInput { check_in, check_out, guests })
        .await?;
    Ok(Json(RoomsResponse { rooms }))
}

/* ---------- ADMIN ---------- */

// GET /api/admin/rooms
async fn list_rooms(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<Json<RoomsResponse>, ApiError> {
    let rooms = state.rooms.list().await?;
    Ok(Json(RoomsResponse { rooms }))
}

// POST /api/admin/rooms
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateRoomBody {
    id: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default, rename = "type")]
    room_type: String,
    #[serde(default)]
    capacity: u32,
    #[serde(default)]
    base_price: f64,
    status: Option<String>,
}

async fn create_room(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    payload: Result<Json<CreateRoomBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Room>), ApiError> {
    let Json(body) = payload?;
    let room = state
        .rooms
        .create(CreateRoomRequest {
            id: body.id,
            name: body.name,
            room_type: body.room_type,
            capacity: body.capacity,
            base_price: body.base_price,
            status: body.status,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(room)))
}

// PATCH /api/admin/rooms/{id}
#[derive(Debug, Deserialize)]
struct UpdateStatusBody {
    #[serde(default)]
    status: String,
}

async fn update_room_status(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdateStatusBody>, JsonRejection>,
) -> Result<Json<Room>, ApiError> {
    let Json(body) = payload?;
    let room = state.rooms.update_status(&id, &body.status).await?;
    Ok(Json(room))
}

// DELETE /api/admin/rooms/{id}
async fn delete_room(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.rooms.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
