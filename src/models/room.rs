use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Available,
    OutOfOrder,
}

impl RoomStatus {
    /// Maps free-form input onto a recognised status.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace; an empty
    /// string counts as `available`. Anything else yields `None`.
    pub fn normalize(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "" | "available" => Some(RoomStatus::Available),
            "out_of_order" | "out-of-order" | "outoforder" => Some(RoomStatus::OutOfOrder),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoomStatus::Available => "available",
            RoomStatus::OutOfOrder => "out_of_order",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub room_type: String,
    pub capacity: u32,
    pub base_price: f64,
    pub status: RoomStatus,
}

impl Room {
    pub fn is_available(&self) -> bool {
        self.status == RoomStatus::Available
    }

    // guests == 0 means "not specified"
    pub fn fits(&self, guests: u32) -> bool {
        guests == 0 || self.capacity >= guests
    }
}
