pub mod handle;

use serde::{Deserialize, Serialize};

use crate::Identity;

/// A request for food posted by an NGO and answered by a restaurant.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FoodRequest {
    pub id: u64,
    pub ngo_id: Identity,
    pub food_type: String,
    pub quantity: u32,
    #[serde(default)]
    pub description: String,
    pub status: FoodRequestStatus,
    /// The restaurant that answered this request.
    #[serde(default)]
    pub restaurant_id: Option<Identity>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodRequestStatus {
    Pending,
    Accepted,
    Rejected,
}
