use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateFoodRequestDescriptor {
    pub food_type: String,
    pub quantity: u32,
    #[serde(default)]
    pub description: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CreateFoodRequestResult {
    pub id: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FoodDecision {
    Accepted,
    Rejected,
}

impl From<FoodDecision> for super::FoodRequestStatus {
    fn from(value: FoodDecision) -> Self {
        match value {
            FoodDecision::Accepted => super::FoodRequestStatus::Accepted,
            FoodDecision::Rejected => super::FoodRequestStatus::Rejected,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct DecideFoodRequestDescriptor {
    pub request: u64,
    pub decision: FoodDecision,
}
