pub mod handle;

use serde::{Deserialize, Serialize};

use crate::Identity;

/// Represents a volunteer task with a fixed capacity.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Opportunity {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub date: chrono::NaiveDate,
    /// Free-form time of day, as entered by the organization.
    pub time: String,
    /// Capacity of this opportunity.
    pub spots: u32,
    /// The NGO that created this opportunity.
    pub org_id: Identity,
    pub org_name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub status: OpportunityStatus,
    /// The roster, in sign-up order.
    #[serde(default)]
    pub signed_up_volunteers: Vec<Identity>,
}

impl Opportunity {
    /// Current number of signed up volunteers.
    #[inline]
    pub fn occupancy(&self) -> usize {
        self.signed_up_volunteers.len()
    }

    #[inline]
    pub fn is_signed_up(&self, identity: Identity) -> bool {
        self.signed_up_volunteers.contains(&identity)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpportunityStatus {
    Open,
    Full,
    Closed,
}
