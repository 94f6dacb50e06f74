use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateOpportunityDescriptor {
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub date: chrono::NaiveDate,
    pub time: String,
    pub spots: u32,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CreateOpportunityResult {
    pub id: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct OpportunityTarget {
    pub opportunity: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct VolunteerInfo {
    pub id: crate::Identity,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// An opportunity of the requesting NGO along with its roster details.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct OwnedOpportunity {
    pub opportunity: super::Opportunity,
    pub volunteers: Vec<VolunteerInfo>,
}
