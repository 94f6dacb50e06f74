pub mod handle;

use serde::{Deserialize, Serialize};

use crate::Identity;

/// A local issue reported by a user.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Issue {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub reporter_id: Identity,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub status: IssueStatus,
    /// Approved NGOs whose focus areas matched the category when reported.
    #[serde(default)]
    pub ngos_to_notify: Vec<Identity>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueStatus {
    Pending,
    InProgress,
    Resolved,
}

impl IssueStatus {
    /// Whether an issue in this status still needs attention.
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(self, IssueStatus::Pending | IssueStatus::InProgress)
    }
}
