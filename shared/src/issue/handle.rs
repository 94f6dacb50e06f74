use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ReportIssueDescriptor {
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    /// URL of an image uploaded beforehand.
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ReportIssueResult {
    pub id: u64,
    pub ngos_notified: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct IssueTarget {
    pub issue: u64,
}

/// Issues matching an NGO's focus areas.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct IssueFeed {
    pub focus_areas: Vec<String>,
    pub issues: Vec<super::Issue>,
}
