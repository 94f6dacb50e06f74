pub mod handle;

use serde::{Deserialize, Serialize};

use crate::{account::Role, Identity};

/// Describes the verification status of an organization.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    /// Waiting for a superadmin to decide.
    Pending,
    Approved,
    /// Terminal.
    Rejected,
    /// Terminal.
    Revoked,
}

impl VerificationStatus {
    /// Whether a record in this status may move to `next`.
    ///
    /// `pending` moves to `approved` or `rejected`, `approved` moves to `revoked`.
    /// Nothing leaves `rejected` or `revoked`.
    pub fn can_become(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Approved)
                | (Self::Pending, Self::Rejected)
                | (Self::Approved, Self::Revoked)
        )
    }
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Revoked => "revoked",
        })
    }
}

/// Kinds of organizations going through verification.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrgKind {
    Ngo,
    Restaurant,
}

impl OrgKind {
    /// The role an approved organization of this kind is promoted to.
    pub fn role(self) -> Role {
        match self {
            OrgKind::Ngo => Role::Ngo,
            OrgKind::Restaurant => Role::Restaurant,
        }
    }
}

impl std::fmt::Display for OrgKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            OrgKind::Ngo => "NGO",
            OrgKind::Restaurant => "restaurant",
        })
    }
}

/// Verification record of an NGO, keyed by the applicant's identity.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NgoProfile {
    pub id: Identity,
    pub org_name: String,
    pub description: String,
    pub address: String,
    pub contact_email: String,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    /// Issue categories this NGO works on.
    #[serde(default)]
    pub focus_areas: Vec<String>,
    #[serde(default)]
    pub registration_number: Option<String>,
    #[serde(default)]
    pub document_url: Option<String>,
    pub status: VerificationStatus,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}

/// Verification record of a restaurant, keyed by the applicant's identity.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RestaurantProfile {
    pub id: Identity,
    pub rest_name: String,
    pub address: String,
    pub contact_email: String,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub license_number: Option<String>,
    #[serde(default)]
    pub document_url: Option<String>,
    pub status: VerificationStatus,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}
