use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct ListVerificationsDescriptor {
    pub kind: super::OrgKind,
}

/// Records returned by a listing, tagged by organization kind.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "kind", content = "records", rename_all = "lowercase")]
pub enum VerificationList {
    Ngo(Vec<super::NgoProfile>),
    Restaurant(Vec<super::RestaurantProfile>),
}

impl VerificationList {
    pub fn len(&self) -> usize {
        match self {
            VerificationList::Ngo(v) => v.len(),
            VerificationList::Restaurant(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Targets a verification record for an admin action.
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct VerificationTarget {
    pub kind: super::OrgKind,
    pub id: crate::Identity,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct VerificationActionResult {
    pub status: super::VerificationStatus,
    /// The role the applicant's profile holds after the action.
    pub role: crate::account::Role,
}
