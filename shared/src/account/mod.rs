pub mod handle;

use serde::{Deserialize, Serialize};

use crate::Identity;

/// Represents the role an account plays in the application.
///
/// Profiles store the role as a raw tag, which may be absent or hold a value
/// this application does not recognize. Both cases map to [`Self::Unassigned`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Reports issues, signs up for opportunities and donates.
    Volunteer,
    /// A verified non-governmental organization.
    Ngo,
    /// Operates the verification panel.
    Superadmin,
    /// A verified restaurant donating food.
    Restaurant,
    /// No recognized role, including profiles not provisioned yet.
    Unassigned,
}

impl Role {
    /// Roles that may be stored in a profile.
    pub const ASSIGNABLE: [Role; 4] = [
        Self::Volunteer,
        Self::Ngo,
        Self::Superadmin,
        Self::Restaurant,
    ];

    /// Derives a role from a stored tag by checking membership in the fixed role set.
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("volunteer") => Self::Volunteer,
            Some("ngo") => Self::Ngo,
            Some("superadmin") => Self::Superadmin,
            Some("restaurant") => Self::Restaurant,
            _ => Self::Unassigned,
        }
    }

    /// The tag stored in a profile for this role.
    pub fn as_tag(self) -> Option<&'static str> {
        match self {
            Self::Volunteer => Some("volunteer"),
            Self::Ngo => Some("ngo"),
            Self::Superadmin => Some("superadmin"),
            Self::Restaurant => Some("restaurant"),
            Self::Unassigned => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_tag().unwrap_or("unassigned"))
    }
}

/// The application-level record of a user, keyed by identity.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Profile {
    pub id: Identity,
    pub name: String,
    pub email: lettre::Address,
    /// The raw role tag. See [`Role::from_tag`].
    #[serde(default)]
    pub role: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Profile {
    #[inline]
    pub fn role(&self) -> Role {
        Role::from_tag(self.role.as_deref())
    }

    #[inline]
    pub fn set_role(&mut self, role: Role) {
        self.role = role.as_tag().map(str::to_owned);
    }
}

/// Roles a user may choose when registering.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegisterRole {
    Volunteer,
    Ngo,
    Restaurant,
}
