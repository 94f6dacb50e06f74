//! Role-based route guarding.
//!
//! Guards are pure functions of a [`SessionState`]. They nest: the outermost
//! guard is checked first and the first one that does not render decides,
//! so an unauthenticated visitor of an NGO route is sent to the login page
//! before the role is ever looked at.

use serde::{Deserialize, Serialize};

use crate::{account::Role, Identity};

/// What the application currently knows about its user.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct SessionState {
    pub identity: Option<Identity>,
    pub role: Role,
    /// `true` until the first role resolution completes.
    pub loading: bool,
}

impl SessionState {
    /// The state before anything has been resolved.
    pub const LOADING: Self = Self {
        identity: None,
        role: Role::Unassigned,
        loading: true,
    };

    /// A resolved state without a logged in user.
    pub const SIGNED_OUT: Self = Self {
        identity: None,
        role: Role::Unassigned,
        loading: false,
    };

    #[inline]
    pub fn resolved(identity: Identity, role: Role) -> Self {
        Self {
            identity: Some(identity),
            role,
            loading: false,
        }
    }
}

impl Default for SessionState {
    #[inline]
    fn default() -> Self {
        Self::LOADING
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Guard {
    /// Requires a logged in user of any role.
    Authenticated,
    Ngo,
    Restaurant,
    Superadmin,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Redirect {
    Login,
    Home,
}

impl Redirect {
    pub fn path(self) -> &'static str {
        match self {
            Redirect::Login => "/login",
            Redirect::Home => "/",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Decision {
    /// Show a loading placeholder.
    Placeholder,
    Redirect(Redirect),
    /// Render the guarded page.
    Render,
}

impl Guard {
    /// The role this guard requires, if it is a role guard.
    pub fn required_role(self) -> Option<Role> {
        match self {
            Guard::Authenticated => None,
            Guard::Ngo => Some(Role::Ngo),
            Guard::Restaurant => Some(Role::Restaurant),
            Guard::Superadmin => Some(Role::Superadmin),
        }
    }

    pub fn check(self, state: &SessionState) -> Decision {
        if state.loading {
            return Decision::Placeholder;
        }
        match self.required_role() {
            None if state.identity.is_none() => Decision::Redirect(Redirect::Login),
            None => Decision::Render,
            Some(role) if state.role != role => Decision::Redirect(Redirect::Home),
            Some(_) => Decision::Render,
        }
    }
}

/// Checks nested guards, outermost first.
pub fn check_nested(guards: &[Guard], state: &SessionState) -> Decision {
    guards
        .iter()
        .map(|g| g.check(state))
        .find(|d| *d != Decision::Render)
        .unwrap_or(Decision::Render)
}

/// Guarded routes of the application, with their guards from outermost to innermost.
/// Routes not listed here are public.
pub const ROUTES: &[(&str, &[Guard])] = &[
    ("/report", &[Guard::Authenticated]),
    ("/volunteer", &[Guard::Authenticated]),
    ("/donate", &[Guard::Authenticated]),
    ("/dashboard", &[Guard::Authenticated]),
    ("/ngo/food-request", &[Guard::Authenticated, Guard::Ngo]),
    (
        "/restaurant/dashboard",
        &[Guard::Authenticated, Guard::Restaurant],
    ),
    (
        "/superadmin/verify-ngos",
        &[Guard::Authenticated, Guard::Superadmin],
    ),
];

/// Guards protecting the given path.
pub fn guards_for(path: &str) -> &'static [Guard] {
    ROUTES
        .iter()
        .find(|(p, _)| *p == path)
        .map(|(_, g)| *g)
        .unwrap_or(&[])
}
