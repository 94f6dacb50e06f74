//! Resolving who is making a request and what they may see.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use samaj_shared::{
    account::{Profile, Role},
    guard::{Decision, Guard, Redirect, SessionState},
    Identity,
};

use crate::{account, store::Store, Error, Global};

/// Resolves the role of an identity from its profile.
///
/// A signed-out caller resolves to [`SessionState::SIGNED_OUT`].
/// A missing profile or a failed read resolves to [`Role::Unassigned`],
/// the read failure is logged and never surfaced.
pub async fn resolve<S: Store>(store: &S, identity: Option<Identity>) -> SessionState {
    let Some(id) = identity else {
        return SessionState::SIGNED_OUT;
    };
    let role = match store.get::<Profile>(id).await {
        Ok(profile) => profile.map_or(Role::Unassigned, |p| p.role()),
        Err(err) => {
            tracing::warn!("failed to read profile of {id}, treating as unassigned: {err}");
            Role::Unassigned
        }
    };
    SessionState::resolved(id, role)
}

/// The session of an authenticated request, resolved once per request
/// from the `Token` and `AccountId` headers.
#[derive(Debug, Clone)]
pub struct Session {
    /// The access token of this account.
    pub token: String,
    /// The only id of this account.
    pub identity: Identity,
    pub role: Role,
}

impl Session {
    pub fn state(&self) -> SessionState {
        SessionState::resolved(self.identity, self.role)
    }

    /// Checks this session against a guard.
    ///
    /// # Errors
    ///
    /// - [`Error::NotLoggedIn`] where the guard redirects to the login page.
    /// - [`Error::PermissionDenied`] where the guard redirects home.
    pub fn require(&self, guard: Guard) -> Result<(), Error> {
        match guard.check(&self.state()) {
            Decision::Render => Ok(()),
            Decision::Redirect(Redirect::Login) | Decision::Placeholder => Err(Error::NotLoggedIn),
            Decision::Redirect(Redirect::Home) => Err(Error::PermissionDenied),
        }
    }
}

#[async_trait]
impl<S: Store> FromRequestParts<Global<S>> for Session {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Global<S>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get("Token")
            .ok_or(Error::NotLoggedIn)?
            .to_str()?
            .to_owned();
        let identity: Identity = parts
            .headers
            .get("AccountId")
            .ok_or(Error::NotLoggedIn)?
            .to_str()?
            .parse()
            .map_err(|_| Error::InvalidAuthHeader)?;

        if !account::validate(state.store.as_ref(), identity, &token).await? {
            return Err(Error::NotLoggedIn);
        }

        let SessionState { role, .. } = resolve(state.store.as_ref(), Some(identity)).await;
        Ok(Self {
            token,
            identity,
            role,
        })
    }
}
