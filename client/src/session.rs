//! Client side role resolution.
//!
//! A [`RoleResolver`] turns identity changes reported by the identity provider
//! into a [`SessionState`] that views subscribe to and guard against.

use std::sync::atomic::{AtomicU64, Ordering};

use samaj_shared::{
    account::{Profile, Role},
    guard::SessionState,
    Identity,
};
use tokio::sync::watch;

/// Where profiles are read from.
#[async_trait::async_trait]
pub trait ProfileSource: Send + Sync {
    async fn fetch_profile(&self, identity: Identity) -> anyhow::Result<Option<Profile>>;
}

#[async_trait::async_trait]
impl ProfileSource for crate::Context {
    async fn fetch_profile(&self, identity: Identity) -> anyhow::Result<Option<Profile>> {
        let res = crate::raw::call(crate::raw::account::ViewProfile, self).await?;
        if res.id != identity {
            anyhow::bail!("session belongs to {}, not {identity}", res.id);
        }
        Ok(res.profile)
    }
}

pub struct RoleResolver<P> {
    source: P,
    state: watch::Sender<SessionState>,
    /// Bumped on every identity change, so a slow resolution can't overwrite a newer one.
    generation: AtomicU64,
}

impl<P: ProfileSource> RoleResolver<P> {
    /// Creates a resolver in the loading state.
    pub fn new(source: P) -> Self {
        Self {
            source,
            state: watch::channel(SessionState::LOADING).0,
            generation: AtomicU64::new(0),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    /// Resolves the session after the identity changed.
    ///
    /// A profile that can't be fetched resolves to [`Role::Unassigned`]
    /// while the user stays logged in. There is no retry.
    pub async fn identity_changed(&self, identity: Option<Identity>) -> SessionState {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let state = match identity {
            None => SessionState::SIGNED_OUT,
            Some(id) => {
                let role = match self.source.fetch_profile(id).await {
                    Ok(profile) => profile.map_or(Role::Unassigned, |p| p.role()),
                    Err(_) => Role::Unassigned,
                };
                SessionState::resolved(id, role)
            }
        };
        if self.generation.load(Ordering::SeqCst) == generation {
            self.state.send_replace(state);
        }
        state
    }
}
