//! Verification of NGOs and restaurants by superadmins.
//!
//! Approving and revoking write two documents: the verification record first,
//! then the applicant's profile role. There is no transaction spanning both,
//! so a failure of the second write leaves the record ahead of the profile.
//! That state is reported as [`Error::RoleSyncPending`] and repaired by
//! [`reconcile`].

pub mod handle;

use chrono::Utc;
use samaj_shared::{
    account::{
        handle::{NgoApplication, RestaurantApplication},
        Profile, Role,
    },
    verification::{
        handle::VerificationList, NgoProfile, OrgKind, RestaurantProfile, VerificationStatus,
    },
    Identity,
};

use crate::{
    store::{Document, Query, Store},
    Error,
};

/// A verification record of an organization.
pub trait Application: Document + Clone {
    const KIND: OrgKind;

    /// Name of the organization, which listings are ordered by.
    fn name(&self) -> &str;
    fn status(&self) -> VerificationStatus;
    fn set_status(&mut self, status: VerificationStatus);
}

impl Document for NgoProfile {
    const COLLECTION: &'static str = "ngo_profiles";

    #[inline]
    fn id(&self) -> u64 {
        self.id
    }
}

impl Application for NgoProfile {
    const KIND: OrgKind = OrgKind::Ngo;

    #[inline]
    fn name(&self) -> &str {
        &self.org_name
    }

    #[inline]
    fn status(&self) -> VerificationStatus {
        self.status
    }

    #[inline]
    fn set_status(&mut self, status: VerificationStatus) {
        self.status = status
    }
}

impl Document for RestaurantProfile {
    const COLLECTION: &'static str = "restaurant_profiles";

    #[inline]
    fn id(&self) -> u64 {
        self.id
    }
}

impl Application for RestaurantProfile {
    const KIND: OrgKind = OrgKind::Restaurant;

    #[inline]
    fn name(&self) -> &str {
        &self.rest_name
    }

    #[inline]
    fn status(&self) -> VerificationStatus {
        self.status
    }

    #[inline]
    fn set_status(&mut self, status: VerificationStatus) {
        self.status = status
    }
}

pub async fn submit_ngo<S: Store>(
    store: &S,
    id: Identity,
    app: NgoApplication,
) -> Result<(), Error> {
    store
        .put(&NgoProfile {
            id,
            org_name: app.org_name.trim().to_owned(),
            description: app.description,
            address: app.address,
            contact_email: app.contact_email,
            contact_phone: app.contact_phone,
            website: app.website,
            focus_areas: app
                .focus_areas
                .into_iter()
                .map(|a| a.trim().to_owned())
                .filter(|a| !a.is_empty())
                .collect(),
            registration_number: app.registration_number,
            document_url: app.document_url,
            status: VerificationStatus::Pending,
            submitted_at: Utc::now(),
        })
        .await?;
    tracing::info!("NGO {id} submitted for verification");
    Ok(())
}

pub async fn submit_restaurant<S: Store>(
    store: &S,
    id: Identity,
    app: RestaurantApplication,
) -> Result<(), Error> {
    store
        .put(&RestaurantProfile {
            id,
            rest_name: app.rest_name.trim().to_owned(),
            address: app.address,
            contact_email: app.contact_email,
            contact_phone: app.contact_phone,
            website: app.website,
            license_number: app.license_number,
            document_url: app.document_url,
            status: VerificationStatus::Pending,
            submitted_at: Utc::now(),
        })
        .await?;
    tracing::info!("restaurant {id} submitted for verification");
    Ok(())
}

/// Moves a record to `to`. Nothing is written on an illegal transition.
async fn transition<S: Store, A: Application>(
    store: &S,
    id: Identity,
    to: VerificationStatus,
) -> Result<(), Error> {
    store
        .update(id, |record: &mut A| {
            let from = record.status();
            if from.can_become(to) {
                record.set_status(to);
                Ok(())
            } else {
                Err(Error::IllegalTransition { from, to })
            }
        })
        .await?
        .ok_or(Error::VerificationNotFound(A::KIND, id))?;
    tracing::info!("{} {id} is now {to}", A::KIND);
    Ok(())
}

async fn transition_kind<S: Store>(
    store: &S,
    kind: OrgKind,
    id: Identity,
    to: VerificationStatus,
) -> Result<(), Error> {
    match kind {
        OrgKind::Ngo => transition::<S, NgoProfile>(store, id, to).await,
        OrgKind::Restaurant => transition::<S, RestaurantProfile>(store, id, to).await,
    }
}

/// Current status of a verification record.
pub async fn status_of<S: Store>(
    store: &S,
    kind: OrgKind,
    id: Identity,
) -> Result<VerificationStatus, Error> {
    let status = match kind {
        OrgKind::Ngo => store.get::<NgoProfile>(id).await?.map(|r| r.status),
        OrgKind::Restaurant => store.get::<RestaurantProfile>(id).await?.map(|r| r.status),
    };
    status.ok_or(Error::VerificationNotFound(kind, id))
}

/// Brings the profile role in line with a record status and returns the resulting role.
///
/// Approved records grant the kind's role. Rejected and revoked records take it
/// away, leaving other roles alone. Pending records don't touch the profile.
async fn sync_role<S: Store>(
    store: &S,
    kind: OrgKind,
    id: Identity,
    status: VerificationStatus,
) -> Result<Role, Error> {
    store
        .update(id, |profile: &mut Profile| {
            match status {
                VerificationStatus::Approved => profile.set_role(kind.role()),
                VerificationStatus::Rejected | VerificationStatus::Revoked
                    if profile.role() == kind.role() =>
                {
                    profile.set_role(Role::Unassigned)
                }
                _ => (),
            }
            Ok(profile.role())
        })
        .await?
        .ok_or(Error::ProfileNotFound(id))
}

/// The second phase of a decision. Failures are reported as [`Error::RoleSyncPending`].
async fn finish<S: Store>(
    store: &S,
    kind: OrgKind,
    id: Identity,
    status: VerificationStatus,
) -> Result<Role, Error> {
    sync_role(store, kind, id, status).await.map_err(|err| {
        tracing::error!("{kind} {id} is {status} but its profile role was not updated: {err}");
        Error::RoleSyncPending {
            kind,
            id,
            status,
            reason: err.to_string(),
        }
    })
}

/// Approves a pending organization and promotes its profile.
pub async fn approve<S: Store>(store: &S, kind: OrgKind, id: Identity) -> Result<Role, Error> {
    transition_kind(store, kind, id, VerificationStatus::Approved).await?;
    finish(store, kind, id, VerificationStatus::Approved).await
}

/// Rejects a pending organization. The profile is left untouched.
pub async fn reject<S: Store>(store: &S, kind: OrgKind, id: Identity) -> Result<(), Error> {
    transition_kind(store, kind, id, VerificationStatus::Rejected).await
}

/// Revokes an approved organization and clears its role.
pub async fn revoke<S: Store>(store: &S, kind: OrgKind, id: Identity) -> Result<Role, Error> {
    transition_kind(store, kind, id, VerificationStatus::Revoked).await?;
    finish(store, kind, id, VerificationStatus::Revoked).await
}

/// Re-derives the profile role from the verification record.
/// Running it again changes nothing.
pub async fn reconcile<S: Store>(store: &S, kind: OrgKind, id: Identity) -> Result<Role, Error> {
    let status = status_of(store, kind, id).await?;
    let role = sync_role(store, kind, id, status).await?;
    tracing::info!("reconciled {kind} {id}: {status}, role {role}");
    Ok(role)
}

async fn query_status<S: Store, A: Application>(
    store: &S,
    status: VerificationStatus,
) -> Result<Vec<A>, Error> {
    store
        .query(
            Query::new()
                .filter(move |r: &A| r.status() == status)
                .order_by(|a: &A, b: &A| a.name().cmp(b.name())),
        )
        .await
}

/// Records of a kind in a status, ordered by organization name.
pub async fn list<S: Store>(
    store: &S,
    kind: OrgKind,
    status: VerificationStatus,
) -> Result<VerificationList, Error> {
    Ok(match kind {
        OrgKind::Ngo => VerificationList::Ngo(query_status(store, status).await?),
        OrgKind::Restaurant => VerificationList::Restaurant(query_status(store, status).await?),
    })
}

/// Approved NGOs, ordered by name.
pub async fn directory<S: Store>(store: &S) -> Result<Vec<NgoProfile>, Error> {
    query_status(store, VerificationStatus::Approved).await
}
