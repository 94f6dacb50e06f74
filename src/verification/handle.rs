use axum::{extract::State, Json};
use samaj_shared::{
    guard::Guard,
    verification::{
        handle::{
            ListVerificationsDescriptor, VerificationActionResult, VerificationList,
            VerificationTarget,
        },
        NgoProfile, VerificationStatus,
    },
};

use crate::{session, session::Session, store::Store, Error, Global};

pub async fn list_pending<S: Store>(
    session: Session,
    State(Global { store, .. }): State<Global<S>>,
    Json(ListVerificationsDescriptor { kind }): Json<ListVerificationsDescriptor>,
) -> Result<Json<VerificationList>, Error> {
    session.require(Guard::Superadmin)?;
    super::list(store.as_ref(), kind, VerificationStatus::Pending)
        .await
        .map(Json)
}

pub async fn list_approved<S: Store>(
    session: Session,
    State(Global { store, .. }): State<Global<S>>,
    Json(ListVerificationsDescriptor { kind }): Json<ListVerificationsDescriptor>,
) -> Result<Json<VerificationList>, Error> {
    session.require(Guard::Superadmin)?;
    super::list(store.as_ref(), kind, VerificationStatus::Approved)
        .await
        .map(Json)
}

pub async fn approve<S: Store>(
    session: Session,
    State(Global { store, .. }): State<Global<S>>,
    Json(VerificationTarget { kind, id }): Json<VerificationTarget>,
) -> Result<Json<VerificationActionResult>, Error> {
    session.require(Guard::Superadmin)?;
    let role = super::approve(store.as_ref(), kind, id).await?;
    Ok(Json(VerificationActionResult {
        status: VerificationStatus::Approved,
        role,
    }))
}

pub async fn reject<S: Store>(
    session: Session,
    State(Global { store, .. }): State<Global<S>>,
    Json(VerificationTarget { kind, id }): Json<VerificationTarget>,
) -> Result<Json<VerificationActionResult>, Error> {
    session.require(Guard::Superadmin)?;
    super::reject(store.as_ref(), kind, id).await?;
    Ok(Json(VerificationActionResult {
        status: VerificationStatus::Rejected,
        role: session::resolve(store.as_ref(), Some(id)).await.role,
    }))
}

pub async fn revoke<S: Store>(
    session: Session,
    State(Global { store, .. }): State<Global<S>>,
    Json(VerificationTarget { kind, id }): Json<VerificationTarget>,
) -> Result<Json<VerificationActionResult>, Error> {
    session.require(Guard::Superadmin)?;
    let role = super::revoke(store.as_ref(), kind, id).await?;
    Ok(Json(VerificationActionResult {
        status: VerificationStatus::Revoked,
        role,
    }))
}

pub async fn reconcile<S: Store>(
    session: Session,
    State(Global { store, .. }): State<Global<S>>,
    Json(VerificationTarget { kind, id }): Json<VerificationTarget>,
) -> Result<Json<VerificationActionResult>, Error> {
    session.require(Guard::Superadmin)?;
    let role = super::reconcile(store.as_ref(), kind, id).await?;
    Ok(Json(VerificationActionResult {
        status: super::status_of(store.as_ref(), kind, id).await?,
        role,
    }))
}

/// Public directory of approved NGOs.
pub async fn directory<S: Store>(
    State(Global { store, .. }): State<Global<S>>,
) -> Result<Json<Vec<NgoProfile>>, Error> {
    super::directory(store.as_ref()).await.map(Json)
}
