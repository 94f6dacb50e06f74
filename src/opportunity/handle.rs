use axum::{extract::State, Json};
use samaj_shared::{
    guard::Guard,
    opportunity::{
        handle::{
            CreateOpportunityDescriptor, CreateOpportunityResult, OpportunityTarget,
            OwnedOpportunity,
        },
        Opportunity, OpportunityStatus,
    },
};

use crate::{session::Session, store::Store, Error, Global};

pub async fn create<S: Store>(
    session: Session,
    State(Global { store, .. }): State<Global<S>>,
    Json(desc): Json<CreateOpportunityDescriptor>,
) -> Result<Json<CreateOpportunityResult>, Error> {
    session.require(Guard::Ngo)?;
    let id = super::create(store.as_ref(), session.identity, desc).await?;
    Ok(Json(CreateOpportunityResult { id }))
}

/// Open opportunities. Public.
pub async fn list<S: Store>(
    State(Global { store, .. }): State<Global<S>>,
) -> Result<Json<Vec<Opportunity>>, Error> {
    super::list_open(store.as_ref()).await.map(Json)
}

pub async fn mine<S: Store>(
    session: Session,
    State(Global { store, .. }): State<Global<S>>,
) -> Result<Json<Vec<OwnedOpportunity>>, Error> {
    session.require(Guard::Ngo)?;
    super::list_owned(store.as_ref(), session.identity)
        .await
        .map(Json)
}

pub async fn sign_up<S: Store>(
    session: Session,
    State(Global { store, .. }): State<Global<S>>,
    Json(OpportunityTarget { opportunity }): Json<OpportunityTarget>,
) -> Result<Json<OpportunityStatus>, Error> {
    session.require(Guard::Authenticated)?;
    super::sign_up(store.as_ref(), opportunity, session.identity)
        .await
        .map(Json)
}

pub async fn cancel<S: Store>(
    session: Session,
    State(Global { store, .. }): State<Global<S>>,
    Json(OpportunityTarget { opportunity }): Json<OpportunityTarget>,
) -> Result<(), Error> {
    session.require(Guard::Authenticated)?;
    super::cancel_sign_up(store.as_ref(), opportunity, session.identity).await
}

pub async fn close<S: Store>(
    session: Session,
    State(Global { store, .. }): State<Global<S>>,
    Json(OpportunityTarget { opportunity }): Json<OpportunityTarget>,
) -> Result<(), Error> {
    session.require(Guard::Ngo)?;
    super::close(store.as_ref(), opportunity, session.identity).await
}
