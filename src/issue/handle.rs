use axum::{extract::State, Json};
use samaj_shared::{
    guard::Guard,
    issue::{
        handle::{IssueFeed, IssueTarget, ReportIssueDescriptor, ReportIssueResult},
        Issue,
    },
};

use crate::{session::Session, store::Store, Error, Global};

pub async fn report<S: Store>(
    session: Session,
    State(Global { store, .. }): State<Global<S>>,
    Json(desc): Json<ReportIssueDescriptor>,
) -> Result<Json<ReportIssueResult>, Error> {
    session.require(Guard::Authenticated)?;
    let issue = super::report(store.as_ref(), session.identity, desc).await?;
    Ok(Json(ReportIssueResult {
        id: issue.id,
        ngos_notified: issue.ngos_to_notify.len(),
    }))
}

pub async fn mine<S: Store>(
    session: Session,
    State(Global { store, .. }): State<Global<S>>,
) -> Result<Json<Vec<Issue>>, Error> {
    session.require(Guard::Authenticated)?;
    super::list_reported(store.as_ref(), session.identity)
        .await
        .map(Json)
}

pub async fn feed<S: Store>(
    session: Session,
    State(Global { store, .. }): State<Global<S>>,
) -> Result<Json<IssueFeed>, Error> {
    session.require(Guard::Ngo)?;
    super::feed(store.as_ref(), session.identity).await.map(Json)
}

pub async fn mark_resolved<S: Store>(
    session: Session,
    State(Global { store, .. }): State<Global<S>>,
    Json(IssueTarget { issue }): Json<IssueTarget>,
) -> Result<(), Error> {
    session.require(Guard::Ngo)?;
    super::mark_resolved(store.as_ref(), issue).await
}
