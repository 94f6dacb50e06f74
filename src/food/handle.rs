use axum::{extract::State, Json};
use samaj_shared::{
    food::{
        handle::{CreateFoodRequestDescriptor, CreateFoodRequestResult, DecideFoodRequestDescriptor},
        FoodRequest,
    },
    guard::Guard,
};

use crate::{session::Session, store::Store, Error, Global};

pub async fn create<S: Store>(
    session: Session,
    State(Global { store, .. }): State<Global<S>>,
    Json(desc): Json<CreateFoodRequestDescriptor>,
) -> Result<Json<CreateFoodRequestResult>, Error> {
    session.require(Guard::Ngo)?;
    let id = super::create_request(store.as_ref(), session.identity, desc).await?;
    Ok(Json(CreateFoodRequestResult { id }))
}

pub async fn pending<S: Store>(
    session: Session,
    State(Global { store, .. }): State<Global<S>>,
) -> Result<Json<Vec<FoodRequest>>, Error> {
    session.require(Guard::Restaurant)?;
    super::list_pending(store.as_ref()).await.map(Json)
}

pub async fn decide<S: Store>(
    session: Session,
    State(Global { store, .. }): State<Global<S>>,
    Json(DecideFoodRequestDescriptor { request, decision }): Json<DecideFoodRequestDescriptor>,
) -> Result<Json<FoodRequest>, Error> {
    session.require(Guard::Restaurant)?;
    super::decide(store.as_ref(), request, session.identity, decision)
        .await
        .map(Json)
}
