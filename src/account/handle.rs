use axum::{extract::State, Json};
use samaj_shared::account::{
    handle::{LoginDescriptor, LoginResult, RegisterDescriptor, RegisterResult, ViewProfileResult},
    Profile,
};

use crate::{session::Session, store::Store, Error, Global};

pub async fn register<S: Store>(
    State(Global { store, config, .. }): State<Global<S>>,
    Json(desc): Json<RegisterDescriptor>,
) -> Result<Json<RegisterResult>, Error> {
    let email = desc.email.clone();
    let id = super::register(store.as_ref(), desc).await?;
    if config.superadmins.contains(&email) {
        super::promote_superadmins(store.as_ref(), std::slice::from_ref(&email)).await?;
    }
    Ok(Json(RegisterResult { id }))
}

pub async fn login<S: Store>(
    State(Global { store, config, .. }): State<Global<S>>,
    Json(LoginDescriptor { email, password }): Json<LoginDescriptor>,
) -> Result<Json<LoginResult>, Error> {
    let (id, token) =
        super::sign_in(store.as_ref(), &email, &password, config.token_expire_days).await?;
    Ok(Json(LoginResult { id, token }))
}

pub async fn logout<S: Store>(
    session: Session,
    State(Global { store, .. }): State<Global<S>>,
) -> Result<(), Error> {
    super::sign_out(store.as_ref(), session.identity, &session.token).await
}

pub async fn profile<S: Store>(
    session: Session,
    State(Global { store, .. }): State<Global<S>>,
) -> Result<Json<ViewProfileResult>, Error> {
    Ok(Json(ViewProfileResult {
        id: session.identity,
        profile: store.get::<Profile>(session.identity).await?,
        role: session.role,
    }))
}
