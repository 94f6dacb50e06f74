use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use samaj_shared::{
    food::FoodRequestStatus,
    verification::{OrgKind, VerificationStatus},
    Identity,
};
use serde::Serialize;

pub mod config;
pub mod store;

pub mod account;
pub mod session;

pub mod donation;
pub mod food;
pub mod issue;
pub mod opportunity;
pub mod resource;
pub mod verification;

/// The module for unit testing, will only be availabled in dev env.
#[cfg(test)]
mod tests;

use config::Config;
use store::Store;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("not logged in")]
    NotLoggedIn,
    #[error("non-ascii header value: {0}")]
    HeaderNonAscii(axum::http::header::ToStrError),
    #[error("auth headers are not a valid account id and token")]
    InvalidAuthHeader,
    #[error("permission denied")]
    PermissionDenied,
    #[error("username or password incorrect")]
    UsernameOrPasswordIncorrect,
    #[error("email already registered")]
    EmailRegistered,

    #[error("validation failed: {0}")]
    Validation(String),
    #[error("image error: {0}")]
    Image(image::ImageError),

    #[error("profile {0} not found")]
    ProfileNotFound(Identity),
    #[error("{0} verification record {1} not found")]
    VerificationNotFound(OrgKind, Identity),
    #[error("opportunity {0} not found")]
    OpportunityNotFound(u64),
    #[error("issue {0} not found")]
    IssueNotFound(u64),
    #[error("food request {0} not found")]
    FoodRequestNotFound(u64),
    #[error("resource {0} not found")]
    ResourceNotFound(u64),

    #[error("verification status can't move from {from} to {to}")]
    IllegalTransition {
        from: VerificationStatus,
        to: VerificationStatus,
    },
    #[error("food request already {0:?}")]
    FoodRequestDecided(FoodRequestStatus),
    #[error("already signed up for this opportunity")]
    AlreadySignedUp,
    #[error("all volunteer spots are filled")]
    CapacityExceeded,
    #[error("opportunity is closed")]
    OpportunityClosed,

    /// The verification record was written but the profile role was not.
    /// The record and the profile disagree until reconciled.
    #[error("{kind} {id} is {status} but its role was not updated ({reason}), reconcile it")]
    RoleSyncPending {
        kind: OrgKind,
        id: Identity,
        status: VerificationStatus,
        reason: String,
    },

    #[error("database requires an index for this query: {0}")]
    MissingIndex(String),
    #[error("database errored: {0}")]
    Backend(String),
    #[error("io error: {0}")]
    Io(std::io::Error),
    #[error("json error: {0}")]
    Json(serde_json::Error),
    #[error("toml serialization error: {0}")]
    TomlSer(toml::ser::Error),
    #[error("toml deserialization error: {0}")]
    TomlDe(toml::de::Error),
}

impl Error {
    pub fn to_status_code(&self) -> StatusCode {
        match self {
            Error::NotLoggedIn => StatusCode::UNAUTHORIZED,
            Error::HeaderNonAscii(_)
            | Error::InvalidAuthHeader
            | Error::Validation(_)
            | Error::Image(_) => StatusCode::BAD_REQUEST,
            Error::ProfileNotFound(_)
            | Error::VerificationNotFound(..)
            | Error::OpportunityNotFound(_)
            | Error::IssueNotFound(_)
            | Error::FoodRequestNotFound(_)
            | Error::ResourceNotFound(_) => StatusCode::NOT_FOUND,
            Error::EmailRegistered
            | Error::IllegalTransition { .. }
            | Error::FoodRequestDecided(_)
            | Error::AlreadySignedUp
            | Error::CapacityExceeded
            | Error::OpportunityClosed => StatusCode::CONFLICT,
            Error::RoleSyncPending { .. }
            | Error::MissingIndex(_)
            | Error::Backend(_)
            | Error::Io(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::Json(_) | Error::TomlSer(_) | Error::TomlDe(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::FORBIDDEN,
        }
    }

    /// Shorthand for a [`Error::Validation`].
    #[inline]
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl IntoResponse for Error {
    #[inline]
    fn into_response(self) -> axum::response::Response {
        #[derive(Serialize)]
        struct ErrorInfo {
            error: String,
        }
        (
            self.to_status_code(),
            axum::Json(ErrorInfo {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Implements `From<T>` for [`Error`].
macro_rules! impl_from {
    ($($t:ty => $v:ident),* $(,)?) => {
        $(
            impl From<$t> for $crate::Error {
                #[inline]
                fn from(err: $t) -> Self {
                    Self::$v(err)
                }
            }
        )*
    };
}

impl_from! {
    axum::http::header::ToStrError => HeaderNonAscii,
    image::ImageError => Image,
    std::io::Error => Io,
    serde_json::Error => Json,
    toml::ser::Error => TomlSer,
    toml::de::Error => TomlDe,
}

/// State shared by all handlers.
pub struct Global<S> {
    pub store: Arc<S>,
    pub config: Arc<Config>,
    pub resources: Arc<resource::Resources>,
}

impl<S: Store> Global<S> {
    pub fn new(store: S, config: Config) -> Self {
        Self {
            resources: Arc::new(resource::Resources::new(
                config.data_dir.as_ref().map(|dir| dir.join("resources")),
            )),
            store: Arc::new(store),
            config: Arc::new(config),
        }
    }
}

impl<S> Clone for Global<S> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            config: self.config.clone(),
            resources: self.resources.clone(),
        }
    }
}

/// Construct a router.
pub fn router<S: Store>(global: Global<S>) -> Router {
    let body_limit = global.config.upload.max_bytes + 1024;

    Router::new()
        // account
        .route("/api/account/register", post(account::handle::register::<S>))
        .route("/api/account/login", post(account::handle::login::<S>))
        .route("/api/account/logout", post(account::handle::logout::<S>))
        .route("/api/account/profile", post(account::handle::profile::<S>))
        // verification
        .route(
            "/api/verification/pending",
            post(verification::handle::list_pending::<S>),
        )
        .route(
            "/api/verification/approved",
            post(verification::handle::list_approved::<S>),
        )
        .route(
            "/api/verification/approve",
            post(verification::handle::approve::<S>),
        )
        .route(
            "/api/verification/reject",
            post(verification::handle::reject::<S>),
        )
        .route(
            "/api/verification/revoke",
            post(verification::handle::revoke::<S>),
        )
        .route(
            "/api/verification/reconcile",
            post(verification::handle::reconcile::<S>),
        )
        .route(
            "/api/organizations",
            get(verification::handle::directory::<S>),
        )
        // opportunity
        .route(
            "/api/opportunity/create",
            post(opportunity::handle::create::<S>),
        )
        .route("/api/opportunity/list", post(opportunity::handle::list::<S>))
        .route(
            "/api/opportunity/mine",
            post(opportunity::handle::mine::<S>),
        )
        .route(
            "/api/opportunity/sign-up",
            post(opportunity::handle::sign_up::<S>),
        )
        .route(
            "/api/opportunity/cancel",
            post(opportunity::handle::cancel::<S>),
        )
        .route(
            "/api/opportunity/close",
            post(opportunity::handle::close::<S>),
        )
        // issue
        .route("/api/issue/report", post(issue::handle::report::<S>))
        .route("/api/issue/mine", post(issue::handle::mine::<S>))
        .route("/api/issue/feed", post(issue::handle::feed::<S>))
        .route(
            "/api/issue/mark-resolved",
            post(issue::handle::mark_resolved::<S>),
        )
        // food
        .route("/api/food/create", post(food::handle::create::<S>))
        .route("/api/food/pending", post(food::handle::pending::<S>))
        .route("/api/food/decide", post(food::handle::decide::<S>))
        // donation
        .route(
            "/api/donation/checkout",
            post(donation::handle_checkout::<S>),
        )
        // resource
        .route(
            "/api/resource/upload-document",
            post(resource::handle::upload_document::<S>),
        )
        .route(
            "/api/resource/upload-image",
            post(resource::handle::upload_image::<S>),
        )
        .route("/api/resource/:id", get(resource::handle::get::<S>))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(global)
}
