mod issue;
mod verification;

use std::sync::atomic::{AtomicBool, Ordering};

use axum::{
    async_trait,
    body::Body,
    http::{self, Request, StatusCode},
    Router,
};
use samaj_shared::{
    account::{
        handle::{
            LoginDescriptor, LoginResult, NgoApplication, RegisterDescriptor,
            RestaurantApplication,
        },
        RegisterRole,
    },
    verification::{handle::VerificationTarget, OrgKind},
    Identity,
};
use serde::Serialize;
use tower::util::ServiceExt;

use crate::{
    config::Config,
    store::{Document, MemStore, Query, Store},
    Error, Global,
};

pub(crate) const ADMIN_EMAIL: &str = "admin@samaj.org";
pub(crate) const PASSWORD: &str = "password123";

/// Credentials of a logged in test user.
#[derive(Debug, Clone)]
pub(crate) struct Auth {
    pub id: Identity,
    pub token: String,
}

/// A router along with the state behind it.
pub(crate) struct Harness {
    pub app: Router,
    pub global: Global<MemStore>,
}

impl Harness {
    pub fn new() -> Self {
        let mut config = Config::default();
        config.superadmins = vec![ADMIN_EMAIL.parse().unwrap()];
        config
            .donation
            .prices
            .insert("1000".to_owned(), "price_1000".to_owned());
        let global = Global::new(MemStore::new(), config);
        Self {
            app: crate::router(global.clone()),
            global,
        }
    }

    pub fn store(&self) -> &MemStore {
        &self.global.store
    }

    pub async fn request(
        &self,
        uri: &str,
        auth: Option<&Auth>,
        body: Option<Vec<u8>>,
    ) -> (StatusCode, serde_json::Value) {
        let mut req = Request::builder().uri(uri).method("POST");
        if let Some(auth) = auth {
            req = req
                .header("Token", &auth.token)
                .header("AccountId", auth.id.to_string());
        }
        let req = match body {
            Some(body) => req
                .header(http::header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
                .body(Body::from(body)),
            None => req.body(Body::empty()),
        }
        .unwrap();

        let res = self.app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = hyper::body::to_bytes(res.into_body()).await.unwrap();
        let value = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    pub async fn post<T: Serialize>(
        &self,
        uri: &str,
        auth: Option<&Auth>,
        body: &T,
    ) -> (StatusCode, serde_json::Value) {
        self.request(uri, auth, Some(serde_json::to_vec(body).unwrap()))
            .await
    }

    pub async fn login(&self, email: &str) -> Auth {
        let (status, value) = self
            .post(
                "/api/account/login",
                None,
                &LoginDescriptor {
                    email: email.parse().unwrap(),
                    password: PASSWORD.to_owned(),
                },
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{value}");
        let LoginResult { id, token } = serde_json::from_value(value).unwrap();
        Auth { id, token }
    }

    pub async fn register(&self, desc: RegisterDescriptor) -> Auth {
        let email = desc.email.to_string();
        let (status, value) = self.post("/api/account/register", None, &desc).await;
        assert_eq!(status, StatusCode::OK, "{value}");
        self.login(&email).await
    }

    pub async fn volunteer(&self, email: &str) -> Auth {
        self.register(volunteer_form(email)).await
    }

    pub async fn admin(&self) -> Auth {
        self.volunteer(ADMIN_EMAIL).await
    }

    pub async fn ngo(&self, email: &str, org_name: &str, focus_areas: &[&str]) -> Auth {
        self.register(ngo_form(email, org_name, focus_areas)).await
    }

    pub async fn restaurant(&self, email: &str, rest_name: &str) -> Auth {
        self.register(restaurant_form(email, rest_name)).await
    }

    pub async fn approve(&self, admin: &Auth, kind: OrgKind, id: Identity) {
        let (status, value) = self
            .post(
                "/api/verification/approve",
                Some(admin),
                &VerificationTarget { kind, id },
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{value}");
    }
}

/// A fresh directory under the system temp dir. Callers remove it when done.
pub(crate) fn temp_dir(tag: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("samaj-{tag}-{}", crate::store::new_id()))
}

pub(crate) fn volunteer_form(email: &str) -> RegisterDescriptor {
    RegisterDescriptor {
        name: email.split('@').next().unwrap_or_default().to_owned(),
        email: email.parse().unwrap(),
        password: PASSWORD.to_owned(),
        confirm_password: PASSWORD.to_owned(),
        role: RegisterRole::Volunteer,
        ngo: None,
        restaurant: None,
    }
}

pub(crate) fn ngo_form(email: &str, org_name: &str, focus_areas: &[&str]) -> RegisterDescriptor {
    RegisterDescriptor {
        role: RegisterRole::Ngo,
        ngo: Some(NgoApplication {
            org_name: org_name.to_owned(),
            description: format!("{org_name} helps the community"),
            address: "12 Main Road".to_owned(),
            contact_email: email.to_owned(),
            focus_areas: focus_areas.iter().map(|a| a.to_string()).collect(),
            document_url: Some("http://127.0.0.1:8080/api/resource/1".to_owned()),
            ..Default::default()
        }),
        ..volunteer_form(email)
    }
}

pub(crate) fn restaurant_form(email: &str, rest_name: &str) -> RegisterDescriptor {
    RegisterDescriptor {
        role: RegisterRole::Restaurant,
        restaurant: Some(RestaurantApplication {
            rest_name: rest_name.to_owned(),
            address: "3 Market Street".to_owned(),
            contact_email: email.to_owned(),
            ..Default::default()
        }),
        ..volunteer_form(email)
    }
}

/// A store failing every access to one collection while `failing` is set.
pub(crate) struct FaultyStore {
    pub inner: MemStore,
    pub failing: AtomicBool,
    pub collection: &'static str,
}

impl FaultyStore {
    pub fn failing_on<T: Document>() -> Self {
        Self {
            inner: MemStore::new(),
            failing: AtomicBool::new(false),
            collection: T::COLLECTION,
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst)
    }

    fn check<T: Document>(&self) -> Result<(), Error> {
        if T::COLLECTION == self.collection && self.failing.load(Ordering::SeqCst) {
            Err(Error::Backend(format!("{} is unavailable", T::COLLECTION)))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Store for FaultyStore {
    async fn get<T: Document>(&self, id: u64) -> Result<Option<T>, Error> {
        self.check::<T>()?;
        self.inner.get(id).await
    }

    async fn put<T: Document>(&self, doc: &T) -> Result<(), Error> {
        self.check::<T>()?;
        self.inner.put(doc).await
    }

    async fn insert<T: Document>(&self, doc: &T) -> Result<bool, Error> {
        self.check::<T>()?;
        self.inner.insert(doc).await
    }

    async fn update<T, F, R>(&self, id: u64, f: F) -> Result<Option<R>, Error>
    where
        T: Document,
        F: FnOnce(&mut T) -> Result<R, Error> + Send,
        R: Send,
    {
        self.check::<T>()?;
        self.inner.update(id, f).await
    }

    async fn remove<T: Document>(&self, id: u64) -> Result<bool, Error> {
        self.check::<T>()?;
        self.inner.remove::<T>(id).await
    }

    async fn query<T: Document>(&self, query: Query<T>) -> Result<Vec<T>, Error> {
        self.check::<T>()?;
        self.inner.query(query).await
    }
}
