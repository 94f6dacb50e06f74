pub mod raw;
pub mod session;

pub use samaj_shared::{account::Role, guard::SessionState, Identity};

use samaj_shared::account::handle::LoginDescriptor;

/// Credentials of the logged in user.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub id: Identity,
    pub token: String,
}

impl Credentials {
    /// Auth headers carrying these credentials.
    pub fn headers(&self) -> anyhow::Result<reqwest::header::HeaderMap> {
        let mut map = reqwest::header::HeaderMap::new();
        map.insert("Token", self.token.parse()?);
        map.insert("AccountId", self.id.into());
        Ok(map)
    }
}

/// The context requests are sent within.
pub struct Context {
    req_client: reqwest::Client,
    url_prefix: String,
    credentials: parking_lot::RwLock<Option<Credentials>>,
}

impl Context {
    pub fn new(url_prefix: impl Into<String>) -> Self {
        Self {
            req_client: reqwest::Client::new(),
            url_prefix: url_prefix.into().trim_end_matches('/').to_owned(),
            credentials: parking_lot::RwLock::new(None),
        }
    }

    pub fn credentials(&self) -> Option<Credentials> {
        self.credentials.read().clone()
    }

    /// Logs in and keeps the credentials for later requests.
    pub async fn login(&self, email: &str, password: &str) -> anyhow::Result<Identity> {
        let res = raw::call(
            raw::account::Login(LoginDescriptor {
                email: email.parse()?,
                password: password.to_owned(),
            }),
            self,
        )
        .await?;
        *self.credentials.write() = Some(Credentials {
            id: res.id,
            token: res.token,
        });
        Ok(res.id)
    }

    /// Logs out and drops the credentials.
    pub async fn logout(&self) -> anyhow::Result<()> {
        let res = raw::call(raw::account::Logout, self).await;
        *self.credentials.write() = None;
        res
    }
}
