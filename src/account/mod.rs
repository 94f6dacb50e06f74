//! The identity provider and user profiles.

pub mod handle;

use chrono::{DateTime, Utc};
use samaj_shared::{
    account::{handle::RegisterDescriptor, Profile, RegisterRole, Role},
    Identity,
};
use serde::{Deserialize, Serialize};
use sha256::digest;

use crate::{
    store::{Document, Store},
    verification, Error,
};

/// Minimum length of a password.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Derives the identity of an account from its email address.
///
/// The id is the leading 52 bits of the SHA-256 digest of the lowercased address,
/// so an email maps to the same identity across restarts.
pub fn identity_of(email: &lettre::Address) -> Identity {
    digest(email.to_string().to_lowercase())
        .chars()
        .take(13)
        .fold(0, |acc, c| acc << 4 | c.to_digit(16).unwrap_or_default() as u64)
}

/// Credentials of a user, owned by the identity provider.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Account {
    pub id: Identity,
    pub email: lettre::Address,
    /// Hash of this user's password.
    password_sha: String,
    tokens: Tokens,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(email: lettre::Address, password: &str) -> Self {
        Self {
            id: identity_of(&email),
            email,
            password_sha: digest(password.to_owned()),
            tokens: Tokens::default(),
            created_at: Utc::now(),
        }
    }

    #[inline]
    pub fn password_matches(&self, password: &str) -> bool {
        digest(password.to_owned()) == self.password_sha
    }

    /// Login into the account and return back a token.
    ///
    /// # Errors
    ///
    /// - Errors if the password is incorrect.
    pub fn login(&mut self, password: &str, expire_days: u16) -> Result<String, Error> {
        if self.password_matches(password) {
            Ok(self.tokens.new_token(self.id, expire_days))
        } else {
            Err(Error::UsernameOrPasswordIncorrect)
        }
    }

    /// Logout this account with the target token.
    pub fn logout(&mut self, token: &str) -> Result<(), Error> {
        if self.tokens.remove(token) {
            Ok(())
        } else {
            Err(Error::NotLoggedIn)
        }
    }

    #[inline]
    pub fn token_usable(&self, token: &str) -> bool {
        self.tokens.token_usable(token)
    }
}

impl Document for Account {
    const COLLECTION: &'static str = "accounts";

    #[inline]
    fn id(&self) -> u64 {
        self.id
    }
}

impl Document for Profile {
    const COLLECTION: &'static str = "users";

    #[inline]
    fn id(&self) -> u64 {
        self.id
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct Token {
    value: String,
    /// `None` means never expires.
    #[serde(default)]
    expire_at: Option<DateTime<Utc>>,
}

impl Token {
    #[inline]
    fn is_expired(&self) -> bool {
        self.expire_at.map_or(false, |t| t <= Utc::now())
    }
}

/// A simple token manager.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Tokens {
    inner: Vec<Token>,
}

impl Tokens {
    /// Maximum number of live tokens of an account. The oldest one is dropped first.
    const MAX: usize = 16;

    /// Create a new token expiring after the given days, `0` for never.
    #[must_use]
    pub fn new_token(&mut self, id: Identity, expire_days: u16) -> String {
        self.refresh();
        if self.inner.len() >= Self::MAX {
            self.inner.remove(0);
        }

        let expire_at =
            (expire_days != 0).then(|| Utc::now() + chrono::Duration::days(expire_days.into()));
        let value = digest(format!("{id}-{:x}-{}", rand::random::<u64>(), Utc::now()));
        self.inner.push(Token {
            value: value.clone(),
            expire_at,
        });
        value
    }

    /// Remove a target token and return whether the token was removed.
    pub fn remove(&mut self, token: &str) -> bool {
        let len = self.inner.len();
        self.inner.retain(|e| e.value != token);
        len > self.inner.len()
    }

    /// Check if a token is usable.
    pub fn token_usable(&self, token: &str) -> bool {
        self.inner.iter().any(|e| e.value == token && !e.is_expired())
    }

    /// Remove expired tokens.
    pub fn refresh(&mut self) {
        self.inner.retain(|e| !e.is_expired());
    }
}

/// Creates an identity for a new email address.
///
/// # Errors
///
/// - Errors if the email is already registered.
pub async fn sign_up<S: Store>(
    store: &S,
    email: &lettre::Address,
    password: &str,
) -> Result<Identity, Error> {
    let account = Account::new(email.clone(), password);
    if store.insert(&account).await? {
        tracing::info!("account {} signed up as {email}", account.id);
        Ok(account.id)
    } else {
        Err(Error::EmailRegistered)
    }
}

/// Signs in and returns the identity along with a new token.
pub async fn sign_in<S: Store>(
    store: &S,
    email: &lettre::Address,
    password: &str,
    expire_days: u16,
) -> Result<(Identity, String), Error> {
    let id = identity_of(email);
    let token = store
        .update(id, |account: &mut Account| account.login(password, expire_days))
        .await?
        .ok_or(Error::UsernameOrPasswordIncorrect)?;
    Ok((id, token))
}

pub async fn sign_out<S: Store>(store: &S, id: Identity, token: &str) -> Result<(), Error> {
    store
        .update(id, |account: &mut Account| account.logout(token))
        .await?
        .ok_or(Error::NotLoggedIn)
}

/// Whether the token is a live token of the identity.
pub async fn validate<S: Store>(store: &S, id: Identity, token: &str) -> Result<bool, Error> {
    Ok(store
        .get::<Account>(id)
        .await?
        .map_or(false, |account| account.token_usable(token)))
}

/// Validates a registration form without touching the store.
pub fn check_registration(desc: &RegisterDescriptor) -> Result<(), Error> {
    fn required(value: &str, field: &str) -> Result<(), Error> {
        if value.trim().is_empty() {
            Err(Error::invalid(format!("{field} is required")))
        } else {
            Ok(())
        }
    }

    fn contact(value: &str) -> Result<(), Error> {
        value
            .parse::<lettre::Address>()
            .map(drop)
            .map_err(|err| Error::invalid(format!("contact email: {err}")))
    }

    required(&desc.name, "name")?;
    if desc.password != desc.confirm_password {
        return Err(Error::invalid("passwords do not match"));
    }
    if desc.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(Error::invalid(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    match desc.role {
        RegisterRole::Volunteer => Ok(()),
        RegisterRole::Ngo => {
            let ngo = desc
                .ngo
                .as_ref()
                .ok_or_else(|| Error::invalid("NGO details are required"))?;
            required(&ngo.org_name, "organization name")?;
            required(&ngo.description, "description")?;
            required(&ngo.address, "address")?;
            contact(&ngo.contact_email)?;
            if ngo.focus_areas.iter().all(|a| a.trim().is_empty()) {
                return Err(Error::invalid("at least one focus area is required"));
            }
            required(
                ngo.document_url.as_deref().unwrap_or_default(),
                "registration document",
            )
        }
        RegisterRole::Restaurant => {
            let rest = desc
                .restaurant
                .as_ref()
                .ok_or_else(|| Error::invalid("restaurant details are required"))?;
            required(&rest.rest_name, "restaurant name")?;
            required(&rest.address, "address")?;
            contact(&rest.contact_email)
        }
    }
}

/// Registers a user: creates the identity, the profile and, for organizations,
/// a pending verification record.
///
/// Organizations start without a role. They are promoted on approval.
/// The identity is removed again if the profile can't be written.
pub async fn register<S: Store>(store: &S, desc: RegisterDescriptor) -> Result<Identity, Error> {
    check_registration(&desc)?;

    let id = sign_up(store, &desc.email, &desc.password).await?;
    if let Err(err) = provision(store, id, desc).await {
        tracing::error!("failed to provision account {id}, rolling back: {err}");
        store.remove::<Account>(id).await?;
        if let Err(e) = store.remove::<Profile>(id).await {
            tracing::warn!("failed to remove profile of {id}: {e}");
        }
        return Err(err);
    }
    Ok(id)
}

async fn provision<S: Store>(
    store: &S,
    id: Identity,
    desc: RegisterDescriptor,
) -> Result<(), Error> {
    let mut profile = Profile {
        id,
        name: desc.name.trim().to_owned(),
        email: desc.email,
        role: None,
        created_at: Utc::now(),
    };
    if desc.role == RegisterRole::Volunteer {
        profile.set_role(Role::Volunteer);
    }
    store.put(&profile).await?;

    match (desc.role, desc.ngo, desc.restaurant) {
        (RegisterRole::Ngo, Some(app), _) => verification::submit_ngo(store, id, app).await,
        (RegisterRole::Restaurant, _, Some(app)) => {
            verification::submit_restaurant(store, id, app).await
        }
        _ => Ok(()),
    }
}

/// Promotes the accounts of the given emails to superadmin.
/// Emails without an account are skipped.
pub async fn promote_superadmins<S: Store>(
    store: &S,
    emails: &[lettre::Address],
) -> Result<(), Error> {
    for email in emails {
        let id = identity_of(email);
        if store.get::<Account>(id).await?.is_none() {
            tracing::info!("superadmin {email} has no account yet, promoting on registration");
            continue;
        }
        let promoted = store
            .update(id, |profile: &mut Profile| {
                profile.set_role(Role::Superadmin);
                Ok(())
            })
            .await?;
        if promoted.is_none() {
            store
                .put(&Profile {
                    id,
                    name: email.user().to_owned(),
                    email: email.clone(),
                    role: Role::Superadmin.as_tag().map(str::to_owned),
                    created_at: Utc::now(),
                })
                .await?;
        }
        tracing::info!("promoted {email} to superadmin");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_ignores_case() {
        let a: lettre::Address = "Someone@Example.org".parse().unwrap();
        let b: lettre::Address = "someone@example.org".parse().unwrap();
        assert_eq!(identity_of(&a), identity_of(&b));
        assert!(identity_of(&a) <= crate::store::MAX_ID);
    }

    #[test]
    fn tokens_are_bounded() {
        let mut tokens = Tokens::default();
        let first = tokens.new_token(1, 0);
        for _ in 1..Tokens::MAX {
            let _ = tokens.new_token(1, 0);
        }
        assert!(tokens.token_usable(&first));
        let _ = tokens.new_token(1, 0);
        assert!(!tokens.token_usable(&first));
        assert_eq!(tokens.inner.len(), Tokens::MAX);
    }

    #[test]
    fn expired_tokens_are_unusable() {
        let mut tokens = Tokens::default();
        tokens.inner.push(Token {
            value: "old".to_owned(),
            expire_at: Some(Utc::now() - chrono::Duration::days(1)),
        });
        assert!(!tokens.token_usable("old"));
        tokens.refresh();
        assert!(tokens.inner.is_empty());
    }

    #[test]
    fn login_checks_password() {
        let mut account = Account::new("a@b.org".parse().unwrap(), "password123");
        assert!(matches!(
            account.login("wrong", 0),
            Err(Error::UsernameOrPasswordIncorrect)
        ));
        let token = account.login("password123", 7).unwrap();
        assert!(account.token_usable(&token));
        account.logout(&token).unwrap();
        assert!(!account.token_usable(&token));
        assert!(account.logout(&token).is_err());
    }
}
