pub mod account;
pub mod donation;
pub mod food;
pub mod guard;
pub mod issue;
pub mod opportunity;
pub mod resource;
pub mod verification;

/// The only id of an authenticated principal, issued by the identity provider.
pub type Identity = u64;
