use std::{collections::BTreeMap, net::SocketAddr, path::Path, path::PathBuf};

use serde::Deserialize;

/// Describing the server configuration.
///
/// Every section falls back to its default, so an empty file is a valid config.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
    /// Address the server listens on.
    pub addr: SocketAddr,
    /// Public origin of this server, used to build resource and redirect URLs.
    pub public_url: String,
    /// Directory documents and resources are persisted into.
    /// Everything stays in memory if not set.
    pub data_dir: Option<PathBuf>,
    /// Expiration of login tokens in days. `0` means never expire.
    pub token_expire_days: u16,
    /// Emails of accounts promoted to superadmin on start-up.
    pub superadmins: Vec<lettre::Address>,
    pub upload: Upload,
    pub donation: Donation,
}

impl Config {
    /// Reads the config at `path`, or the default config if there is no such file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, crate::Error> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(s) => Ok(toml::from_str(&s)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("config {} not found, using default", path.display());
                Ok(Self::default())
            }
            Err(err) => Err(err.into()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            public_url: "http://127.0.0.1:8080".to_owned(),
            data_dir: None,
            token_expire_days: 0,
            superadmins: Vec::new(),
            upload: Upload::default(),
            donation: Donation::default(),
        }
    }
}

/// Describing upload limits.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Upload {
    pub max_bytes: usize,
}

impl Default for Upload {
    fn default() -> Self {
        Self {
            max_bytes: 32 * 1024 * 1024,
        }
    }
}

/// Describing the hosted checkout.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Donation {
    /// Predefined donation amounts, as decimal strings, mapped to price
    /// identifiers of the payment processor.
    pub prices: BTreeMap<String, String>,
    /// Path on [`Config::public_url`] returned to after a successful checkout.
    pub success_path: Option<String>,
    /// Path on [`Config::public_url`] returned to after a cancelled checkout.
    pub cancel_path: Option<String>,
}
