use serde::{Deserialize, Serialize};

/// An uploaded resource, addressable by its URL.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UploadResult {
    pub id: u64,
    pub url: String,
}
