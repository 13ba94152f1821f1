//! The anonymous identity token sent with every API request.

use std::fmt;

use tracing::info;
use uuid::Uuid;

use crate::storage::{Storage, StorageError};

pub const STORAGE_KEY: &str = "supportgrove_anonymous_id";
const PREFIX: &str = "anon_";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnonymousId(String);

impl AnonymousId {
    pub fn generate() -> Self {
        Self(format!("{PREFIX}{}", Uuid::new_v4().simple()))
    }

    /// Wraps a previously persisted token. Blank values are treated as absent.
    pub fn from_stored(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        (!raw.is_empty()).then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnonymousId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns the persisted token, creating and storing one on first use.
pub async fn load_or_create(storage: &Storage) -> Result<AnonymousId, StorageError> {
    if let Some(stored) = storage.get_value(STORAGE_KEY).await?
        && let Some(id) = AnonymousId::from_stored(&stored.value)
    {
        return Ok(id);
    }
    let id = AnonymousId::generate();
    let saved = storage.set_value(STORAGE_KEY, id.as_str()).await?;
    info!(id = %id, key = %saved.key, at = saved.updated_at, "created anonymous identity");
    Ok(id)
}
