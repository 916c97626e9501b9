//! Key-value persistence for chase snapshots.
//!
//! The backend is pluggable: anything that can save and load a JSON value
//! under a string key will do.

pub mod file;
pub mod memory;

use std::future::Future;
use std::pin::Pin;

use crate::{
    chase::PositionSnapshot,
    error::{ChaseError, Result},
};

pub use file::JsonFileStore;
pub use memory::MemoryStore;

/// Save and load JSON values by key
pub trait KeyValueStore: Send + Sync {
    fn save<'a>(
        &'a self,
        key: &'a str,
        value: serde_json::Value,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

    /// `Ok(None)` when nothing has been saved under `key`.
    fn load<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<serde_json::Value>>> + Send + 'a>>;
}

/// Keys are plain names: ASCII letters, digits, `-`, `_` and `.`, not
/// starting with a dot. Every backend accepts these unchanged.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

pub async fn save_snapshot(
    store: &dyn KeyValueStore,
    key: &str,
    snapshot: &PositionSnapshot,
) -> Result<()> {
    let value = snapshot.to_value()?;
    store.save(key, value).await?;
    tracing::info!(key, "positions saved");
    Ok(())
}

pub async fn load_snapshot(store: &dyn KeyValueStore, key: &str) -> Result<PositionSnapshot> {
    let Some(value) = store.load(key).await? else {
        return Err(ChaseError::NotFound(format!("no saved positions under '{key}'")));
    };

    PositionSnapshot::from_value(value)
}
