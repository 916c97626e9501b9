use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use super::{KeyValueStore, is_valid_key};
use crate::error::{ChaseError, Result};

/// Stores each key as `<dir>/<key>.json`.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-save leaves the previous value intact.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if !is_valid_key(key) {
            return Err(ChaseError::Storage(format!("unusable storage key '{key}'")));
        }

        Ok(self.dir.join(format!("{key}.json")))
    }
}

fn io_error(path: &Path, error: std::io::Error) -> ChaseError {
    ChaseError::Storage(format!("{}: {error}", path.display()))
}

impl KeyValueStore for JsonFileStore {
    fn save<'a>(
        &'a self,
        key: &'a str,
        value: serde_json::Value,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let path = self.path_for(key)?;
            let temp = path.with_extension("json.tmp");
            let bytes = serde_json::to_vec_pretty(&value)
                .map_err(|e| ChaseError::Storage(e.to_string()))?;

            tokio::fs::create_dir_all(&self.dir)
                .await
                .map_err(|e| io_error(&self.dir, e))?;
            tokio::fs::write(&temp, bytes)
                .await
                .map_err(|e| io_error(&temp, e))?;
            tokio::fs::rename(&temp, &path)
                .await
                .map_err(|e| io_error(&path, e))?;

            tracing::debug!(path = %path.display(), "wrote value");
            Ok(())
        })
    }

    fn load<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<serde_json::Value>>> + Send + 'a>> {
        Box::pin(async move {
            let path = self.path_for(key)?;

            let bytes = match tokio::fs::read(&path).await {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
                Err(e) => return Err(io_error(&path, e)),
            };

            let value = serde_json::from_slice(&bytes)
                .map_err(|e| ChaseError::Storage(format!("{}: {e}", path.display())))?;
            Ok(Some(value))
        })
    }
}
