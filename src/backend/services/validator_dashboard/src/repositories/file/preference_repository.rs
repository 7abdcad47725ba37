use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::{fs, sync::Mutex};
use tracing::{debug, info, warn};

use crate::repositories::traits::{PreferenceRepository, Storage};
use crate::utils::errors::{DashboardError, Result};

/// Preferences stored as a flat JSON object on disk
pub struct FilePreferenceRepository {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FilePreferenceRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<BTreeMap<String, String>> {
        match fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No preferences stored yet");
                Ok(BTreeMap::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Current values for a rewrite; an unparseable store starts over.
    async fn load_for_update(&self) -> Result<BTreeMap<String, String>> {
        match self.load().await {
            Err(DashboardError::SerializationError(e)) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Discarding unreadable preferences"
                );
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl PreferenceRepository for FilePreferenceRepository {
    async fn get_preference(&self, key: Storage) -> Result<Option<String>> {
        let mut values = self.load().await?;
        Ok(values.remove(key.as_str()))
    }

    async fn set_preference(&self, key: Storage, value: String) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut values = self.load_for_update().await?;
        values.insert(key.as_str().to_string(), value);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        // Readers see either the old file or the new one, never a partial write
        let staging = self.staging_path();
        fs::write(&staging, serde_json::to_vec_pretty(&values)?).await?;
        fs::rename(&staging, &self.path).await?;

        info!(key = key.as_str(), path = %self.path.display(), "Stored preference");
        Ok(())
    }
}
