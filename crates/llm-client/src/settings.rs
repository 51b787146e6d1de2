//! Persisted API key and model selection.
//!
//! Stands in for the browser's local storage: two string values under fixed
//! keys, read whenever an analysis starts.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use crate::credentials::{LlmCredentials, DEFAULT_MODEL};
use crate::error::SettingsError;

const SETTINGS_DIR: &str = "stock-insight";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openrouter_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openrouter_model: Option<String>,
}

impl StoredSettings {
    /// Stored model or the default one.
    pub fn model(&self) -> &str {
        self.openrouter_model
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_MODEL)
    }

    /// Credentials for a remote call, if a key has been saved.
    pub fn credentials(&self) -> Option<LlmCredentials> {
        self.openrouter_api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .map(|key| LlmCredentials::new(key, self.model()))
    }
}

#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn load(&self) -> Result<StoredSettings, SettingsError>;
    async fn save(&self, settings: &StoredSettings) -> Result<(), SettingsError>;
    /// Remove both the key and the model.
    async fn clear(&self) -> Result<(), SettingsError>;
}

/// JSON file on disk.
pub struct FileSettingsStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    /// `STOCK_INSIGHT_SETTINGS_PATH`, else `<config dir>/stock-insight/settings.json`.
    pub fn from_env() -> Result<Self, SettingsError> {
        if let Some(path) = std::env::var("STOCK_INSIGHT_SETTINGS_PATH")
            .ok()
            .filter(|s| !s.is_empty())
        {
            return Ok(Self::new(path));
        }
        let dir = dirs::config_dir().ok_or(SettingsError::NoConfigDir)?;
        Ok(Self::new(dir.join(SETTINGS_DIR).join(SETTINGS_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SettingsStore for FileSettingsStore {
    async fn load(&self) -> Result<StoredSettings, SettingsError> {
        let _guard = self.lock.read().await;
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoredSettings::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, settings: &StoredSettings) -> Result<(), SettingsError> {
        let _guard = self.lock.write().await;
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(settings)?;
        tokio::fs::write(&self.path, json).await?;
        tracing::info!("Saved settings to {}", self.path.display());
        Ok(())
    }

    async fn clear(&self) -> Result<(), SettingsError> {
        let _guard = self.lock.write().await;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::info!("Removed settings at {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process store, used by tests and when no config directory exists.
#[derive(Default)]
pub struct MemorySettingsStore {
    inner: RwLock<StoredSettings>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: StoredSettings) -> Self {
        Self {
            inner: RwLock::new(settings),
        }
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn load(&self) -> Result<StoredSettings, SettingsError> {
        Ok(self.inner.read().await.clone())
    }

    async fn save(&self, settings: &StoredSettings) -> Result<(), SettingsError> {
        *self.inner.write().await = settings.clone();
        Ok(())
    }

    async fn clear(&self) -> Result<(), SettingsError> {
        *self.inner.write().await = StoredSettings::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StoredSettings {
        StoredSettings {
            openrouter_api_key: Some("sk-or-v1-abc".to_string()),
            openrouter_model: Some("openai/gpt-4o".to_string()),
        }
    }

    #[test]
    fn test_model_defaults() {
        assert_eq!(StoredSettings::default().model(), DEFAULT_MODEL);
        let blank = StoredSettings {
            openrouter_api_key: None,
            openrouter_model: Some(String::new()),
        };
        assert_eq!(blank.model(), DEFAULT_MODEL);
    }

    #[test]
    fn test_credentials_require_key() {
        assert!(StoredSettings::default().credentials().is_none());
        let creds = sample().credentials().unwrap();
        assert_eq!(creds.api_key, "sk-or-v1-abc");
        assert_eq!(creds.model, "openai/gpt-4o");
    }

    #[tokio::test]
    async fn test_file_store_round_trip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSettingsStore::new(dir.path().join("nested").join("settings.json"));

        assert_eq!(store.load().await.unwrap(), StoredSettings::default());

        store.save(&sample()).await.unwrap();
        assert_eq!(store.load().await.unwrap(), sample());

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"openrouter_api_key\""));
        assert!(raw.contains("\"openrouter_model\""));

        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), StoredSettings::default());
        // Clearing twice is fine
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_file_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = FileSettingsStore::new(path);
        assert!(matches!(
            store.load().await,
            Err(SettingsError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemorySettingsStore::new();
        store.save(&sample()).await.unwrap();
        assert_eq!(store.load().await.unwrap(), sample());
        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().credentials().is_none());
    }
}
