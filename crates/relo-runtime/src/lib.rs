mod backend;
pub mod ops;

use std::path::PathBuf;

use relo_api::{Downloader, DownloaderError, TorrentClient};
use relo_core::config::{AppConfig, ConnectionConfig};
use relo_core::models::{ReplaceResult, ScanResult, TrackerEntry};

pub use backend::Backend;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("config error: {0}")]
    Config(String),
    #[error(transparent)]
    Downloader(#[from] DownloaderError),
}

/// The live backend: TOML config on disk plus a fresh client session per
/// command.
pub struct Runtime {
    config_path: PathBuf,
}

impl Runtime {
    /// Use the platform config location.
    pub fn new() -> Self {
        Self::with_config_path(AppConfig::config_path())
    }

    pub fn with_config_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub fn config_path(&self) -> &std::path::Path {
        &self.config_path
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for Runtime {
    type Error = RuntimeError;

    async fn load_config(&self) -> Result<AppConfig, RuntimeError> {
        let config = AppConfig::load_from(&self.config_path)
            .map_err(|e| RuntimeError::Config(e.to_string()))?;
        tracing::debug!(path = %self.config_path.display(), rules = config.rules.len(), "Config loaded");
        Ok(config)
    }

    async fn save_config(&self, config: AppConfig) -> Result<(), RuntimeError> {
        config
            .save_to(&self.config_path)
            .map_err(|e| RuntimeError::Config(e.to_string()))?;
        tracing::debug!(path = %self.config_path.display(), "Config saved");
        Ok(())
    }

    async fn test_connection(&self, connection: ConnectionConfig) -> Result<String, RuntimeError> {
        let client = Downloader::connect(&connection).await?;
        match client.test_connection().await {
            Ok(message) => {
                tracing::info!(client = %client.kind(), reply = %message, "Connection test succeeded");
                Ok(message)
            }
            Err(e) => {
                tracing::warn!(client = %client.kind(), error = %e, "Connection test failed");
                Err(e.into())
            }
        }
    }

    async fn list_trackers(
        &self,
        connection: ConnectionConfig,
    ) -> Result<Vec<TrackerEntry>, RuntimeError> {
        let client = Downloader::connect(&connection).await?;
        let entries = ops::list_trackers(&client).await?;
        tracing::info!(domains = entries.len(), "Tracker catalog fetched");
        Ok(entries)
    }

    async fn scan_torrents(&self, config: AppConfig) -> Result<ScanResult, RuntimeError> {
        let client = Downloader::connect(&config.connection).await?;
        let result = ops::scan(&client, &config.rules).await?;
        tracing::info!(
            total = result.total_torrents,
            matched = result.matched_torrents,
            replacements = result.replacement_count(),
            "Scan complete"
        );
        Ok(result)
    }

    async fn execute_replace(&self, config: AppConfig) -> Result<Vec<ReplaceResult>, RuntimeError> {
        let client = Downloader::connect(&config.connection).await?;
        // Re-plan against the live listing rather than trusting a preview
        // the torrent set may have drifted from.
        let plan = ops::scan(&client, &config.rules).await?;
        let results = ops::apply(&client, &plan).await;

        let succeeded = results.iter().filter(|r| r.success).count();
        tracing::info!(
            succeeded,
            failed = results.len() - succeeded,
            "Replacement batch finished"
        );
        Ok(results)
    }
}
