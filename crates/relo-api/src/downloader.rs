use thiserror::Error;

use relo_core::config::{ConnectionConfig, DownloaderType};
use relo_core::models::Torrent;

use crate::qbittorrent::{QbitClient, QbitError};
use crate::traits::TorrentClient;
use crate::transmission::{TransmissionClient, TransmissionError};

#[derive(Debug, Error)]
pub enum DownloaderError {
    #[error("qBittorrent: {0}")]
    QBittorrent(#[from] QbitError),

    #[error("Transmission: {0}")]
    Transmission(#[from] TransmissionError),
}

/// A connected client of whichever family the config names.
pub enum Downloader {
    QBittorrent(QbitClient),
    Transmission(TransmissionClient),
}

impl Downloader {
    /// Open an authenticated session against the configured client.
    pub async fn connect(conn: &ConnectionConfig) -> Result<Self, DownloaderError> {
        tracing::info!(
            client = %conn.downloader_type,
            host = %conn.host,
            port = conn.port,
            https = conn.use_https,
            "Connecting to download client"
        );
        match conn.downloader_type {
            DownloaderType::QBittorrent => Ok(Self::QBittorrent(QbitClient::connect(conn).await?)),
            DownloaderType::Transmission => {
                Ok(Self::Transmission(TransmissionClient::connect(conn).await?))
            }
        }
    }

    pub fn kind(&self) -> DownloaderType {
        match self {
            Self::QBittorrent(_) => DownloaderType::QBittorrent,
            Self::Transmission(_) => DownloaderType::Transmission,
        }
    }
}

impl TorrentClient for Downloader {
    type Error = DownloaderError;

    async fn test_connection(&self) -> Result<String, DownloaderError> {
        match self {
            Self::QBittorrent(c) => Ok(c.test_connection().await?),
            Self::Transmission(c) => Ok(c.test_connection().await?),
        }
    }

    async fn list_torrents(&self) -> Result<Vec<Torrent>, DownloaderError> {
        match self {
            Self::QBittorrent(c) => Ok(c.list_torrents().await?),
            Self::Transmission(c) => Ok(c.list_torrents().await?),
        }
    }

    async fn replace_tracker(
        &self,
        hash: &str,
        old_url: &str,
        new_url: &str,
    ) -> Result<(), DownloaderError> {
        match self {
            Self::QBittorrent(c) => Ok(c.replace_tracker(hash, old_url, new_url).await?),
            Self::Transmission(c) => Ok(c.replace_tracker(hash, old_url, new_url).await?),
        }
    }
}
