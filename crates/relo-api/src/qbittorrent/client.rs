use futures::stream::{self, StreamExt, TryStreamExt};
use reqwest::Client;

use relo_core::config::ConnectionConfig;
use relo_core::models::Torrent;

use super::error::QbitError;
use super::types::{QbitTorrent, QbitTracker};
use crate::traits::{http_client, TorrentClient};

/// How many per-torrent tracker lists are fetched at once.
const TRACKER_FETCH_CONCURRENCY: usize = 8;

/// qBittorrent Web API v2 client. Holds an authenticated cookie session.
pub struct QbitClient {
    base_url: String,
    http: Client,
}

impl QbitClient {
    /// Log in and keep the `SID` cookie for subsequent calls.
    pub async fn connect(conn: &ConnectionConfig) -> Result<Self, QbitError> {
        let base_url = conn.base_url();
        let http = http_client(conn.use_https, true)?;

        let resp = http
            .post(format!("{base_url}/api/v2/auth/login"))
            .form(&[
                ("username", conn.username.as_str()),
                ("password", conn.password.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(QbitError::Login(format!("status {}: {}", status.as_u16(), body.trim())));
        }
        if body.trim() != "Ok." {
            return Err(QbitError::Login(body.trim().to_string()));
        }

        tracing::debug!(%base_url, "qBittorrent login accepted");
        Ok(Self { base_url, http })
    }

    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, QbitError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status, "qBittorrent API error");
            Err(QbitError::Api {
                status,
                message: body,
            })
        }
    }

    async fn get_trackers(&self, hash: &str) -> Result<Vec<QbitTracker>, QbitError> {
        let resp = self
            .http
            .get(format!("{}/api/v2/torrents/trackers", self.base_url))
            .query(&[("hash", hash)])
            .send()
            .await?;

        let resp = Self::check_response(resp).await?;
        resp.json()
            .await
            .map_err(|e| QbitError::Parse(e.to_string()))
    }
}

impl TorrentClient for QbitClient {
    type Error = QbitError;

    async fn test_connection(&self) -> Result<String, QbitError> {
        let resp = self
            .http
            .get(format!("{}/api/v2/app/version", self.base_url))
            .send()
            .await?;

        let resp = Self::check_response(resp).await?;
        let version = resp.text().await?;
        Ok(format!("qBittorrent {}", version.trim()))
    }

    async fn list_torrents(&self) -> Result<Vec<Torrent>, QbitError> {
        let resp = self
            .http
            .get(format!("{}/api/v2/torrents/info", self.base_url))
            .send()
            .await?;

        let resp = Self::check_response(resp).await?;
        let torrents: Vec<QbitTorrent> = resp
            .json()
            .await
            .map_err(|e| QbitError::Parse(e.to_string()))?;

        // The info endpoint only carries the first working tracker, so the
        // full list is fetched per torrent. `buffered` keeps input order.
        stream::iter(torrents)
            .map(|t| async move {
                let trackers = self.get_trackers(&t.hash).await?;
                Ok::<_, QbitError>(t.into_torrent(trackers))
            })
            .buffered(TRACKER_FETCH_CONCURRENCY)
            .try_collect()
            .await
    }

    async fn replace_tracker(
        &self,
        hash: &str,
        old_url: &str,
        new_url: &str,
    ) -> Result<(), QbitError> {
        let resp = self
            .http
            .post(format!("{}/api/v2/torrents/editTracker", self.base_url))
            .form(&[("hash", hash), ("origUrl", old_url), ("newUrl", new_url)])
            .send()
            .await?;

        Self::check_response(resp).await?;
        Ok(())
    }
}
