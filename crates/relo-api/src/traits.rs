//! Trait definitions for download clients.
//!
//! The runtime only ever needs three things from a client: prove the
//! session works, list torrents with their trackers, and swap one tracker
//! URL for another.

use std::future::Future;
use std::time::Duration;

use relo_core::models::Torrent;

/// Per-request timeout shared by all clients.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// TCP connect timeout shared by all clients.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// A unified download-client interface.
pub trait TorrentClient: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Probe the authenticated session. Returns a human-readable
    /// description such as `qBittorrent v4.6.2`.
    fn test_connection(&self) -> impl Future<Output = Result<String, Self::Error>> + Send;

    /// All torrents with their announce URLs.
    fn list_torrents(&self) -> impl Future<Output = Result<Vec<Torrent>, Self::Error>> + Send;

    /// Replace `old_url` with `new_url` in the tracker list of one torrent.
    fn replace_tracker(
        &self,
        hash: &str,
        old_url: &str,
        new_url: &str,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// Shared HTTP client settings. Self-signed certificates are common on
/// seedbox web UIs, so they are accepted whenever HTTPS is in use.
pub(crate) fn http_client(
    use_https: bool,
    cookie_store: bool,
) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .cookie_store(cookie_store)
        .danger_accept_invalid_certs(use_https)
        .timeout(REQUEST_TIMEOUT)
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
}
