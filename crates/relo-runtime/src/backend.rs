//! The command boundary between the workflow coordinator and whatever
//! actually talks to the download client.

use std::future::Future;

use relo_core::config::{AppConfig, ConnectionConfig};
use relo_core::models::{ReplaceResult, ScanResult, TrackerEntry};

/// Asynchronous request/response commands. Arguments are owned so calls can
/// be moved onto spawned tasks.
pub trait Backend: Send + Sync + 'static {
    type Error: std::error::Error + Send + Sync + 'static;

    fn load_config(&self) -> impl Future<Output = Result<AppConfig, Self::Error>> + Send;

    fn save_config(
        &self,
        config: AppConfig,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Authenticate and probe; returns a success message for display.
    fn test_connection(
        &self,
        connection: ConnectionConfig,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;

    /// Distinct tracker domains in use, most common first.
    fn list_trackers(
        &self,
        connection: ConnectionConfig,
    ) -> impl Future<Output = Result<Vec<TrackerEntry>, Self::Error>> + Send;

    /// Dry run of the enabled rules. Never mutates the client.
    fn scan_torrents(
        &self,
        config: AppConfig,
    ) -> impl Future<Output = Result<ScanResult, Self::Error>> + Send;

    /// Apply the enabled rules. Per-item failures are reported inside the
    /// batch; `Err` means the call as a whole failed.
    fn execute_replace(
        &self,
        config: AppConfig,
    ) -> impl Future<Output = Result<Vec<ReplaceResult>, Self::Error>> + Send;
}
