//! Command bodies written against any [`TorrentClient`], so they can run
//! over a live [`relo_api::Downloader`] or a test double alike.

use relo_api::TorrentClient;
use relo_core::catalog::tally_domains;
use relo_core::config::Rule;
use relo_core::models::{ReplaceResult, ScanResult, TrackerEntry};
use relo_core::replace;

pub async fn list_trackers<C: TorrentClient>(client: &C) -> Result<Vec<TrackerEntry>, C::Error> {
    let torrents = client.list_torrents().await?;
    Ok(tally_domains(&torrents))
}

pub async fn scan<C: TorrentClient>(client: &C, rules: &[Rule]) -> Result<ScanResult, C::Error> {
    let torrents = client.list_torrents().await?;
    Ok(replace::plan(&torrents, rules))
}

/// Issue every planned replacement in order. A failed item is recorded and
/// the batch carries on.
pub async fn apply<C: TorrentClient>(client: &C, plan: &ScanResult) -> Vec<ReplaceResult> {
    let mut results = Vec::with_capacity(plan.matches.len());
    for m in &plan.matches {
        match client.replace_tracker(&m.hash, &m.old_url, &m.new_url).await {
            Ok(()) => {
                tracing::debug!(torrent = %m.name, new_url = %m.new_url, "Tracker replaced");
                results.push(ReplaceResult::succeeded(m));
            }
            Err(e) => {
                tracing::warn!(
                    torrent = %m.name,
                    old_url = %m.old_url,
                    error = %e,
                    "Tracker replacement failed"
                );
                results.push(ReplaceResult::failed(m, e.to_string()));
            }
        }
    }
    results
}
