use serde::{Deserialize, Serialize};

/// Preview of what an execute would change. Produced by a scan and never
/// persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub total_torrents: usize,
    /// Distinct torrents with at least one matching tracker.
    pub matched_torrents: usize,
    pub matches: Vec<MatchedTorrent>,
}

impl ScanResult {
    /// Number of tracker URLs that would be rewritten.
    pub fn replacement_count(&self) -> usize {
        self.matches.len()
    }

    /// Share of torrents affected, rounded to a whole percent.
    pub fn match_percent(&self) -> u32 {
        if self.total_torrents == 0 {
            return 0;
        }
        ((self.matched_torrents as f64 / self.total_torrents as f64) * 100.0).round() as u32
    }
}

/// One projected replacement. `hash` plus the index in
/// [`ScanResult::matches`] is a stable display key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedTorrent {
    pub hash: String,
    pub name: String,
    pub old_url: String,
    pub new_url: String,
}

/// Outcome of one replacement attempt during execute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceResult {
    pub torrent_name: String,
    pub old_url: String,
    pub new_url: String,
    pub success: bool,
    pub error: Option<String>,
}

impl ReplaceResult {
    pub fn succeeded(m: &MatchedTorrent) -> Self {
        Self {
            torrent_name: m.name.clone(),
            old_url: m.old_url.clone(),
            new_url: m.new_url.clone(),
            success: true,
            error: None,
        }
    }

    pub fn failed(m: &MatchedTorrent, error: impl Into<String>) -> Self {
        Self {
            torrent_name: m.name.clone(),
            old_url: m.old_url.clone(),
            new_url: m.new_url.clone(),
            success: false,
            error: Some(error.into()),
        }
    }
}

/// A tracker domain in use, with the number of torrents announcing to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerEntry {
    pub domain: String,
    pub count: usize,
}
