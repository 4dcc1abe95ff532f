use serde::Deserialize;

use relo_core::models::{Torrent, Tracker};

/// Entry of `GET /api/v2/torrents/info` (only the fields we read).
#[derive(Debug, Deserialize)]
pub struct QbitTorrent {
    pub hash: String,
    pub name: String,
}

/// Entry of `GET /api/v2/torrents/trackers`.
#[derive(Debug, Deserialize)]
pub struct QbitTracker {
    pub url: String,
}

/// qBittorrent lists DHT, PeX and LSD as pseudo-trackers (`** [DHT] **`);
/// only real announce URLs are relocatable.
pub fn is_announce_url(url: &str) -> bool {
    url.starts_with("http") || url.starts_with("udp")
}

impl QbitTorrent {
    pub fn into_torrent(self, trackers: Vec<QbitTracker>) -> Torrent {
        Torrent {
            hash: self.hash,
            name: self.name,
            trackers: trackers
                .into_iter()
                .filter(|t| is_announce_url(&t.url))
                .map(|t| Tracker::new(t.url))
                .collect(),
        }
    }
}
