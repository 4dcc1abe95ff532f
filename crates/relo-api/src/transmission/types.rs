use serde::{Deserialize, Serialize};

use relo_core::models::{Torrent, Tracker};

/// Fields requested from `torrent-get` when listing.
pub const TORRENT_FIELDS: &[&str] = &["hashString", "name", "trackers"];

/// JSON-RPC envelope sent to `/transmission/rpc`.
#[derive(Debug, Serialize)]
pub struct RpcRequest<'a, A> {
    pub method: &'a str,
    pub arguments: A,
}

/// Envelope returned by every RPC method. `result` is `"success"` or an
/// error string.
#[derive(Debug, Deserialize)]
pub struct RpcResponse<T> {
    pub result: String,
    pub arguments: Option<T>,
}

/// Argument object for methods that take none.
#[derive(Debug, Default, Serialize)]
pub struct NoArgs {}

#[derive(Debug, Deserialize)]
pub struct SessionInfo {
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TorrentGetArgs<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<&'a str>>,
    pub fields: &'a [&'a str],
}

#[derive(Debug, Deserialize)]
pub struct TorrentList {
    pub torrents: Vec<TransmissionTorrent>,
}

#[derive(Debug, Deserialize)]
pub struct TransmissionTorrent {
    #[serde(rename = "hashString", default)]
    pub hash: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub trackers: Vec<TransmissionTracker>,
}

#[derive(Debug, Deserialize)]
pub struct TransmissionTracker {
    pub announce: String,
    pub id: i64,
}

/// `torrent-set` arguments replacing one tracker, addressed by its id.
#[derive(Debug, Serialize)]
pub struct TrackerReplaceArgs<'a> {
    pub ids: [&'a str; 1],
    #[serde(rename = "trackerReplace")]
    pub tracker_replace: (i64, &'a str),
}

impl TransmissionTorrent {
    /// Id of the tracker announcing to exactly `url`.
    pub fn find_tracker_id(&self, url: &str) -> Option<i64> {
        self.trackers
            .iter()
            .find(|t| t.announce == url)
            .map(|t| t.id)
    }
}

impl From<TransmissionTorrent> for Torrent {
    fn from(t: TransmissionTorrent) -> Self {
        Torrent {
            hash: t.hash,
            name: t.name,
            trackers: t
                .trackers
                .into_iter()
                .map(|tr| Tracker::new(tr.announce))
                .collect(),
        }
    }
}
