use serde::{Deserialize, Serialize};

/// A torrent as reported by the download client, reduced to what
/// tracker relocation needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Torrent {
    pub hash: String,
    pub name: String,
    pub trackers: Vec<Tracker>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tracker {
    pub url: String,
}

impl Tracker {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}
