pub mod scan;
pub mod torrent;

pub use scan::{MatchedTorrent, ReplaceResult, ScanResult, TrackerEntry};
pub use torrent::{Torrent, Tracker};
