//! Clients for the download-client web APIs.
//!
//! Both families implement [`traits::TorrentClient`]; [`Downloader`] picks
//! one from a [`relo_core::config::ConnectionConfig`].

pub mod downloader;
pub mod qbittorrent;
pub mod traits;
pub mod transmission;

pub use downloader::{Downloader, DownloaderError};
pub use traits::TorrentClient;
