use thiserror::Error;

/// Errors from the qBittorrent Web API client.
#[derive(Debug, Error)]
pub enum QbitError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("login failed: {0}")]
    Login(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),
}
