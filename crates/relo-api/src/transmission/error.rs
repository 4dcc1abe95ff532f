use thiserror::Error;

/// Errors from the Transmission RPC client.
#[derive(Debug, Error)]
pub enum TransmissionError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("session negotiation failed: {0}")]
    Session(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The RPC envelope came back with a `result` other than `success`.
    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("not found: {0}")]
    NotFound(String),
}
