pub mod client;
pub mod error;
pub mod types;

pub use client::TransmissionClient;
pub use error::TransmissionError;
