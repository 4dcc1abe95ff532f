pub mod client;
pub mod error;
pub mod types;

pub use client::QbitClient;
pub use error::QbitError;
