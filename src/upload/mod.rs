//! Sends the current snapshot to the remote metrics endpoint.

mod client;

pub use client::{encode_body, UploadClient, UploadConfig, DEFAULT_ENDPOINT};

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("No metrics loaded")]
    EmptyInput,
    #[error("Token required")]
    MissingToken,
    #[error("Server rejected request (HTTP {status})")]
    ServerRejected { status: u16 },
    #[error("Network error: {0}")]
    Transport(#[source] reqwest::Error),
}
