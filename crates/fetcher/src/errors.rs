//! Fetch task error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request to the breeds API failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Breeds API answered with status {0}")]
    UpstreamStatus(u16),

    #[error("Unrecognized breeds payload: {0}")]
    Payload(String),
}
