//! Error types for sbdl-fetch.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("request to {url} returned status code {status}")]
    Status { url: String, status: u16 },

    #[error("network error: {0}")]
    Network(String),

    #[error("fetch queue is closed")]
    Closed,
}

impl Error {
    /// HTTP status carried by this error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
