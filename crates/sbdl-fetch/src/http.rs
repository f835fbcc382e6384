use std::future::Future;

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// A fully buffered HTTP response.
///
/// Project manifests and assets are small enough to hold in memory, and the
/// format detector needs to look at the same bytes more than once (as text,
/// then as an archive), so the body is read eagerly.
#[derive(Debug, Clone)]
pub struct Response {
    url: String,
    status: u16,
    body: Bytes,
}

impl Response {
    pub fn new(url: impl Into<String>, status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            url: url.into(),
            status,
            body: body.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// `true` for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    pub fn into_bytes(self) -> Bytes {
        self.body
    }

    /// View the body as UTF-8 text.
    pub fn text(&self) -> std::result::Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.body)
    }

    /// Parse the body as a JSON document.
    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.body)
    }

    /// Turn a non-2xx response into [`Error::Status`].
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::Status {
                url: self.url,
                status: self.status,
            })
        }
    }
}

/// Asynchronous HTTP client abstraction.
///
/// Implementations return every answered request as `Ok`, whatever its status;
/// only failures to get an answer at all (DNS, connection, body read) are
/// reported through `Self::Error`. Timeouts are the implementation's concern.
///
/// # Implementations
///
/// - [`ReqwestClient`]: Production implementation using `reqwest`
/// - Mock implementations for testing
pub trait HttpClient: Send + Sync {
    /// Error type for transport failures.
    type Error: std::error::Error + Send + 'static;

    /// Issue a GET request and buffer the whole body.
    fn get(
        &self,
        url: &str,
    ) -> impl Future<Output = std::result::Result<Response, Self::Error>> + Send;
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use super::*;

    /// Production HTTP client implementation using reqwest.
    #[derive(Debug, Clone, Default)]
    pub struct ReqwestClient {
        client: reqwest::Client,
    }

    impl ReqwestClient {
        pub fn new() -> Result<Self> {
            let client = reqwest::Client::builder()
                .user_agent(concat!("sbdl/", env!("CARGO_PKG_VERSION")))
                .build()
                .map_err(|e| Error::Network(e.to_string()))?;
            Ok(Self { client })
        }

        pub fn from_client(client: reqwest::Client) -> Self {
            Self { client }
        }
    }

    impl HttpClient for ReqwestClient {
        type Error = reqwest::Error;

        async fn get(&self, url: &str) -> std::result::Result<Response, Self::Error> {
            let response = self.client.get(url).send().await?;
            let status = response.status().as_u16();
            let body = response.bytes().await?;
            Ok(Response::new(url, status, body))
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::ReqwestClient;
