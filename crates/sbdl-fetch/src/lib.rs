//! HTTP fetching with a bounded, first-come-first-served admission queue.
//!
//! # Architecture
//!
//! - [`HttpClient`] - Transport abstraction; the only place that touches the network
//! - [`Response`] - Fully buffered response with status, bytes, text and JSON views
//! - [`FetchQueue`] - Caps the number of in-flight requests and admits the rest in order
//!
//! # Key Features
//!
//! - **Bounded**: never more than `max_concurrent` requests in flight
//! - **Fair**: waiting requests are admitted strictly in submission order
//! - **Mechanism-Only**: no retries; callers decide how to recover from errors

mod error;
mod http;
mod queue;

pub use error::{Error, Result};
pub use http::{HttpClient, Response};
pub use queue::{DEFAULT_MAX_CONCURRENT, FetchQueue};

#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
