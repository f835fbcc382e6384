//! Retrieval and reassembly of projects from an asset-addressed API.
//!
//! # Architecture
//!
//! - [`detect`] - Classifies fetched bytes into one closed [`Manifest`] variant
//! - [`assets`] - Deduplicates media by content identity and plans one fetch per asset
//! - [`order`] - Deterministic ordering of the reassembled files
//! - [`progress`] - Per-invocation progress observer
//! - [`loader`] - Sequences the above for each project family
//!
//! All network access goes through a [`sbdl_fetch::FetchQueue`], so the
//! number of requests in flight never exceeds the configured cap no matter
//! how many assets a project references.

pub mod assets;
mod config;
pub mod detect;
mod error;
pub mod loader;
pub mod order;
pub mod progress;
mod project;

pub use assets::{MediaCategory, UniqueAsset};
pub use config::{Endpoints, LoaderConfig};
pub use detect::Manifest;
pub use error::{Error, Result};
pub use loader::ProjectLoader;
pub use order::{MANIFEST_FILE, sort_files};
pub use progress::{NoProgress, ProgressObserver, TaskGuard};
pub use project::{LoadedProject, ProjectType, RetrievedFile};
