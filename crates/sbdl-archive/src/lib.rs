//! Container sniffing, embedded entry reading and archive writing.
//!
//! # Architecture
//!
//! - `detect.rs` - Magic-number checks for legacy projects and zip containers
//! - `read.rs` - Pulling a single named entry out of an in-memory zip
//! - `write.rs` - Building a deflate-compressed zip from ordered entries
//! - `options.rs` - Writer configuration and progress callback

pub use detect::{ContainerFormat, LEGACY_MAGIC, ZIP_MAGIC, detect_format, has_magic};
pub use error::{Error, Result};
pub use options::{ArchiveOptions, Compression};
pub use read::{MAX_ENTRY_SIZE, read_entry, read_entry_to_string};
pub use write::create_archive;

mod detect;
mod error;
pub mod options;
mod read;
mod write;
