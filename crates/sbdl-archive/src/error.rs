use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("archive is corrupted")]
    Corrupted,

    #[error("archive has no entry named '{0}'")]
    MissingEntry(String),

    #[error("entry '{name}' is {size} bytes, more than can be read into memory")]
    EntryTooLarge { name: String, size: u64 },

    #[error("entry '{0}' is not valid UTF-8 text")]
    InvalidText(String),

    #[error("failed to write entry '{path}': {source}")]
    WriteFailed {
        path: String,
        source: zip::result::ZipError,
    },

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
