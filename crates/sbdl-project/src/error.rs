//! Error types for sbdl-project.

use thiserror::Error;

use crate::project::ProjectType;

#[derive(Debug, Error)]
pub enum Error {
    /// The payload failed a magic or shape check. `probable` names the family
    /// the payload most likely belongs to, when a secondary check can tell.
    #[error("{message}{}", probable_hint(.probable))]
    FormatMismatch {
        message: String,
        probable: Option<ProjectType>,
    },

    #[error(
        "cannot access metadata of project {0}: \
         it is probably unshared, never existed, or the id is invalid"
    )]
    AccessDenied(String),

    /// The manifest endpoint answered 404.
    #[error("project {id} does not exist{}", not_found_hint(.metadata_accessible))]
    ProjectNotFound { id: String, metadata_accessible: bool },

    #[error(transparent)]
    Transport(#[from] sbdl_fetch::Error),

    #[error("cannot decode project: {0}")]
    Decode(String),

    #[error("unknown project type: {0}")]
    UnknownType(String),

    #[error("unknown asset extension: {0}")]
    UnknownExtension(String),

    #[error(transparent)]
    Archive(#[from] sbdl_archive::Error),

    #[error("failed to serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn format_mismatch(
        message: impl Into<String>,
        probable: Option<ProjectType>,
    ) -> Self {
        Error::FormatMismatch {
            message: message.into(),
            probable,
        }
    }

    /// The family a mismatched payload probably belongs to.
    pub fn probable_type(&self) -> Option<ProjectType> {
        match self {
            Error::FormatMismatch { probable, .. } => *probable,
            _ => None,
        }
    }

    /// HTTP status of the failed request, for transport errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Transport(e) => e.status(),
            Error::ProjectNotFound { .. } => Some(404),
            _ => None,
        }
    }
}

fn not_found_hint(metadata_accessible: &bool) -> &'static str {
    if *metadata_accessible {
        " even though its metadata was accessible"
    } else {
        " or is not shared"
    }
}

fn probable_hint(probable: &Option<ProjectType>) -> String {
    match probable {
        Some(project_type) => format!(" (probably a .{})", project_type.extension()),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, Error>;
