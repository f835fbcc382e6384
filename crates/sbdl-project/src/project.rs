use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use sbdl_archive::ArchiveOptions;

use crate::error::{Error, Result};

/// Manifest family of a project, named after the file extension it is saved as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectType {
    /// Legacy binary projects.
    Sb,
    /// JSON manifests with per-category numeric asset ids, or zipped binaries.
    Sb2,
    /// JSON manifests addressing assets by `md5ext`.
    Sb3,
}

impl ProjectType {
    pub fn extension(self) -> &'static str {
        match self {
            ProjectType::Sb => "sb",
            ProjectType::Sb2 => "sb2",
            ProjectType::Sb3 => "sb3",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ProjectType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sb" => Ok(ProjectType::Sb),
            "sb2" => Ok(ProjectType::Sb2),
            "sb3" => Ok(ProjectType::Sb3),
            other => Err(Error::UnknownType(other.to_string())),
        }
    }
}

/// One member of a reassembled project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievedFile {
    pub path: String,
    pub data: Bytes,
}

impl RetrievedFile {
    pub fn new(path: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            path: path.into(),
            data: data.into(),
        }
    }
}

/// Outcome of loading a project.
#[derive(Debug, Clone)]
pub enum LoadedProject {
    /// The server already returned a complete project file.
    Buffer {
        title: String,
        extension: ProjectType,
        data: Bytes,
    },
    /// The project was rebuilt from a manifest and its assets, manifest first.
    Zip {
        title: String,
        extension: ProjectType,
        files: Vec<RetrievedFile>,
    },
}

impl LoadedProject {
    pub fn title(&self) -> &str {
        match self {
            LoadedProject::Buffer { title, .. } | LoadedProject::Zip { title, .. } => title,
        }
    }

    pub fn extension(&self) -> ProjectType {
        match self {
            LoadedProject::Buffer { extension, .. } | LoadedProject::Zip { extension, .. } => {
                *extension
            }
        }
    }

    /// `"buffer"` or `"zip"`.
    pub fn kind(&self) -> &'static str {
        match self {
            LoadedProject::Buffer { .. } => "buffer",
            LoadedProject::Zip { .. } => "zip",
        }
    }

    /// Suggested file name, `<title>.<extension>`.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.title(), self.extension())
    }

    /// Produce the bytes of a saveable project file, packing reassembled
    /// projects into a zip container.
    pub fn into_bytes(self, options: &ArchiveOptions) -> Result<Bytes> {
        match self {
            LoadedProject::Buffer { data, .. } => Ok(data),
            LoadedProject::Zip { files, .. } => {
                let archive = sbdl_archive::create_archive(
                    files.iter().map(|file| (file.path.as_str(), file.data.as_ref())),
                    options,
                )?;
                Ok(Bytes::from(archive))
            }
        }
    }
}
