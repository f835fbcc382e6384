//! Empirical classification of project payloads.
//!
//! A project id says nothing reliable about how the project is stored, so
//! each family probes the bytes it was given, most specific check first, and
//! yields one [`Manifest`] variant. Nothing downstream inspects raw bytes or
//! probes for fields again.

use bytes::Bytes;
use sbdl_archive::{ContainerFormat, detect_format};
use serde_json::Value;
use tracing::warn;

use crate::error::{Error, Result};
use crate::order::MANIFEST_FILE;
use crate::project::ProjectType;

/// A classified project payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Manifest {
    /// Complete legacy project file, passed through untouched.
    Legacy(Bytes),
    /// Complete zipped sb2 project file, passed through untouched.
    Sb2Binary(Bytes),
    /// sb2 manifest whose assets still have to be fetched.
    Sb2Json(Value),
    /// sb3 manifest whose assets still have to be fetched.
    Sb3Json(Value),
}

impl Manifest {
    pub fn project_type(&self) -> ProjectType {
        match self {
            Manifest::Legacy(_) => ProjectType::Sb,
            Manifest::Sb2Binary(_) | Manifest::Sb2Json(_) => ProjectType::Sb2,
            Manifest::Sb3Json(_) => ProjectType::Sb3,
        }
    }
}

/// Classify `data` fetched for a project of the requested family.
pub fn detect(project_type: ProjectType, data: Bytes) -> Result<Manifest> {
    match project_type {
        ProjectType::Sb => detect_legacy(data),
        ProjectType::Sb2 => detect_sb2(data),
        ProjectType::Sb3 => detect_sb3(&data),
    }
}

fn detect_legacy(data: Bytes) -> Result<Manifest> {
    match detect_format(&data) {
        Some(ContainerFormat::Legacy) => Ok(Manifest::Legacy(data)),
        Some(ContainerFormat::Zip) => Err(Error::format_mismatch(
            "Project is not a valid .sb file (failed magic check)",
            Some(ProjectType::Sb2),
        )),
        None => Err(Error::format_mismatch(
            "Project is not a valid .sb file (failed magic check)",
            None,
        )),
    }
}

fn detect_sb2(data: Bytes) -> Result<Manifest> {
    let parsed = std::str::from_utf8(&data)
        .ok()
        .and_then(|text| serde_json::from_str::<Value>(text).ok());

    match parsed {
        Some(manifest) if manifest.is_object() => Ok(Manifest::Sb2Json(manifest)),
        Some(_) => Err(Error::format_mismatch(
            "Project is not a valid .sb2 file (manifest is not an object)",
            None,
        )),
        None => detect_sb2_binary(data),
    }
}

fn detect_sb2_binary(data: Bytes) -> Result<Manifest> {
    match detect_format(&data) {
        Some(ContainerFormat::Zip) => Ok(Manifest::Sb2Binary(data)),
        Some(ContainerFormat::Legacy) => Err(Error::format_mismatch(
            "File is not a valid .sb2 (failed magic check)",
            Some(ProjectType::Sb),
        )),
        None => Err(Error::format_mismatch(
            "File is not a valid .sb2 (failed magic check)",
            None,
        )),
    }
}

fn detect_sb3(data: &[u8]) -> Result<Manifest> {
    let manifest = match serde_json::from_slice::<Value>(data) {
        Ok(manifest) => manifest,
        Err(e) => {
            warn!(error = %e, "project was not JSON, trying to interpret as zip");
            manifest_from_archive(data)?
        }
    };

    if manifest.get("objName").is_some_and(Value::is_string) {
        return Err(Error::format_mismatch(
            "Not a Scratch 3 project (found objName)",
            Some(ProjectType::Sb2),
        ));
    }
    if !manifest.get("targets").is_some_and(Value::is_array) {
        return Err(Error::format_mismatch(
            "Not a Scratch 3 project, missing targets",
            None,
        ));
    }
    Ok(Manifest::Sb3Json(manifest))
}

/// Last resort for sb3: the body is a whole zipped project. Only its manifest
/// is used; assets are fetched again like for any other sb3 project.
fn manifest_from_archive(data: &[u8]) -> Result<Value> {
    let text = sbdl_archive::read_entry_to_string(data, MANIFEST_FILE).map_err(|e| {
        Error::Decode(format!("project is neither JSON nor a readable archive: {e}"))
    })?;
    serde_json::from_str(&text)
        .map_err(|e| Error::Decode(format!("archived {MANIFEST_FILE} is not valid JSON: {e}")))
}
