/// Header of a legacy (`.sb`) project file.
pub const LEGACY_MAGIC: &[u8] = b"ScratchV0";

/// Header of a zip container (`.sb2`/`.sb3` binaries).
pub const ZIP_MAGIC: &[u8] = b"PK";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerFormat {
    /// Opaque legacy project payload.
    Legacy,
    /// Zip container.
    Zip,
}

/// Check that `data` starts with `magic`. Short input never matches.
pub fn has_magic(data: &[u8], magic: &[u8]) -> bool {
    data.starts_with(magic)
}

pub fn detect_format(data: &[u8]) -> Option<ContainerFormat> {
    if has_magic(data, LEGACY_MAGIC) {
        Some(ContainerFormat::Legacy)
    } else if has_magic(data, ZIP_MAGIC) {
        Some(ContainerFormat::Zip)
    } else {
        None
    }
}
