use std::io::{Cursor, Read};

use zip::result::ZipError;

use crate::error::{Error, Result};

/// Largest entry [`read_entry`] will load into memory.
pub const MAX_ENTRY_SIZE: u64 = 256 * 1024 * 1024;

/// Read the entry called `name` out of an in-memory zip container.
///
/// The size declared in the archive is only trusted to reject oversized
/// entries early; the decompressed stream is capped independently.
pub fn read_entry(data: &[u8], name: &str) -> Result<Vec<u8>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data)).map_err(|_| Error::Corrupted)?;

    let file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Err(Error::MissingEntry(name.to_string())),
        Err(_) => return Err(Error::Corrupted),
    };

    let declared = file.size();
    if declared > MAX_ENTRY_SIZE {
        return Err(Error::EntryTooLarge {
            name: name.to_string(),
            size: declared,
        });
    }

    let mut content = Vec::new();
    file.take(MAX_ENTRY_SIZE + 1)
        .read_to_end(&mut content)
        .map_err(|_| Error::Corrupted)?;
    if content.len() as u64 > MAX_ENTRY_SIZE {
        return Err(Error::EntryTooLarge {
            name: name.to_string(),
            size: content.len() as u64,
        });
    }
    Ok(content)
}

/// Like [`read_entry`], but decode the entry as UTF-8 text.
pub fn read_entry_to_string(data: &[u8], name: &str) -> Result<String> {
    let content = read_entry(data, name)?;
    String::from_utf8(content).map_err(|_| Error::InvalidText(name.to_string()))
}
