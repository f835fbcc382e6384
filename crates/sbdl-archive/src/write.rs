use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;

use crate::error::{Error, Result};
use crate::options::ArchiveOptions;

/// Build a zip container from `(path, data)` entries, in the given order.
///
/// Progress is reported once per entry as the fraction of entries written;
/// an empty archive reports `1.0` once it is finished.
pub fn create_archive<'a, I>(entries: I, options: &ArchiveOptions) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = (&'a str, &'a [u8])>,
    I::IntoIter: ExactSizeIterator,
{
    let entries = entries.into_iter();
    let total = entries.len();

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let file_options =
        SimpleFileOptions::default().compression_method(options.compression.method());

    for (index, (path, data)) in entries.enumerate() {
        writer
            .start_file(path, file_options)
            .map_err(|source| Error::WriteFailed {
                path: path.to_string(),
                source,
            })?;
        writer.write_all(data)?;
        options.report((index + 1) as f64 / total as f64);
    }

    let cursor = writer.finish()?;
    if total == 0 {
        options.report(1.0);
    }
    Ok(cursor.into_inner())
}
