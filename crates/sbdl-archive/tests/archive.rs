use std::io::Cursor;
use std::sync::{Arc, Mutex};

use sbdl_archive::{
    ArchiveOptions, Compression, ContainerFormat, Error, MAX_ENTRY_SIZE, create_archive,
    detect_format, read_entry, read_entry_to_string,
};

fn sample_entries() -> Vec<(String, Vec<u8>)> {
    vec![
        ("project.json".to_string(), br#"{"targets":[]}"#.to_vec()),
        ("0.svg".to_string(), b"<svg/>".to_vec()),
        ("0.wav".to_string(), vec![0x52, 0x49, 0x46, 0x46, 0x00]),
    ]
}

fn build(entries: &[(String, Vec<u8>)], options: &ArchiveOptions) -> Vec<u8> {
    create_archive(
        entries.iter().map(|(path, data)| (path.as_str(), data.as_slice())),
        options,
    )
    .expect("archive should build")
}

#[test]
fn written_archive_is_a_zip_container() {
    let archive = build(&sample_entries(), &ArchiveOptions::default());
    assert_eq!(detect_format(&archive), Some(ContainerFormat::Zip));
}

#[test]
fn entries_keep_their_order_and_content() {
    let entries = sample_entries();
    let archive = build(&entries, &ArchiveOptions::default());

    let mut zip = zip::ZipArchive::new(Cursor::new(&archive)).unwrap();
    let names: Vec<String> = (0..zip.len())
        .map(|i| zip.by_index(i).unwrap().name().to_string())
        .collect();
    assert_eq!(names, ["project.json", "0.svg", "0.wav"]);

    for (path, data) in &entries {
        assert_eq!(&read_entry(&archive, path).unwrap(), data);
    }
}

#[test]
fn stored_compression_round_trips_text() {
    let options = ArchiveOptions::default().compression(Compression::Stored);
    let archive = build(&sample_entries(), &options);
    assert_eq!(
        read_entry_to_string(&archive, "project.json").unwrap(),
        r#"{"targets":[]}"#
    );
}

#[test]
fn progress_reaches_one() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let options =
        ArchiveOptions::default().on_progress(Arc::new(move |f| sink.lock().unwrap().push(f)));

    build(&sample_entries(), &options);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 3);
    assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(*seen.last().unwrap(), 1.0);
}

#[test]
fn empty_archive_reports_completion() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let options =
        ArchiveOptions::default().on_progress(Arc::new(move |f| sink.lock().unwrap().push(f)));

    build(&[], &options);

    assert_eq!(*seen.lock().unwrap(), vec![1.0]);
}

#[test]
fn duplicate_paths_are_rejected() {
    let entries = vec![
        ("0.svg".to_string(), b"a".to_vec()),
        ("0.svg".to_string(), b"b".to_vec()),
    ];
    let result = create_archive(
        entries.iter().map(|(path, data)| (path.as_str(), data.as_slice())),
        &ArchiveOptions::default(),
    );
    assert!(matches!(result, Err(Error::WriteFailed { ref path, .. }) if path == "0.svg"));
}

#[test]
fn missing_entry_is_reported_by_name() {
    let archive = build(&sample_entries(), &ArchiveOptions::default());
    let err = read_entry(&archive, "sprite.json").unwrap_err();
    assert!(matches!(err, Error::MissingEntry(ref name) if name == "sprite.json"));
}

#[test]
fn non_zip_input_is_corrupted() {
    assert!(matches!(
        read_entry(b"not a zip at all", "project.json"),
        Err(Error::Corrupted)
    ));
    assert!(matches!(
        read_entry(b"PK\x03\x04 truncated", "project.json"),
        Err(Error::Corrupted)
    ));
}

#[test]
fn binary_entry_is_not_text() {
    let entries = vec![("project.json".to_string(), vec![0xff, 0xfe, 0xfd])];
    let archive = build(&entries, &ArchiveOptions::default());
    assert!(matches!(
        read_entry_to_string(&archive, "project.json"),
        Err(Error::InvalidText(_))
    ));
}

/// Overwrite the uncompressed size of the first central directory record.
fn forge_declared_size(archive: &mut [u8], size: u32) {
    let at = archive
        .windows(4)
        .position(|w| w == b"PK\x01\x02")
        .expect("central directory record");
    archive[at + 24..at + 28].copy_from_slice(&size.to_le_bytes());
}

#[test]
fn forged_declared_size_is_rejected_before_reading() {
    let entries = vec![("project.json".to_string(), br#"{"targets":[]}"#.to_vec())];
    let options = ArchiveOptions::default().compression(Compression::Stored);
    let mut archive = build(&entries, &options);
    forge_declared_size(&mut archive, 0xFFFF_FFF0);

    let err = read_entry(&archive, "project.json").unwrap_err();
    assert!(matches!(
        err,
        Error::EntryTooLarge { ref name, size } if name == "project.json" && size > MAX_ENTRY_SIZE
    ));
    assert!(read_entry_to_string(&archive, "project.json").is_err());
}
