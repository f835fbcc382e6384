//! Deterministic member order for reassembled projects.

use std::cmp::Ordering;

use crate::project::RetrievedFile;

/// Name of the manifest member; always sorted first.
pub const MANIFEST_FILE: &str = "project.json";

/// Sort files in place: the manifest first, then by the number before the
/// first `.` (non-numeric prefixes count as 0), then by path.
pub fn sort_files(files: &mut [RetrievedFile]) {
    files.sort_by(|a, b| compare_paths(&a.path, &b.path));
}

fn compare_paths(a: &str, b: &str) -> Ordering {
    match (a == MANIFEST_FILE, b == MANIFEST_FILE) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => numeric_prefix(a)
            .total_cmp(&numeric_prefix(b))
            .then_with(|| a.cmp(b)),
    }
}

/// Decimal value of the text before the first `.`, exponent notation
/// included, so all-digit names longer than any integer type still sort by
/// magnitude. Anything non-numeric counts as 0.
fn numeric_prefix(path: &str) -> f64 {
    let prefix = path.split('.').next().unwrap_or_default().trim();
    if prefix
        .bytes()
        .any(|b| b.is_ascii_alphabetic() && !matches!(b, b'e' | b'E'))
    {
        return 0.0;
    }
    match prefix.parse::<f64>() {
        Ok(value) if !value.is_nan() && value != 0.0 => value,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(files: &[RetrievedFile]) -> Vec<&str> {
        files.iter().map(|f| f.path.as_str()).collect()
    }

    fn files(names: &[&str]) -> Vec<RetrievedFile> {
        names
            .iter()
            .map(|name| RetrievedFile::new(*name, bytes::Bytes::new()))
            .collect()
    }

    #[test]
    fn manifest_first_then_numeric() {
        let mut list = files(&["10.png", "2.wav", "project.json", "0.svg", "1.png", "0.wav"]);
        sort_files(&mut list);
        assert_eq!(
            paths(&list),
            ["project.json", "0.svg", "0.wav", "1.png", "2.wav", "10.png"]
        );
    }

    #[test]
    fn hashes_sort_lexically() {
        let mut list = files(&[
            "cd21514d0531fdffb22204e0ec5ed84a.svg",
            "83a9787d4cb6f3b7632b4ddfebf74367.wav",
            "project.json",
            "b7853f557e4426412e64bb3da6531a99.svg",
        ]);
        sort_files(&mut list);
        assert_eq!(
            paths(&list),
            [
                "project.json",
                "83a9787d4cb6f3b7632b4ddfebf74367.wav",
                "b7853f557e4426412e64bb3da6531a99.svg",
                "cd21514d0531fdffb22204e0ec5ed84a.svg",
            ]
        );
    }

    #[test]
    fn order_does_not_depend_on_input_order() {
        let names = ["3.wav", "project.json", "0.svg", "abc.png", "1.svg", "0.png"];
        let mut forward = files(&names);
        let mut reversed = files(&names);
        reversed.reverse();

        sort_files(&mut forward);
        sort_files(&mut reversed);

        assert_eq!(paths(&forward), paths(&reversed));
        assert_eq!(forward[0].path, MANIFEST_FILE);
    }

    #[test]
    fn numeric_prefix_parsing() {
        assert_eq!(numeric_prefix("12.svg"), 12.0);
        assert_eq!(numeric_prefix("abc.svg"), 0.0);
        assert_eq!(numeric_prefix(".svg"), 0.0);
        assert_eq!(numeric_prefix("7"), 7.0);
        assert_eq!(numeric_prefix("inf.png"), 0.0);
        assert_eq!(numeric_prefix("nan.png"), 0.0);
        assert_eq!(numeric_prefix("2e3.png"), 2000.0);
    }

    #[test]
    fn all_digit_hash_sorts_by_magnitude() {
        let mut list = files(&[
            "12345678901234567890123456789012.png",
            "99.wav",
            "project.json",
            "0.svg",
        ]);
        sort_files(&mut list);
        assert_eq!(
            paths(&list),
            [
                "project.json",
                "0.svg",
                "99.wav",
                "12345678901234567890123456789012.png",
            ]
        );
    }
}
