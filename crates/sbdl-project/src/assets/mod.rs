//! Content-addressed asset deduplication.
//!
//! Planning is pure: it walks a manifest, groups every media descriptor by
//! its content identity (`hash.ext`) in first-seen order and returns one
//! [`UniqueAsset`] per identity. The loader then fetches each unique asset
//! exactly once.
//!
//! References are recorded as JSON pointers into the manifest so that the
//! sb2 planner can rewrite them in place after grouping.

mod sb2;
mod sb3;

pub use sb2::plan_sb2;
pub use sb3::plan_sb3;

use serde_json::Value;

const IMAGE_EXTENSIONS: &[&str] = &["svg", "png", "jpg", "jpeg", "bmp", "gif"];
const SOUND_EXTENSIONS: &[&str] = &["wav", "mp3"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaCategory {
    Image,
    Sound,
    Other,
}

impl MediaCategory {
    pub fn from_extension(extension: &str) -> Self {
        if IMAGE_EXTENSIONS.contains(&extension) {
            MediaCategory::Image
        } else if SOUND_EXTENSIONS.contains(&extension) {
            MediaCategory::Sound
        } else {
            MediaCategory::Other
        }
    }
}

/// One distinct piece of media and every manifest location that uses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueAsset {
    /// `hash.ext`; also the key the asset is fetched by.
    pub content_id: String,
    pub extension: String,
    pub category: MediaCategory,
    /// Sequential id within `category`, for families that number assets.
    pub allocated_id: Option<usize>,
    /// JSON pointers to the descriptors referencing this asset.
    pub references: Vec<String>,
}

impl UniqueAsset {
    fn new(content_id: String) -> Self {
        let extension = extension_of(&content_id).to_string();
        let category = MediaCategory::from_extension(&extension);
        Self {
            content_id,
            extension,
            category,
            allocated_id: None,
            references: Vec::new(),
        }
    }

    /// Archive member name: `<id>.<ext>` when numbered, else the content id.
    pub fn path(&self) -> String {
        match self.allocated_id {
            Some(id) => format!("{id}.{}", self.extension),
            None => self.content_id.clone(),
        }
    }
}

/// Text after the last `.`, or the whole string when there is none.
fn extension_of(content_id: &str) -> &str {
    content_id.rsplit('.').next().unwrap_or(content_id)
}

/// Group `(content_id, pointer)` pairs by content id, keeping first-seen order.
fn group_by_identity(descriptors: impl IntoIterator<Item = (String, String)>) -> Vec<UniqueAsset> {
    let mut index = std::collections::HashMap::new();
    let mut assets: Vec<UniqueAsset> = Vec::new();

    for (content_id, pointer) in descriptors {
        let slot = *index.entry(content_id.clone()).or_insert_with(|| {
            assets.push(UniqueAsset::new(content_id));
            assets.len() - 1
        });
        assets[slot].references.push(pointer);
    }

    assets
}

/// Array found under `key` of the value at `pointer`, if any.
fn array_at<'a>(manifest: &'a Value, pointer: &str, key: &str) -> &'a [Value] {
    manifest
        .pointer(pointer)
        .and_then(|value| value.get(key))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_from_extension() {
        assert_eq!(MediaCategory::from_extension("svg"), MediaCategory::Image);
        assert_eq!(MediaCategory::from_extension("jpeg"), MediaCategory::Image);
        assert_eq!(MediaCategory::from_extension("mp3"), MediaCategory::Sound);
        assert_eq!(MediaCategory::from_extension("json"), MediaCategory::Other);
    }

    #[test]
    fn extension_is_last_segment() {
        assert_eq!(extension_of("abc.def.png"), "png");
        assert_eq!(extension_of("noext"), "noext");
    }

    #[test]
    fn grouping_keeps_first_seen_order() {
        let assets = group_by_identity([
            ("b.wav".to_string(), "/1".to_string()),
            ("a.svg".to_string(), "/2".to_string()),
            ("b.wav".to_string(), "/3".to_string()),
        ]);

        assert_eq!(assets.len(), 2);
        assert_eq!(assets[0].content_id, "b.wav");
        assert_eq!(assets[0].references, ["/1", "/3"]);
        assert_eq!(assets[1].content_id, "a.svg");
        assert_eq!(assets[1].category, MediaCategory::Image);
    }

    #[test]
    fn path_prefers_allocated_id() {
        let mut asset = UniqueAsset::new("83a9787d4cb6f3b7632b4ddfebf74367.wav".to_string());
        assert_eq!(asset.path(), "83a9787d4cb6f3b7632b4ddfebf74367.wav");
        asset.allocated_id = Some(3);
        assert_eq!(asset.path(), "3.wav");
    }
}
