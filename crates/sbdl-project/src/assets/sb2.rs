use serde_json::Value;
use tracing::debug;

use super::{MediaCategory, UniqueAsset, array_at, group_by_identity};
use crate::error::{Error, Result};

/// Hash fields a descriptor may carry, most specific first.
const HASH_FIELDS: &[&str] = &["md5", "baseLayerMD5", "penLayerMD5"];

/// Id fields rewritten to the allocated id.
const ID_FIELDS: &[&str] = &["baseLayerID", "soundID", "penLayerID"];

/// Plan the assets of an sb2 manifest and renumber its references.
///
/// Downloaded sb2 manifests carry stale or placeholder (`-1`) ids, so every
/// distinct asset gets a fresh id, counting images and sounds separately
/// from 0 in first-seen order, and every reference is rewritten to it.
pub fn plan_sb2(manifest: &mut Value) -> Result<Vec<UniqueAsset>> {
    let descriptors = descriptor_pointers(manifest)
        .into_iter()
        .map(|pointer| {
            let content_id = manifest
                .pointer(&pointer)
                .map(content_identity)
                .unwrap_or_default();
            (content_id, pointer)
        })
        .collect::<Vec<_>>();

    let mut assets = group_by_identity(descriptors);

    let (mut images, mut sounds) = (0, 0);
    for asset in &mut assets {
        let counter = match asset.category {
            MediaCategory::Image => &mut images,
            MediaCategory::Sound => &mut sounds,
            MediaCategory::Other => return Err(Error::UnknownExtension(asset.extension.clone())),
        };
        asset.allocated_id = Some(*counter);
        *counter += 1;
    }

    for asset in &assets {
        for pointer in &asset.references {
            if let Some(reference) = manifest.pointer_mut(pointer).and_then(Value::as_object_mut) {
                for field in ID_FIELDS {
                    if let Some(id) = reference.get_mut(*field) {
                        *id = Value::from(asset.allocated_id);
                    }
                }
            }
        }
    }

    debug!(images, sounds, "planned sb2 assets");
    Ok(assets)
}

/// Pointers to every media descriptor: costumes of every sprite, then sounds
/// of every sprite, then the stage itself for its pen layer. A stage without
/// a pen layer hash is skipped; coercing the whole manifest to a content id
/// could never name a real asset.
///
/// Sprites are the stage plus its children, minus list and variable
/// watchers, which are recognisable by a `listName` or `target` field.
fn descriptor_pointers(manifest: &Value) -> Vec<String> {
    let mut sprites = vec![String::new()];
    for (index, child) in array_at(manifest, "", "children").iter().enumerate() {
        if is_truthy(child.get("listName")) || is_truthy(child.get("target")) {
            continue;
        }
        sprites.push(format!("/children/{index}"));
    }

    let mut pointers = Vec::new();
    for key in ["costumes", "sounds"] {
        for sprite in &sprites {
            let count = array_at(manifest, sprite, key).len();
            pointers.extend((0..count).map(|index| format!("{sprite}/{key}/{index}")));
        }
    }
    if explicit_hash(manifest).is_some() {
        pointers.push(String::new());
    }
    pointers
}

fn content_identity(descriptor: &Value) -> String {
    explicit_hash(descriptor)
        .map(str::to_string)
        .unwrap_or_else(|| descriptor.to_string())
}

fn explicit_hash(descriptor: &Value) -> Option<&str> {
    HASH_FIELDS
        .iter()
        .filter_map(|field| descriptor.get(*field).and_then(Value::as_str))
        .find(|hash| !hash.is_empty())
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(_) => true,
    }
}
