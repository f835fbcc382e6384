use serde_json::Value;
use tracing::debug;

use super::{UniqueAsset, array_at, group_by_identity};
use crate::error::{Error, Result};

/// Plan the assets of an sb3 manifest.
///
/// sb3 manifests already address assets by `md5ext`, so assets are only
/// deduplicated; the manifest is left as it is.
pub fn plan_sb3(manifest: &Value) -> Result<Vec<UniqueAsset>> {
    let targets = array_at(manifest, "", "targets").len();

    let mut descriptors = Vec::new();
    for key in ["costumes", "sounds"] {
        for target in 0..targets {
            let base = format!("/targets/{target}");
            for (index, asset) in array_at(manifest, &base, key).iter().enumerate() {
                descriptors.push((md5ext(asset)?, format!("{base}/{key}/{index}")));
            }
        }
    }

    let assets = group_by_identity(descriptors);
    debug!(unique = assets.len(), "planned sb3 assets");
    Ok(assets)
}

/// `md5ext` of an asset, rebuilt from `assetId` and `dataFormat` when absent.
fn md5ext(asset: &Value) -> Result<String> {
    if let Some(md5ext) = asset.get("md5ext").and_then(Value::as_str).filter(|s| !s.is_empty()) {
        return Ok(md5ext.to_string());
    }

    let asset_id = asset.get("assetId").and_then(Value::as_str);
    let data_format = asset.get("dataFormat").and_then(Value::as_str);
    match (asset_id, data_format) {
        (Some(asset_id), Some(data_format)) => Ok(format!("{asset_id}.{data_format}")),
        _ => Err(Error::Decode(format!(
            "asset has neither md5ext nor assetId and dataFormat: {asset}"
        ))),
    }
}
