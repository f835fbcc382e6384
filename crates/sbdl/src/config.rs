use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use home::home_dir;
use sbdl_project::LoaderConfig;

/// `~/.config/sbdl/config.toml`, if a home directory can be found.
pub fn default_path() -> Option<PathBuf> {
    home_dir().map(|home| home.join(".config").join("sbdl").join("config.toml"))
}

/// Read the loader config.
///
/// An explicit path must exist. The default path is optional, and
/// built-in defaults are used when it is missing.
pub fn load(explicit: Option<&Path>) -> Result<LoaderConfig> {
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => match default_path() {
            Some(path) => (path, false),
            None => return Ok(LoaderConfig::default()),
        },
    };

    match std::fs::read_to_string(&path) {
        Ok(text) => {
            parse(&text).with_context(|| format!("Failed to parse config {}", path.display()))
        }
        Err(e) if !required && e.kind() == ErrorKind::NotFound => Ok(LoaderConfig::default()),
        Err(e) => Err(e).with_context(|| format!("Failed to read config {}", path.display())),
    }
}

fn parse(text: &str) -> Result<LoaderConfig> {
    Ok(toml::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_default() {
        assert_eq!(parse("").unwrap(), LoaderConfig::default());
    }

    #[test]
    fn overrides_are_merged_with_defaults() {
        let config = parse(
            r#"
            max_concurrent = 5

            [endpoints]
            sb3_assets = "http://127.0.0.1:9000/asset"
            "#,
        )
        .unwrap();
        assert_eq!(config.max_concurrent, 5);
        assert_eq!(
            config.endpoints.sb3_asset_url("a.svg"),
            "http://127.0.0.1:9000/asset/a.svg/get/"
        );
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(parse("max_concurrent = \"many\"").is_err());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let missing = std::env::temp_dir().join("sbdl-no-such-config.toml");
        assert!(load(Some(&missing)).is_err());
    }

    #[test]
    fn default_path_lives_under_home() {
        if let Some(path) = default_path() {
            assert!(path.ends_with(".config/sbdl/config.toml"));
        }
    }
}
