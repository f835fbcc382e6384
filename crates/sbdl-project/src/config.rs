use serde::{Deserialize, Serialize};

use sbdl_fetch::DEFAULT_MAX_CONCURRENT;

/// Base URLs of the services a project is assembled from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// Serves complete legacy and sb2 project bodies at `<base>/<id>/get/`.
    pub legacy_projects: String,
    /// Serves current manifests at `<base>/<id>`.
    pub projects: String,
    /// Serves sb2 assets at `<base>/<md5ext>/get/`.
    pub sb2_assets: String,
    /// Serves sb3 assets at `<base>/<md5ext>/get/`.
    pub sb3_assets: String,
    /// Serves project metadata (and its access token) at `<base>/<id>`.
    pub metadata: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            legacy_projects: "https://projects.scratch.mit.edu/internalapi/project".to_string(),
            projects: "https://projects.scratch.mit.edu".to_string(),
            sb2_assets: "https://cdn.assets.scratch.mit.edu/internalapi/asset".to_string(),
            sb3_assets: "https://assets.scratch.mit.edu/internalapi/asset".to_string(),
            metadata: "https://trampoline.turbowarp.org/proxy/projects".to_string(),
        }
    }
}

impl Endpoints {
    pub fn legacy_project_url(&self, id: &str) -> String {
        format!("{}/{id}/get/", trim(&self.legacy_projects))
    }

    pub fn project_url(&self, id: &str, token: Option<&str>) -> String {
        match token {
            Some(token) => format!("{}/{id}?token={token}", trim(&self.projects)),
            None => format!("{}/{id}", trim(&self.projects)),
        }
    }

    pub fn metadata_url(&self, id: &str) -> String {
        format!("{}/{id}", trim(&self.metadata))
    }

    pub fn sb2_asset_url(&self, md5ext: &str) -> String {
        format!("{}/{md5ext}/get/", trim(&self.sb2_assets))
    }

    pub fn sb3_asset_url(&self, md5ext: &str) -> String {
        format!("{}/{md5ext}/get/", trim(&self.sb3_assets))
    }
}

fn trim(base: &str) -> &str {
    base.trim_end_matches('/')
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Cap on simultaneous requests.
    pub max_concurrent: usize,
    pub endpoints: Endpoints,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            endpoints: Endpoints::default(),
        }
    }
}

impl LoaderConfig {
    pub fn max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }

    pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_urls() {
        let endpoints = Endpoints::default();
        assert_eq!(
            endpoints.legacy_project_url("123"),
            "https://projects.scratch.mit.edu/internalapi/project/123/get/"
        );
        assert_eq!(
            endpoints.sb3_asset_url("abc.svg"),
            "https://assets.scratch.mit.edu/internalapi/asset/abc.svg/get/"
        );
        assert_eq!(
            endpoints.metadata_url("9"),
            "https://trampoline.turbowarp.org/proxy/projects/9"
        );
    }

    #[test]
    fn token_is_appended_only_when_present() {
        let endpoints = Endpoints::default();
        assert_eq!(endpoints.project_url("9", None), "https://projects.scratch.mit.edu/9");
        assert_eq!(
            endpoints.project_url("9", Some("t0k")),
            "https://projects.scratch.mit.edu/9?token=t0k"
        );
    }

    #[test]
    fn trailing_slash_is_ignored() {
        let endpoints = Endpoints {
            sb2_assets: "http://mirror/asset/".to_string(),
            ..Default::default()
        };
        assert_eq!(endpoints.sb2_asset_url("x.wav"), "http://mirror/asset/x.wav/get/");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: LoaderConfig = toml::from_str(
            r#"
            max_concurrent = 8

            [endpoints]
            projects = "http://localhost:8080"
            "#,
        )
        .unwrap();

        assert_eq!(config.max_concurrent, 8);
        assert_eq!(config.endpoints.projects, "http://localhost:8080");
        assert_eq!(config.endpoints.sb3_assets, Endpoints::default().sb3_assets);
    }

    #[test]
    fn default_cap_matches_queue() {
        assert_eq!(LoaderConfig::default().max_concurrent, 30);
    }
}
