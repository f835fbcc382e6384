//! Project loading: fetch, classify, resolve assets, reassemble.

use bytes::Bytes;
use futures_util::future::try_join_all;
use sbdl_fetch::{FetchQueue, HttpClient, Response};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::assets::{UniqueAsset, plan_sb2, plan_sb3};
use crate::config::{Endpoints, LoaderConfig};
use crate::detect::{Manifest, detect};
use crate::error::{Error, Result};
use crate::order::{MANIFEST_FILE, sort_files};
use crate::progress::{ProgressObserver, TaskGuard};
use crate::project::{LoadedProject, ProjectType, RetrievedFile};

#[derive(Debug, Deserialize)]
struct ProjectMetadata {
    #[serde(default)]
    project_token: Option<String>,
}

/// Loads projects by id through a shared [`FetchQueue`].
///
/// One loader may serve any number of concurrent loads; they all share the
/// queue's concurrency cap.
pub struct ProjectLoader<C: HttpClient> {
    queue: FetchQueue<C>,
    endpoints: Endpoints,
}

impl<C: HttpClient> ProjectLoader<C> {
    pub fn new(client: C, config: LoaderConfig) -> Self {
        Self {
            queue: FetchQueue::with_max_concurrent(client, config.max_concurrent),
            endpoints: config.endpoints,
        }
    }

    pub fn queue(&self) -> &FetchQueue<C> {
        &self.queue
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Load project `id` of the family named by `project_type`
    /// (`"sb"`, `"sb2"` or `"sb3"`).
    ///
    /// An unknown family fails before anything is fetched.
    pub async fn load_project(
        &self,
        id: &str,
        project_type: &str,
        progress: &dyn ProgressObserver,
    ) -> Result<LoadedProject> {
        let project_type = project_type.parse::<ProjectType>()?;
        self.load(id, project_type, progress).await
    }

    pub async fn load_sb1(
        &self,
        id: &str,
        progress: &dyn ProgressObserver,
    ) -> Result<LoadedProject> {
        self.load(id, ProjectType::Sb, progress).await
    }

    pub async fn load_sb2(
        &self,
        id: &str,
        progress: &dyn ProgressObserver,
    ) -> Result<LoadedProject> {
        self.load(id, ProjectType::Sb2, progress).await
    }

    pub async fn load_sb3(
        &self,
        id: &str,
        progress: &dyn ProgressObserver,
    ) -> Result<LoadedProject> {
        self.load(id, ProjectType::Sb3, progress).await
    }

    pub async fn load(
        &self,
        id: &str,
        project_type: ProjectType,
        progress: &dyn ProgressObserver,
    ) -> Result<LoadedProject> {
        info!(id, %project_type, "loading project");
        progress.start();
        let _task = TaskGuard::begin(progress);

        let data = match project_type {
            ProjectType::Sb | ProjectType::Sb2 => {
                self.fetch_ok(&self.endpoints.legacy_project_url(id)).await?.into_bytes()
            }
            ProjectType::Sb3 => self.fetch_project_data_with_token(id).await?.into_bytes(),
        };

        let manifest = detect(project_type, data)?;
        debug!(id, detected = %manifest.project_type(), "classified project payload");

        let project = match manifest {
            Manifest::Legacy(data) => buffer(id, ProjectType::Sb, data),
            Manifest::Sb2Binary(data) => buffer(id, ProjectType::Sb2, data),
            Manifest::Sb2Json(manifest) => self.reassemble_sb2(id, manifest, progress).await?,
            Manifest::Sb3Json(manifest) => self.reassemble_sb3(id, manifest, progress).await?,
        };

        info!(id, kind = project.kind(), extension = %project.extension(), "project loaded");
        Ok(project)
    }

    async fn reassemble_sb2(
        &self,
        id: &str,
        mut manifest: Value,
        progress: &dyn ProgressObserver,
    ) -> Result<LoadedProject> {
        let assets = plan_sb2(&mut manifest)?;
        let mut files = self.fetch_assets(ProjectType::Sb2, &assets, progress).await?;

        // Serialized after planning, which renumbered the asset ids.
        files.push(RetrievedFile::new(MANIFEST_FILE, serde_json::to_vec(&manifest)?));
        sort_files(&mut files);

        Ok(LoadedProject::Zip {
            title: id.to_string(),
            extension: ProjectType::Sb2,
            files,
        })
    }

    async fn reassemble_sb3(
        &self,
        id: &str,
        manifest: Value,
        progress: &dyn ProgressObserver,
    ) -> Result<LoadedProject> {
        let assets = plan_sb3(&manifest)?;
        let mut files = vec![RetrievedFile::new(MANIFEST_FILE, serde_json::to_vec(&manifest)?)];
        files.extend(self.fetch_assets(ProjectType::Sb3, &assets, progress).await?);
        sort_files(&mut files);

        Ok(LoadedProject::Zip {
            title: id.to_string(),
            extension: ProjectType::Sb3,
            files,
        })
    }

    /// Fetch every asset once. The first failure drops the remaining
    /// fetches, which releases their queue slots and finishes their tasks.
    async fn fetch_assets(
        &self,
        project_type: ProjectType,
        assets: &[UniqueAsset],
        progress: &dyn ProgressObserver,
    ) -> Result<Vec<RetrievedFile>> {
        debug!(count = assets.len(), "fetching assets");
        try_join_all(
            assets
                .iter()
                .map(|asset| self.fetch_asset(project_type, asset, progress)),
        )
        .await
    }

    async fn fetch_asset(
        &self,
        project_type: ProjectType,
        asset: &UniqueAsset,
        progress: &dyn ProgressObserver,
    ) -> Result<RetrievedFile> {
        let _task = TaskGuard::begin(progress);
        let url = match project_type {
            ProjectType::Sb3 => self.endpoints.sb3_asset_url(&asset.content_id),
            ProjectType::Sb | ProjectType::Sb2 => self.endpoints.sb2_asset_url(&asset.content_id),
        };
        let data = self.fetch_ok(&url).await?.into_bytes();
        Ok(RetrievedFile::new(asset.path(), data))
    }

    /// Look up the access token of project `id`.
    ///
    /// Fails with [`Error::AccessDenied`] when the metadata service does not
    /// know the project, which usually means it is unshared or never existed.
    pub async fn fetch_token(&self, id: &str) -> Result<Option<String>> {
        let response = self.queue.submit(&self.endpoints.metadata_url(id)).await?;
        if response.status() == 404 {
            return Err(Error::AccessDenied(id.to_string()));
        }

        let metadata: ProjectMetadata = response
            .error_for_status()?
            .json()
            .map_err(|e| Error::Decode(format!("invalid metadata for project {id}: {e}")))?;
        Ok(metadata.project_token.filter(|token| !token.is_empty()))
    }

    /// Fetch the current manifest of project `id`, authorized with its token
    /// when one can be obtained. Token failures are logged and ignored.
    ///
    /// A 404 becomes [`Error::ProjectNotFound`], which records whether the
    /// metadata lookup before it succeeded.
    pub async fn fetch_project_data_with_token(&self, id: &str) -> Result<Response> {
        let (token, metadata_accessible) = match self.fetch_token(id).await {
            Ok(token) => (token, true),
            Err(e) => {
                warn!(id, error = %e, "could not fetch project token, continuing without it");
                (None, false)
            }
        };

        let response = self
            .queue
            .submit(&self.endpoints.project_url(id, token.as_deref()))
            .await?;
        if response.status() == 404 {
            return Err(Error::ProjectNotFound {
                id: id.to_string(),
                metadata_accessible,
            });
        }
        Ok(response.error_for_status()?)
    }

    async fn fetch_ok(&self, url: &str) -> Result<Response> {
        Ok(self.queue.submit(url).await?.error_for_status()?)
    }
}

fn buffer(id: &str, extension: ProjectType, data: Bytes) -> LoadedProject {
    LoadedProject::Buffer {
        title: id.to_string(),
        extension,
        data,
    }
}
