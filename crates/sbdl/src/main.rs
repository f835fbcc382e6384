use anyhow::{Context, Result};
use clap::Parser;
use sbdl_fetch::ReqwestClient;
use sbdl_project::{LoadedProject, ProgressObserver, ProjectLoader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod tracker;

use cli::App;
use tracker::{FetchTracker, PackTracker};

#[tokio::main]
async fn main() -> Result<()> {
    let app = App::parse();
    init_tracing(&app);

    let mut config = config::load(app.config.as_deref())?;
    if let Some(max_concurrent) = app.max_concurrent {
        config = config.max_concurrent(max_concurrent);
    }

    let client = ReqwestClient::new().context("Failed to create HTTP client")?;
    let loader = ProjectLoader::new(client, config);

    let fetching = FetchTracker::new("Downloading", app.quiet);
    let project = match load_interruptible(&loader, &app, &fetching).await {
        Ok(project) => project,
        Err(e) => {
            fetching.abandon();
            return Err(e).with_context(|| format!("Failed to load project {}", app.id));
        }
    };
    fetching.finish("done");

    let path = app.output_path(&project.file_name());
    info!(path = %path.display(), kind = project.kind(), "saving project");

    let packing = PackTracker::new("Packing", app.quiet);
    let options = packing.options();
    let data = tokio::task::spawn_blocking(move || project.into_bytes(&options))
        .await
        .context("Packing task panicked")?
        .context("Failed to build project archive")?;
    packing.finish("done");

    tokio::fs::write(&path, &data)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    if !app.quiet {
        println!("Saved {}", path.display());
    }
    Ok(())
}

/// Load the requested project. Ctrl-C closes the queue: queued requests fail
/// at once and the load returns after the requests in flight finish.
async fn load_interruptible(
    loader: &ProjectLoader<ReqwestClient>,
    app: &App,
    progress: &dyn ProgressObserver,
) -> sbdl_project::Result<LoadedProject> {
    let load = loader.load_project(&app.id, &app.project_type, progress);
    tokio::pin!(load);

    tokio::select! {
        result = &mut load => result,
        _ = tokio::signal::ctrl_c() => {
            warn!("interrupted, waiting for requests in flight");
            loader.queue().close();
            load.await
        }
    }
}

fn init_tracing(app: &App) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(app.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
