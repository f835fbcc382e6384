use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};

#[derive(Clone, Debug, Parser)]
#[command(
    name = "sbdl",
    version = env!("CARGO_PKG_VERSION"),
    about = "Download Scratch projects by id",
    long_about = None
)]
pub struct App {
    /// Project id, as it appears in the project page URL.
    pub id: String,

    /// Project family: sb, sb2 or sb3.
    #[arg(short = 't', long = "type", default_value = "sb3")]
    pub project_type: String,

    /// Output file, or a directory to save `<id>.<extension>` into.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Config file; defaults to `~/.config/sbdl/config.toml` when present.
    #[arg(short, long, env = "SBDL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Maximum number of simultaneous requests.
    #[arg(long)]
    pub max_concurrent: Option<usize>,

    /// Hide the progress bars.
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl App {
    /// Where to save a project whose suggested name is `file_name`.
    pub fn output_path(&self, file_name: &str) -> PathBuf {
        match self.output.as_deref() {
            Some(path) if path.is_dir() => path.join(file_name),
            Some(path) => path.to_path_buf(),
            None => Path::new(file_name).to_path_buf(),
        }
    }

    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
