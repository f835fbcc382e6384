use std::fmt;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Compression {
    Stored,
    #[default]
    Deflated,
}

impl Compression {
    pub(crate) fn method(self) -> zip::CompressionMethod {
        match self {
            Self::Stored => zip::CompressionMethod::Stored,
            Self::Deflated => zip::CompressionMethod::Deflated,
        }
    }
}

#[derive(Clone, Default)]
pub struct ArchiveOptions {
    pub compression: Compression,
    /// Called with the fraction of entries written so far, in `0.0..=1.0`.
    pub on_progress: Option<Arc<dyn Fn(f64) + Send + Sync>>,
}

impl fmt::Debug for ArchiveOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchiveOptions")
            .field("compression", &self.compression)
            .field("on_progress", &self.on_progress.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

impl ArchiveOptions {
    pub fn compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    pub fn on_progress(mut self, callback: Arc<dyn Fn(f64) + Send + Sync>) -> Self {
        self.on_progress = Some(callback);
        self
    }

    pub(crate) fn report(&self, fraction: f64) {
        if let Some(ref callback) = self.on_progress {
            callback(fraction.clamp(0.0, 1.0));
        }
    }
}
