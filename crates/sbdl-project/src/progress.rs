//! Progress reporting hooks.
//!
//! An observer is handed to each load call, so unrelated loads running side
//! by side report to their own observers. The loader only promises call
//! order: `start` comes before any `new_task`, and every `new_task` is
//! matched by exactly one `finish_task`, whether the unit succeeded, failed,
//! or was abandoned because a sibling failed.

/// Receives progress events from a project load.
///
/// All methods default to no-ops; implementors aggregate however they like.
pub trait ProgressObserver: Send + Sync {
    /// A top-level load has started.
    fn start(&self) {}

    /// A unit of work (manifest or asset fetch) has started.
    fn new_task(&self) {}

    /// A unit of work has finished, successfully or not.
    fn finish_task(&self) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {}

/// Scoped unit of work: reports `new_task` when created and `finish_task`
/// when dropped.
#[must_use = "the task finishes as soon as the guard is dropped"]
pub struct TaskGuard<'a> {
    observer: &'a dyn ProgressObserver,
}

impl<'a> TaskGuard<'a> {
    pub fn begin(observer: &'a dyn ProgressObserver) -> Self {
        observer.new_task();
        Self { observer }
    }
}

impl Drop for TaskGuard<'_> {
    fn drop(&mut self) {
        self.observer.finish_task();
    }
}
