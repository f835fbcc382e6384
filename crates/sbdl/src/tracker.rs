use std::sync::{Arc, LazyLock};

use indicatif::{ProgressBar, ProgressStyle};
use sbdl_archive::ArchiveOptions;
use sbdl_project::ProgressObserver;

const FETCH_STYLE: &str = concat!(
    "{spinner:.blue} {prefix:>12.cyan.bold} [{elapsed_precise}] ",
    "{wide_bar:.cyan/blue} {pos}/{len} files {wide_msg}"
);

const PACK_STYLE: &str = concat!(
    "{spinner:.blue} {prefix:>12.cyan.bold} [{elapsed_precise}] ",
    "{wide_bar:.cyan/blue} {percent:>3}% {wide_msg}"
);

const TICK: &str = "⠁⠂⠄⡀⢀⠠⠐⠈ ";

const PB_CHARS: &str = "█▓▒░  ";

static FETCH_TEMPLATE: LazyLock<Option<ProgressStyle>> = LazyLock::new(|| style(FETCH_STYLE));

static PACK_TEMPLATE: LazyLock<Option<ProgressStyle>> = LazyLock::new(|| style(PACK_STYLE));

fn style(template: &str) -> Option<ProgressStyle> {
    ProgressStyle::with_template(template)
        .ok()
        .map(|style| style.tick_chars(TICK).progress_chars(PB_CHARS))
}

fn bar(
    len: u64,
    template: &LazyLock<Option<ProgressStyle>>,
    prefix: &str,
    hidden: bool,
) -> ProgressBar {
    let pb = if hidden {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(len)
    };
    let pb = match template.as_ref() {
        Some(style) => pb.with_style(style.clone()),
        None => pb,
    };
    pb.set_length(len);
    pb.set_prefix(prefix.to_string());
    pb
}

/// Progress bar over every fetch of a load.
///
/// The total is not known up front: each new task grows the bar's length
/// and each finished one advances it.
pub struct FetchTracker {
    pb: ProgressBar,
}

impl FetchTracker {
    pub fn new(prefix: &str, hidden: bool) -> Self {
        Self {
            pb: bar(0, &FETCH_TEMPLATE, prefix, hidden),
        }
    }

    pub fn finish(&self, msg: &str) {
        self.pb.finish_with_message(msg.to_string());
    }

    pub fn abandon(&self) {
        self.pb.abandon();
    }
}

impl ProgressObserver for FetchTracker {
    fn start(&self) {
        self.pb.set_message("fetching");
    }

    fn new_task(&self) {
        self.pb.inc_length(1);
    }

    fn finish_task(&self) {
        self.pb.inc(1);
    }
}

/// Bar driven by archive writing, in percent.
pub struct PackTracker {
    pb: ProgressBar,
}

impl PackTracker {
    pub fn new(prefix: &str, hidden: bool) -> Self {
        Self {
            pb: bar(100, &PACK_TEMPLATE, prefix, hidden),
        }
    }

    /// Archive options reporting into this bar.
    pub fn options(&self) -> ArchiveOptions {
        let pb = self.pb.clone();
        ArchiveOptions::default().on_progress(Arc::new(move |fraction| {
            pb.set_position((fraction * 100.0).round() as u64);
        }))
    }

    pub fn finish(&self, msg: &str) {
        self.pb.finish_with_message(msg.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tasks_grow_and_advance_the_bar() {
        let tracker = FetchTracker::new("test", true);
        tracker.start();
        for _ in 0..3 {
            tracker.new_task();
        }
        tracker.finish_task();
        tracker.finish_task();

        assert_eq!(tracker.pb.length(), Some(3));
        assert_eq!(tracker.pb.position(), 2);
    }

    #[test]
    fn pack_options_report_percent() {
        let tracker = PackTracker::new("test", true);
        let options = tracker.options();
        let callback = options.on_progress.unwrap();

        callback(0.5);
        assert_eq!(tracker.pb.position(), 50);
        callback(1.0);
        assert_eq!(tracker.pb.position(), 100);
    }
}
