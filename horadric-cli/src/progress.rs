//! Progress bar for import phases.

use horadric_import::ImportProgress;
use indicatif::{ProgressBar, ProgressStyle};

/// Shows one bar per phase, reset at every phase boundary.
pub(crate) struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    /// When `quiet` is true the bar is hidden; phase messages still go to
    /// the log.
    pub(crate) fn new(quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(0)
        };
        let style = ProgressStyle::with_template(
            "  {spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}",
        )
        .expect("static pattern")
        .progress_chars("=> ")
        .tick_chars("/-\\|");
        bar.set_style(style);
        Self { bar }
    }
}

impl ImportProgress for BarProgress {
    fn on_item(&self, current: usize, total: usize, name: &str) {
        if self.bar.length() != Some(total as u64) {
            self.bar.set_length(total as u64);
        }
        self.bar.set_position(current as u64);
        self.bar.set_message(name.to_string());
    }

    fn on_phase(&self, message: &str) {
        self.bar.reset();
        self.bar.set_length(0);
        self.bar.set_message("");
        self.bar.suspend(|| log::info!("{message}"));
    }

    fn on_complete(&self, message: &str) {
        self.bar.finish_and_clear();
        log::info!("{message}");
    }
}
