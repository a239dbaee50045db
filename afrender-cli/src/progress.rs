//! Terminal progress for `afrender run`.
//!
//! The bar draws on stderr and hides itself when stderr is not a terminal.
//! Markers go to stdout, or to stderr in `--json` mode so stdout stays
//! machine-readable.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use afrender_batch::{BatchSummary, ProgressObserver, RecordOutcome};
use afrender_core::Record;

const BAR_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

pub struct BarObserver {
    bar: ProgressBar,
    markers_to_stderr: bool,
}

impl BarObserver {
    pub fn new(markers_to_stderr: bool) -> Self {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░");
        bar.set_style(style);
        Self {
            bar,
            markers_to_stderr,
        }
    }

    fn marker(&self, line: String) {
        let to_stderr = self.markers_to_stderr;
        self.bar.suspend(|| {
            if to_stderr {
                eprintln!("{line}");
            } else {
                println!("{line}");
            }
        });
    }
}

impl ProgressObserver for BarObserver {
    fn on_start(&mut self, record: &Record, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_message(format!("{} (row {})", record.id, record.index));
    }

    fn on_finish(&mut self, outcome: &RecordOutcome, _done: usize, _total: usize) {
        if let Some(err) = &outcome.error {
            self.marker(format!(
                "{} Error processing {}: {} failed: {}",
                "✗".red().bold(),
                outcome.id,
                err.stage,
                err.source
            ));
        }
        self.bar.inc(1);
    }

    fn on_complete(&mut self, summary: &BatchSummary) {
        self.bar.finish_and_clear();
        self.marker(format!(
            "{} Completed: {} processed, {} succeeded, {} failed",
            "✓".green().bold(),
            summary.total,
            summary.succeeded,
            summary.failed
        ));
    }
}
