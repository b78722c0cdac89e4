use indicatif::{ProgressBar, ProgressStyle};
use std::cell::RefCell;
use std::time::Duration;
use vb365_cleaner::RunReporter;

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// CLI progress reporter using indicatif.
///
/// - Directory and job phases: spinner with the current organization/job
/// - Mutation phase: progress bar over the orphans
pub struct CliReporter {
    bar: RefCell<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: RefCell::new(None),
        }
    }

    fn spinner(&self, message: String) {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            pb.set_style(style.tick_chars(TICK_CHARS));
        }
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(80));
        self.set_bar(pb);
    }

    fn set_bar(&self, pb: ProgressBar) {
        if let Some(old) = self.bar.borrow_mut().replace(pb) {
            old.finish_and_clear();
        }
    }

    fn finish_bar(&self) {
        if let Some(pb) = self.bar.borrow_mut().take() {
            pb.finish_and_clear();
        }
    }

    fn set_message(&self, message: String) {
        if let Some(pb) = self.bar.borrow().as_ref() {
            pb.set_message(message);
        }
    }
}

impl RunReporter for CliReporter {
    fn on_directory_start(&self, organizations: usize) {
        self.spinner(format!("Reading {} organizations...", organizations));
    }

    fn on_organization(&self, index: usize, total: usize, name: &str) {
        self.set_message(format!("Reading sites and teams [{}/{}] {}", index, total, name));
    }

    fn on_directory_complete(&self, sites: usize, teams: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Directory read: {} sites, {} teams in {:.2}s",
            sites, teams, duration_secs
        );
    }

    fn on_jobs_start(&self, jobs: usize) {
        self.spinner(format!("Reading {} jobs...", jobs));
    }

    fn on_job(&self, index: usize, total: usize, name: &str) {
        self.set_message(format!("Reading selected items [{}/{}] {}", index, total, name));
    }

    fn on_jobs_complete(&self, items: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Jobs read: {} selected sites and teams in {:.2}s",
            items, duration_secs
        );
    }

    fn on_mutation_start(&self, orphans: usize) {
        let pb = ProgressBar::new(orphans as u64);
        if let Ok(style) =
            ProgressStyle::with_template("  {spinner:.cyan} Updating jobs [{bar:30.cyan/dim}] {pos}/{len}")
        {
            pb.set_style(style.progress_chars("━╸─").tick_chars(TICK_CHARS));
        }
        self.set_bar(pb);
    }

    fn on_mutation_progress(&self, done: usize, _total: usize) {
        if let Some(pb) = self.bar.borrow().as_ref() {
            pb.set_position(done as u64);
        }
    }

    fn on_mutation_complete(&self) {
        self.finish_bar();
    }
}

impl Drop for CliReporter {
    fn drop(&mut self) {
        self.finish_bar();
    }
}
