/// Trait for reporting run progress.
///
/// The CLI implements it with indicatif spinners. All methods have default
/// no-op implementations.
pub trait RunReporter {
    fn on_directory_start(&self, _organizations: usize) {}
    fn on_organization(&self, _index: usize, _total: usize, _name: &str) {}
    fn on_directory_complete(&self, _sites: usize, _teams: usize, _duration_secs: f64) {}
    fn on_jobs_start(&self, _jobs: usize) {}
    fn on_job(&self, _index: usize, _total: usize, _name: &str) {}
    fn on_jobs_complete(&self, _items: usize, _duration_secs: f64) {}
    fn on_mutation_start(&self, _orphans: usize) {}
    fn on_mutation_progress(&self, _done: usize, _total: usize) {}
    fn on_mutation_complete(&self) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl RunReporter for SilentReporter {}
