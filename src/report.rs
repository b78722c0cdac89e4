use crate::mutator::{MutationOutcome, MutationPlan, MutationRecord};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

/// Everything one run found and did.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub dry_run: bool,
    pub organizations: usize,
    pub live_sites: usize,
    pub live_teams: usize,
    pub protected_items: usize,
    pub orphans: usize,
    pub records: Vec<MutationRecord>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub disabled_jobs: usize,
    pub removed_items: usize,
    pub would_disable: usize,
    pub would_remove: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            started_at: Utc::now(),
            completed_at: None,
            dry_run,
            organizations: 0,
            live_sites: 0,
            live_teams: 0,
            protected_items: 0,
            orphans: 0,
            records: Vec::new(),
        }
    }

    pub fn record(&mut self, record: MutationRecord) {
        self.records.push(record);
    }

    pub fn finish(&mut self) {
        self.completed_at = Some(Utc::now());
    }

    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary::default();
        for record in &self.records {
            match (&record.outcome, record.plan) {
                (MutationOutcome::Disabled(_), _) => summary.disabled_jobs += 1,
                (MutationOutcome::ItemRemoved(_), _) => summary.removed_items += 1,
                (MutationOutcome::Skipped(_), Some(MutationPlan::DisableJob)) => {
                    summary.would_disable += 1
                }
                (MutationOutcome::Skipped(_), Some(MutationPlan::RemoveItem)) => {
                    summary.would_remove += 1
                }
                (MutationOutcome::Skipped(_), None) => summary.skipped += 1,
                (MutationOutcome::Failed(_), _) => summary.failed += 1,
            }
        }
        summary
    }

    pub fn log_summary(&self) {
        let s = self.summary();
        if self.dry_run {
            info!(
                dry_run = true,
                orphans = self.orphans,
                would_disable = s.would_disable,
                would_remove = s.would_remove,
                skipped = s.skipped,
                "Dry run complete, no jobs were changed"
            );
        } else {
            info!(
                orphans = self.orphans,
                disabled = s.disabled_jobs,
                removed = s.removed_items,
                skipped = s.skipped,
                failed = s.failed,
                "Cleanup complete"
            );
        }
    }
}
