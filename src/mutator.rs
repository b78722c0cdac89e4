use crate::api::BackupApi;
use crate::error::Error;
use crate::model::OrphanRecord;
use crate::progress::RunReporter;
use crate::report::RunReport;
use ahash::AHashSet;
use serde::Serialize;
use std::fmt;
use tracing::{error, info, warn};

/// The branch chosen for an orphan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MutationPlan {
    /// The orphan is the job's last selection.
    DisableJob,
    RemoveItem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    DryRun,
    AlreadyEmpty,
    /// Someone else already removed the entry.
    NoLongerSelected,
    /// The job was disabled earlier in this run.
    JobDisabled,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::DryRun => "dry-run",
            SkipReason::AlreadyEmpty => "already empty",
            SkipReason::NoLongerSelected => "no longer selected",
            SkipReason::JobDisabled => "job already disabled",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MutationOutcome {
    Disabled(String),
    ItemRemoved(String),
    Skipped(SkipReason),
    Failed(String),
}

/// What happened to one orphan.
#[derive(Debug, Clone, Serialize)]
pub struct MutationRecord {
    pub orphan: OrphanRecord,
    /// Selections the job held when the orphan was processed.
    pub item_count: usize,
    pub plan: Option<MutationPlan>,
    pub outcome: MutationOutcome,
}

/// Applies, or under dry-run simulates, the disable/remove decision per orphan.
///
/// The job's selection count is re-read before every decision. Under dry-run
/// the removals and disables it would have made are tracked locally so the
/// simulated decisions match a real run.
pub struct JobMutator<'a> {
    api: &'a dyn BackupApi,
    dry_run: bool,
    disabled_jobs: AHashSet<String>,
    simulated_removals: AHashSet<(String, String)>,
}

impl<'a> JobMutator<'a> {
    pub fn new(api: &'a dyn BackupApi, dry_run: bool) -> Self {
        Self {
            api,
            dry_run,
            disabled_jobs: AHashSet::new(),
            simulated_removals: AHashSet::new(),
        }
    }

    /// Process every orphan in order, recording each outcome in `report`.
    /// Stops at the first failed mutation.
    pub fn apply_all<'o>(
        &mut self,
        orphans: impl IntoIterator<Item = &'o OrphanRecord>,
        report: &mut RunReport,
        reporter: &dyn RunReporter,
    ) -> Result<(), Error> {
        let orphans: Vec<&OrphanRecord> = orphans.into_iter().collect();
        reporter.on_mutation_start(orphans.len());
        for (index, orphan) in orphans.iter().enumerate() {
            let result = self.apply(orphan, report);
            reporter.on_mutation_progress(index + 1, orphans.len());
            if result.is_err() {
                reporter.on_mutation_complete();
                return result;
            }
        }
        reporter.on_mutation_complete();
        Ok(())
    }

    pub fn apply(&mut self, orphan: &OrphanRecord, report: &mut RunReport) -> Result<(), Error> {
        if self.disabled_jobs.contains(&orphan.job_id) {
            info!(
                "Job {} was disabled earlier in this run, skipping {} {}",
                orphan.job_name, orphan.kind, orphan.veeam_item_id
            );
            report.record(MutationRecord {
                orphan: orphan.clone(),
                item_count: 0,
                plan: None,
                outcome: MutationOutcome::Skipped(SkipReason::JobDisabled),
            });
            return Ok(());
        }

        let selection = self.api.list_selected_items(&orphan.job_id)?;
        let current: Vec<_> = selection
            .items
            .into_iter()
            .filter(|item| {
                !self
                    .simulated_removals
                    .contains(&(orphan.job_id.clone(), item.veeam_item_id.clone()))
            })
            .collect();
        // users, groups and organizations still count towards the job's selections
        let item_count = current.len() + selection.other_entries;

        let skip = if item_count == 0 {
            Some(SkipReason::AlreadyEmpty)
        } else if !current
            .iter()
            .any(|item| item.veeam_item_id == orphan.veeam_item_id)
        {
            Some(SkipReason::NoLongerSelected)
        } else {
            None
        };
        if let Some(reason) = skip {
            warn!(
                "Skipping {} {} in job {}: {}",
                orphan.kind, orphan.veeam_item_id, orphan.job_name, reason
            );
            report.record(MutationRecord {
                orphan: orphan.clone(),
                item_count,
                plan: None,
                outcome: MutationOutcome::Skipped(reason),
            });
            return Ok(());
        }

        let plan = if item_count == 1 {
            MutationPlan::DisableJob
        } else {
            MutationPlan::RemoveItem
        };

        if self.dry_run {
            self.simulate(orphan, plan);
            report.record(MutationRecord {
                orphan: orphan.clone(),
                item_count,
                plan: Some(plan),
                outcome: MutationOutcome::Skipped(SkipReason::DryRun),
            });
            return Ok(());
        }

        let result = match plan {
            MutationPlan::DisableJob => self.api.disable_job(&orphan.job_id),
            MutationPlan::RemoveItem => self
                .api
                .remove_selected_item(&orphan.job_id, &orphan.veeam_item_id),
        };

        match result {
            Ok(()) => {
                let outcome = match plan {
                    MutationPlan::DisableJob => {
                        self.disabled_jobs.insert(orphan.job_id.clone());
                        info!(
                            "Job {} only has one item, it has been disabled, job will need to be manually deleted",
                            orphan.job_name
                        );
                        MutationOutcome::Disabled(orphan.job_id.clone())
                    }
                    MutationPlan::RemoveItem => {
                        info!(
                            "Removed {} {} ({}) from job {}",
                            orphan.kind,
                            orphan.directory_object_name,
                            orphan.veeam_item_id,
                            orphan.job_name
                        );
                        MutationOutcome::ItemRemoved(orphan.veeam_item_id.clone())
                    }
                };
                report.record(MutationRecord {
                    orphan: orphan.clone(),
                    item_count,
                    plan: Some(plan),
                    outcome,
                });
                Ok(())
            }
            Err(err) => {
                let message = match err {
                    Error::Mutation { message, .. } => message,
                    other => other.to_string(),
                };
                error!(
                    "Error updating job {} ({}) for {} {} ({}): {}",
                    orphan.job_name,
                    orphan.job_id,
                    orphan.kind,
                    orphan.directory_object_name,
                    orphan.directory_object_id,
                    message
                );
                report.record(MutationRecord {
                    orphan: orphan.clone(),
                    item_count,
                    plan: Some(plan),
                    outcome: MutationOutcome::Failed(message.clone()),
                });
                Err(Error::Mutation {
                    job_id: orphan.job_id.clone(),
                    job_name: orphan.job_name.clone(),
                    veeam_item_id: orphan.veeam_item_id.clone(),
                    message,
                })
            }
        }
    }

    fn simulate(&mut self, orphan: &OrphanRecord, plan: MutationPlan) {
        match plan {
            MutationPlan::DisableJob => {
                self.disabled_jobs.insert(orphan.job_id.clone());
                info!(
                    "[dry-run] Job {} only has one item, would disable it",
                    orphan.job_name
                );
            }
            MutationPlan::RemoveItem => {
                self.simulated_removals
                    .insert((orphan.job_id.clone(), orphan.veeam_item_id.clone()));
                info!(
                    "[dry-run] Would remove {} {} ({}) from job {}",
                    orphan.kind,
                    orphan.directory_object_name,
                    orphan.veeam_item_id,
                    orphan.job_name
                );
            }
        }
    }
}
