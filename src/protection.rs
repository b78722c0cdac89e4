use crate::api::BackupApi;
use crate::error::Error;
use crate::model::{BackupJob, ObjectKind, ProtectedItem};
use crate::progress::RunReporter;
use std::time::Instant;
use tracing::{debug, info};

/// Every site and team selection across the enabled backup jobs.
#[derive(Debug, Default)]
pub struct ProtectedSet {
    pub jobs: Vec<BackupJob>,
    pub items: Vec<ProtectedItem>,
}

impl ProtectedSet {
    /// Items of one kind, in job listing order then selection order.
    pub fn items_of(&self, kind: ObjectKind) -> impl Iterator<Item = &ProtectedItem> {
        self.items.iter().filter(move |p| p.item.kind == kind)
    }
}

/// List the jobs and their selections, tagging each selection with its job.
///
/// Disabled jobs are skipped: they are no longer protecting anything and a
/// job this tool disabled still holds its last stale selection.
pub fn extract_protected_set(
    api: &dyn BackupApi,
    reporter: &dyn RunReporter,
) -> Result<ProtectedSet, Error> {
    info!("Getting job data");
    let all_jobs = api.list_jobs()?;
    let jobs: Vec<BackupJob> = all_jobs.into_iter().filter(|j| j.is_enabled).collect();
    info!("Got {} enabled jobs", jobs.len());

    reporter.on_jobs_start(jobs.len());
    let start = Instant::now();
    let mut items = Vec::new();

    for (index, job) in jobs.iter().enumerate() {
        reporter.on_job(index + 1, jobs.len(), &job.name);
        let selection = api.list_selected_items(&job.id)?;
        debug!(
            "Got {} selected items from job {} ({} sites or teams)",
            selection.total(),
            job.name,
            selection.items.len()
        );

        items.extend(selection.items.into_iter().map(|item| ProtectedItem {
            job_id: job.id.clone(),
            job_name: job.name.clone(),
            organization_id: job.organization_id.clone(),
            item,
        }));
    }

    reporter.on_jobs_complete(items.len(), start.elapsed().as_secs_f64());
    info!(
        "Found {} protected sites and {} protected teams",
        items.iter().filter(|p| p.item.kind == ObjectKind::Site).count(),
        items.iter().filter(|p| p.item.kind == ObjectKind::Team).count(),
    );
    Ok(ProtectedSet { jobs, items })
}
