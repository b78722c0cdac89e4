use crate::api::BackupApi;
use crate::directory::{self, SnapshotOptions};
use crate::dump::SnapshotWriter;
use crate::error::Error;
use crate::model::ObjectKind;
use crate::mutator::JobMutator;
use crate::progress::RunReporter;
use crate::protection;
use crate::reconcile;
use crate::report::RunReport;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub snapshot: SnapshotOptions,
    pub dry_run: bool,
}

pub struct CleanupEngine<'a> {
    api: &'a dyn BackupApi,
    options: RunOptions,
    snapshot_root: Option<PathBuf>,
}

impl<'a> CleanupEngine<'a> {
    pub fn new(api: &'a dyn BackupApi, options: RunOptions) -> Self {
        Self {
            api,
            options,
            snapshot_root: None,
        }
    }

    /// Save diagnostic snapshots under `root`.
    pub fn with_snapshot_dir(mut self, root: impl Into<PathBuf>) -> Self {
        self.snapshot_root = Some(root.into());
        self
    }

    /// Run one reconciliation pass:
    /// 1. List organizations and build the live set
    /// 2. Collect the protected set from enabled jobs
    /// 3. Compute orphans
    /// 4. Disable or trim the owning jobs, stopping at the first failure
    pub fn run(&self, reporter: &dyn RunReporter) -> Result<RunReport, Error> {
        let writer = match &self.snapshot_root {
            Some(root) => Some(SnapshotWriter::create(root)?),
            None => None,
        };
        let mut report = RunReport::new(self.options.dry_run);

        let organizations = self.api.list_organizations()?;
        let names: Vec<&str> = organizations.iter().map(|o| o.name.as_str()).collect();
        info!("Found {} organizations: {:?}", organizations.len(), names);
        report.organizations = organizations.len();
        if let Some(w) = &writer {
            w.write_json("organizations.json", &organizations)?;
        }

        let live = directory::build_live_set(
            self.api,
            &organizations,
            &self.options.snapshot,
            reporter,
        )?;
        report.live_sites = live.count(ObjectKind::Site);
        report.live_teams = live.count(ObjectKind::Team);
        if let Some(w) = &writer {
            let sites: Vec<_> = live.scopes(ObjectKind::Site).collect();
            let teams: Vec<_> = live.scopes(ObjectKind::Team).collect();
            w.write_json("live_sites.json", &sites)?;
            w.write_json("live_teams.json", &teams)?;
        }

        let protected = protection::extract_protected_set(self.api, reporter)?;
        report.protected_items = protected.items.len();
        if let Some(w) = &writer {
            w.write_json("protected_items.json", &protected.items)?;
        }

        let orphans = reconcile::find_orphans(&live, &protected);
        report.orphans = orphans.len();
        if let Some(w) = &writer {
            w.write_json("orphan_sites.json", &orphans.sites)?;
            w.write_json("orphan_teams.json", &orphans.teams)?;
            w.write_orphans_csv("orphans.csv", orphans.iter())?;
        }

        if orphans.is_empty() {
            info!("No teams or sites to remove");
            report.finish();
            if let Some(w) = &writer {
                w.write_json("report.json", &report)?;
            }
            return Ok(report);
        }

        if self.options.dry_run {
            info!("Dry run enabled, no jobs will be changed");
        } else {
            info!("Removing {} stale selections from jobs", orphans.len());
        }
        let mut mutator = JobMutator::new(self.api, self.options.dry_run);
        let outcome = mutator.apply_all(orphans.iter(), &mut report, reporter);

        report.finish();
        report.log_summary();
        if let Some(w) = &writer {
            w.write_json("report.json", &report)?;
            info!("Snapshots saved to {}", w.dir().display());
        }
        outcome?;

        Ok(report)
    }
}
