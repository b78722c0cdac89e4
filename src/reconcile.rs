use crate::directory::LiveSet;
use crate::model::{ObjectKind, OrphanRecord};
use crate::protection::ProtectedSet;
use serde::Serialize;
use tracing::info;

/// Protected items of `kind` whose directory object is missing from the live set.
///
/// Only the id is compared, so a renamed object is not an orphan. The output
/// keeps protected-set order and one record per selection, even when two jobs
/// reference the same stale object.
pub fn reconcile(live: &LiveSet, protected: &ProtectedSet, kind: ObjectKind) -> Vec<OrphanRecord> {
    protected
        .items_of(kind)
        .filter(|p| {
            !live.contains(
                kind,
                p.organization_id.as_deref(),
                &p.item.directory_object_id,
            )
        })
        .map(OrphanRecord::from)
        .collect()
}

#[derive(Debug, Default, Serialize)]
pub struct OrphanSet {
    pub sites: Vec<OrphanRecord>,
    pub teams: Vec<OrphanRecord>,
}

impl OrphanSet {
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty() && self.teams.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sites.len() + self.teams.len()
    }

    /// Site orphans first, then team orphans; the order mutations run in.
    pub fn iter(&self) -> impl Iterator<Item = &OrphanRecord> {
        self.sites.iter().chain(self.teams.iter())
    }
}

pub fn find_orphans(live: &LiveSet, protected: &ProtectedSet) -> OrphanSet {
    info!("Checking for sites and teams to remove");
    let orphans = OrphanSet {
        sites: reconcile(live, protected, ObjectKind::Site),
        teams: reconcile(live, protected, ObjectKind::Team),
    };
    for orphan in orphans.iter() {
        info!(
            "{} {} ({}) in job {} is no longer in the directory",
            orphan.kind,
            orphan.directory_object_name,
            orphan.directory_object_id,
            orphan.job_name
        );
    }
    orphans
}
