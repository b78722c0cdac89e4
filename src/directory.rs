use crate::api::BackupApi;
use crate::error::Error;
use crate::model::{ObjectKind, Organization, ProtectableObject, SyncMode};
use crate::progress::RunReporter;
use ahash::{AHashMap, AHashSet};
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy)]
pub struct SnapshotOptions {
    pub sync_mode: SyncMode,
    /// Drop sites the backend reports as unavailable, so their selections become orphans.
    pub remove_unavailable: bool,
}

/// Objects of one kind within one organization.
#[derive(Debug, Clone, Serialize)]
pub struct LiveScope {
    pub organization_id: String,
    pub organization_name: String,
    pub kind: ObjectKind,
    pub objects: Vec<ProtectableObject>,
}

/// Sites and teams that currently exist, partitioned by organization and kind.
#[derive(Debug, Default)]
pub struct LiveSet {
    scopes: Vec<LiveScope>,
    scoped: AHashMap<(ObjectKind, String), AHashSet<String>>,
    global: AHashSet<(ObjectKind, String)>,
}

impl LiveSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_scope(
        &mut self,
        organization: &Organization,
        kind: ObjectKind,
        objects: Vec<ProtectableObject>,
    ) {
        let ids = self
            .scoped
            .entry((kind, organization.id.clone()))
            .or_default();
        for object in &objects {
            ids.insert(object.id.clone());
            self.global.insert((kind, object.id.clone()));
        }
        self.scopes.push(LiveScope {
            organization_id: organization.id.clone(),
            organization_name: organization.name.clone(),
            kind,
            objects,
        });
    }

    /// Membership test. With an organization the lookup is scoped to it,
    /// otherwise any organization matches.
    pub fn contains(
        &self,
        kind: ObjectKind,
        organization_id: Option<&str>,
        object_id: &str,
    ) -> bool {
        match organization_id {
            Some(org) => self
                .scoped
                .get(&(kind, org.to_string()))
                .is_some_and(|ids| ids.contains(object_id)),
            None => self.global.contains(&(kind, object_id.to_string())),
        }
    }

    pub fn scopes(&self, kind: ObjectKind) -> impl Iterator<Item = &LiveScope> {
        self.scopes.iter().filter(move |s| s.kind == kind)
    }

    pub fn count(&self, kind: ObjectKind) -> usize {
        self.scopes(kind).map(|s| s.objects.len()).sum()
    }
}

/// Build the live set from every organization's sites and teams.
///
/// Any failed listing aborts the build: a partial live set would turn
/// healthy selections into false orphans.
pub fn build_live_set(
    api: &dyn BackupApi,
    organizations: &[Organization],
    options: &SnapshotOptions,
    reporter: &dyn RunReporter,
) -> Result<LiveSet, Error> {
    if organizations.is_empty() {
        return Err(Error::fetch("organizations", "no organizations found"));
    }

    info!("Getting sites and teams for each organization");
    reporter.on_directory_start(organizations.len());
    let start = Instant::now();
    let mut live = LiveSet::new();

    for (index, org) in organizations.iter().enumerate() {
        reporter.on_organization(index + 1, organizations.len(), &org.name);

        let teams = api.list_teams(&org.id, options.sync_mode)?;

        let sites = api.list_sites(&org.id, options.sync_mode, !options.remove_unavailable)?;
        let total_sites = sites.len();
        let sites: Vec<ProtectableObject> = sites
            .into_iter()
            .filter(|s| s.available || !options.remove_unavailable)
            .collect();
        if sites.len() < total_sites {
            debug!(
                "Dropped {} unavailable sites from {}",
                total_sites - sites.len(),
                org.name
            );
        }

        debug!(
            "Organization {}: {} sites, {} teams",
            org.name,
            sites.len(),
            teams.len()
        );
        live.insert_scope(org, ObjectKind::Site, sites);
        live.insert_scope(org, ObjectKind::Team, teams);
    }

    let (sites, teams) = (live.count(ObjectKind::Site), live.count(ObjectKind::Team));
    reporter.on_directory_complete(sites, teams, start.elapsed().as_secs_f64());
    info!(
        "Found {} sites and {} teams across {} organizations",
        sites,
        teams,
        organizations.len()
    );
    Ok(live)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn org(id: &str) -> Organization {
        Organization {
            id: id.to_string(),
            name: format!("{} inc", id),
        }
    }

    fn site(id: &str, org_id: &str) -> ProtectableObject {
        ProtectableObject {
            id: id.to_string(),
            name: id.to_string(),
            organization_id: org_id.to_string(),
            kind: ObjectKind::Site,
            available: true,
        }
    }

    #[test]
    fn test_contains_is_scoped_per_organization() {
        let mut live = LiveSet::new();
        live.insert_scope(&org("acme"), ObjectKind::Site, vec![site("S1", "acme")]);
        live.insert_scope(&org("globex"), ObjectKind::Site, vec![site("S2", "globex")]);

        assert!(live.contains(ObjectKind::Site, Some("acme"), "S1"));
        assert!(!live.contains(ObjectKind::Site, Some("acme"), "S2"));
        assert!(!live.contains(ObjectKind::Site, Some("initech"), "S1"));
    }

    #[test]
    fn test_contains_without_organization_uses_global_index() {
        let mut live = LiveSet::new();
        live.insert_scope(&org("globex"), ObjectKind::Site, vec![site("S2", "globex")]);

        assert!(live.contains(ObjectKind::Site, None, "S2"));
        assert!(!live.contains(ObjectKind::Team, None, "S2"));
    }

    #[test]
    fn test_count_by_kind() {
        let mut live = LiveSet::new();
        live.insert_scope(
            &org("acme"),
            ObjectKind::Site,
            vec![site("S1", "acme"), site("S2", "acme")],
        );
        live.insert_scope(&org("acme"), ObjectKind::Team, Vec::new());

        assert_eq!(live.count(ObjectKind::Site), 2);
        assert_eq!(live.count(ObjectKind::Team), 0);
        assert_eq!(live.scopes(ObjectKind::Team).count(), 1);
    }
}
