#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use vb365_cleaner::api::BackupApi;
use vb365_cleaner::model::{
    BackupJob, JobSelection, ObjectKind, Organization, ProtectableObject, SelectedItem, SyncMode,
};
use vb365_cleaner::Error;

/// Backend call as recorded by [`FakeBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListSelectedItems(String),
    RemoveSelectedItem(String, String),
    DisableJob(String),
}

#[derive(Default)]
struct State {
    organizations: Vec<Organization>,
    sites: HashMap<String, Vec<ProtectableObject>>,
    teams: HashMap<String, Vec<ProtectableObject>>,
    jobs: Vec<BackupJob>,
    items: HashMap<String, Vec<SelectedItem>>,
    /// Selected users, groups and organizations per job.
    other_entries: HashMap<String, usize>,
    calls: Vec<Call>,
    mutations: usize,
    fail_mutation_at: Option<usize>,
    fail_sites_for: Option<String>,
    fail_items_for: Option<String>,
}

/// In-memory VB365 server. Mutations change its state the way the real API would.
#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<State>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_org(self, id: &str, name: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.organizations.push(Organization {
                id: id.to_string(),
                name: name.to_string(),
            });
            state.sites.entry(id.to_string()).or_default();
            state.teams.entry(id.to_string()).or_default();
        }
        self
    }

    pub fn with_site(self, org_id: &str, site_id: &str, available: bool) -> Self {
        self.state
            .lock()
            .unwrap()
            .sites
            .entry(org_id.to_string())
            .or_default()
            .push(ProtectableObject {
                id: site_id.to_string(),
                name: format!("site {}", site_id),
                organization_id: org_id.to_string(),
                kind: ObjectKind::Site,
                available,
            });
        self
    }

    pub fn with_team(self, org_id: &str, team_id: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .teams
            .entry(org_id.to_string())
            .or_default()
            .push(ProtectableObject {
                id: team_id.to_string(),
                name: format!("team {}", team_id),
                organization_id: org_id.to_string(),
                kind: ObjectKind::Team,
                available: true,
            });
        self
    }

    /// Add a job; `items` are `(veeam_item_id, kind, directory_object_id)`.
    pub fn with_job(self, id: &str, org_id: &str, items: &[(&str, ObjectKind, &str)]) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.jobs.push(BackupJob {
                id: id.to_string(),
                name: id.to_uppercase(),
                organization_id: Some(org_id.to_string()),
                is_enabled: true,
            });
            state.items.insert(
                id.to_string(),
                items
                    .iter()
                    .map(|(veeam_id, kind, object_id)| SelectedItem {
                        veeam_item_id: veeam_id.to_string(),
                        kind: *kind,
                        directory_object_id: object_id.to_string(),
                        directory_object_name: format!("{} {}", kind, object_id),
                    })
                    .collect(),
            );
        }
        self
    }

    /// Give a job `count` selections that are neither sites nor teams.
    pub fn with_user_entries(self, job_id: &str, count: usize) -> Self {
        *self
            .state
            .lock()
            .unwrap()
            .other_entries
            .entry(job_id.to_string())
            .or_default() += count;
        self
    }

    pub fn without_job_organization(self, job_id: &str) -> Self {
        for job in self.state.lock().unwrap().jobs.iter_mut() {
            if job.id == job_id {
                job.organization_id = None;
            }
        }
        self
    }

    /// Fail the `n`th mutation call (1-based).
    pub fn fail_mutation_at(self, n: usize) -> Self {
        self.state.lock().unwrap().fail_mutation_at = Some(n);
        self
    }

    pub fn fail_sites_for(self, org_id: &str) -> Self {
        self.state.lock().unwrap().fail_sites_for = Some(org_id.to_string());
        self
    }

    pub fn fail_items_for(self, job_id: &str) -> Self {
        self.state.lock().unwrap().fail_items_for = Some(job_id.to_string());
        self
    }

    /// Delete a selection behind the cleaner's back.
    pub fn remove_item_externally(&self, job_id: &str, veeam_item_id: &str) {
        if let Some(items) = self.state.lock().unwrap().items.get_mut(job_id) {
            items.retain(|i| i.veeam_item_id != veeam_item_id);
        }
    }

    pub fn selected_ids(&self, job_id: &str) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .items
            .get(job_id)
            .map(|items| items.iter().map(|i| i.veeam_item_id.clone()).collect())
            .unwrap_or_default()
    }

    pub fn is_enabled(&self, job_id: &str) -> bool {
        self.state
            .lock()
            .unwrap()
            .jobs
            .iter()
            .any(|j| j.id == job_id && j.is_enabled)
    }

    pub fn job_exists(&self, job_id: &str) -> bool {
        self.state.lock().unwrap().jobs.iter().any(|j| j.id == job_id)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn mutation_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::ListSelectedItems(_)))
            .collect()
    }

    fn begin_mutation(state: &mut State) -> Result<(), String> {
        state.mutations += 1;
        if state.fail_mutation_at == Some(state.mutations) {
            return Err("unexpected status 500 Internal Server Error".to_string());
        }
        Ok(())
    }
}

impl BackupApi for FakeBackend {
    fn list_organizations(&self) -> Result<Vec<Organization>, Error> {
        Ok(self.state.lock().unwrap().organizations.clone())
    }

    fn list_sites(
        &self,
        organization_id: &str,
        _mode: SyncMode,
        include_unavailable: bool,
    ) -> Result<Vec<ProtectableObject>, Error> {
        let state = self.state.lock().unwrap();
        if state.fail_sites_for.as_deref() == Some(organization_id) {
            return Err(Error::fetch(
                format!("sites for organization {}", organization_id),
                "connection reset",
            ));
        }
        Ok(state
            .sites
            .get(organization_id)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|s| include_unavailable || s.available)
            .collect())
    }

    fn list_teams(
        &self,
        organization_id: &str,
        _mode: SyncMode,
    ) -> Result<Vec<ProtectableObject>, Error> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .teams
            .get(organization_id)
            .cloned()
            .unwrap_or_default())
    }

    fn list_jobs(&self) -> Result<Vec<BackupJob>, Error> {
        Ok(self.state.lock().unwrap().jobs.clone())
    }

    fn list_selected_items(&self, job_id: &str) -> Result<JobSelection, Error> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::ListSelectedItems(job_id.to_string()));
        if state.fail_items_for.as_deref() == Some(job_id) {
            return Err(Error::fetch(
                format!("selected items for job {}", job_id),
                "connection reset",
            ));
        }
        Ok(JobSelection {
            items: state.items.get(job_id).cloned().unwrap_or_default(),
            other_entries: state.other_entries.get(job_id).copied().unwrap_or_default(),
        })
    }

    fn remove_selected_item(&self, job_id: &str, veeam_item_id: &str) -> Result<(), Error> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::RemoveSelectedItem(
            job_id.to_string(),
            veeam_item_id.to_string(),
        ));
        Self::begin_mutation(&mut state).map_err(|message| Error::Mutation {
            job_id: job_id.to_string(),
            job_name: String::new(),
            veeam_item_id: veeam_item_id.to_string(),
            message,
        })?;
        if let Some(items) = state.items.get_mut(job_id) {
            items.retain(|i| i.veeam_item_id != veeam_item_id);
        }
        Ok(())
    }

    fn disable_job(&self, job_id: &str) -> Result<(), Error> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::DisableJob(job_id.to_string()));
        Self::begin_mutation(&mut state).map_err(|message| Error::Mutation {
            job_id: job_id.to_string(),
            job_name: String::new(),
            veeam_item_id: String::new(),
            message,
        })?;
        for job in state.jobs.iter_mut() {
            if job.id == job_id {
                job.is_enabled = false;
            }
        }
        Ok(())
    }
}
