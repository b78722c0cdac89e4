use super::wire::{
    JobDto, OrganizationDto, Page, SelectedItemDto, SiteDto, TeamDto, TokenResponse,
};
use super::BackupApi;
use crate::config::AppConfig;
use crate::error::Error;
use crate::model::{BackupJob, JobSelection, Organization, ProtectableObject, SyncMode};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

const PAGE_SIZE: usize = 500;

/// Status the server answers with when a job mutation is applied.
const MUTATION_OK: StatusCode = StatusCode::NO_CONTENT;

/// Blocking client for the VB365 REST API, holding one authenticated session.
pub struct RestClient {
    client: Client,
    base_url: String,
    token: String,
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl RestClient {
    /// Log in with the password grant and keep the bearer token for later calls.
    pub fn login(config: &AppConfig, password: &str) -> Result<Self, Error> {
        let client = Client::builder()
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| Error::Auth(e.to_string()))?;
        let base_url = config.base_url();

        let resp = client
            .post(format!("{}/Token", base_url))
            .form(&[
                ("grant_type", "password"),
                ("username", config.username.as_str()),
                ("password", password),
            ])
            .send()
            .map_err(|e| Error::Auth(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(Error::Auth(format!(
                "{} answered {}",
                config.vb365_address,
                resp.status()
            )));
        }
        let token: TokenResponse = resp.json().map_err(|e| Error::Auth(e.to_string()))?;

        info!("Logged in to {} as {}", config.vb365_address, config.username);
        Ok(Self {
            client,
            base_url,
            token: token.access_token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        what: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, Error> {
        debug!("GET {} {:?}", path, query);
        let resp = self
            .client
            .get(self.url(path))
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .map_err(|e| Error::fetch(what, e))?;
        let status = resp.status();
        let body = resp.bytes().map_err(|e| Error::fetch(what, e))?;
        fetch_status(what, status, &String::from_utf8_lossy(&body))?;
        parse_body(what, &body)
    }

    /// Walk `offset`/`limit` pages for as long as the server says more follow.
    fn get_paged<T: DeserializeOwned>(
        &self,
        what: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, Error> {
        let mut all = Vec::new();
        let mut offset = 0usize;
        loop {
            let mut page_query = query.to_vec();
            page_query.push(("offset", offset.to_string()));
            page_query.push(("limit", PAGE_SIZE.to_string()));

            let page: Page<T> = self.get_json(what, path, &page_query)?;
            let more = page.has_more(PAGE_SIZE);
            offset += page.results.len();
            all.extend(page.results);
            if !more {
                break;
            }
        }
        Ok(all)
    }

    fn send_mutation(
        &self,
        request: RequestBuilder,
        job_id: &str,
        veeam_item_id: &str,
    ) -> Result<(), Error> {
        let resp: Response = request
            .bearer_auth(&self.token)
            .send()
            .map_err(|e| mutation_error(job_id, veeam_item_id, e.to_string()))?;
        let status = resp.status();
        let body = resp.text().unwrap_or_default();
        mutation_status(job_id, veeam_item_id, status, &body)
    }
}

fn mutation_error(job_id: &str, veeam_item_id: &str, message: String) -> Error {
    Error::Mutation {
        job_id: job_id.to_string(),
        job_name: String::new(),
        veeam_item_id: veeam_item_id.to_string(),
        message,
    }
}

/// Only `204 No Content` means the job was changed.
fn mutation_status(
    job_id: &str,
    veeam_item_id: &str,
    status: StatusCode,
    body: &str,
) -> Result<(), Error> {
    if status == MUTATION_OK {
        return Ok(());
    }
    Err(mutation_error(
        job_id,
        veeam_item_id,
        format!("unexpected status {}: {}", status, body.trim()),
    ))
}

fn fetch_status(what: &str, status: StatusCode, body: &str) -> Result<(), Error> {
    if status.is_success() {
        return Ok(());
    }
    Err(Error::fetch(
        what,
        format!("unexpected status {}: {}", status, body.trim()),
    ))
}

fn parse_body<T: DeserializeOwned>(what: &str, body: &[u8]) -> Result<T, Error> {
    serde_json::from_slice(body).map_err(|e| Error::fetch(what, e))
}

impl BackupApi for RestClient {
    fn list_organizations(&self) -> Result<Vec<Organization>, Error> {
        let orgs: Vec<OrganizationDto> = self.get_json("organizations", "Organizations", &[])?;
        Ok(orgs.into_iter().map(Organization::from).collect())
    }

    fn list_sites(
        &self,
        organization_id: &str,
        mode: SyncMode,
        include_unavailable: bool,
    ) -> Result<Vec<ProtectableObject>, Error> {
        let what = format!("sites for organization {}", organization_id);
        let sites: Vec<SiteDto> = self.get_paged(
            &what,
            &format!("Organizations/{}/Sites", organization_id),
            &[("dataSource", mode.as_query_value().to_string())],
        )?;
        Ok(sites
            .into_iter()
            .filter(|s| include_unavailable || s.is_available)
            .map(|s| s.into_object(organization_id))
            .collect())
    }

    fn list_teams(
        &self,
        organization_id: &str,
        mode: SyncMode,
    ) -> Result<Vec<ProtectableObject>, Error> {
        let what = format!("teams for organization {}", organization_id);
        let teams: Vec<TeamDto> = self.get_paged(
            &what,
            &format!("Organizations/{}/Teams", organization_id),
            &[("dataSource", mode.as_query_value().to_string())],
        )?;
        Ok(teams
            .into_iter()
            .map(|t| t.into_object(organization_id))
            .collect())
    }

    fn list_jobs(&self) -> Result<Vec<BackupJob>, Error> {
        let jobs: Vec<JobDto> = self.get_json("jobs", "Jobs", &[])?;
        Ok(jobs.into_iter().map(BackupJob::from).collect())
    }

    fn list_selected_items(&self, job_id: &str) -> Result<JobSelection, Error> {
        let what = format!("selected items for job {}", job_id);
        let items: Vec<SelectedItemDto> =
            self.get_json(&what, &format!("Jobs/{}/SelectedItems", job_id), &[])?;
        Ok(JobSelection::from(items))
    }

    fn remove_selected_item(&self, job_id: &str, veeam_item_id: &str) -> Result<(), Error> {
        let request = self
            .client
            .delete(self.url(&format!("Jobs/{}/SelectedItems", job_id)))
            .query(&[("ids", veeam_item_id)]);
        self.send_mutation(request, job_id, veeam_item_id)
    }

    fn disable_job(&self, job_id: &str) -> Result<(), Error> {
        let request = self.client.post(self.url(&format!("Jobs/{}/disable", job_id)));
        self.send_mutation(request, job_id, "")
    }
}
