//! JSON shapes returned by the VB365 REST API.

use crate::model::{
    BackupJob, JobSelection, ObjectKind, Organization, ProtectableObject, SelectedItem,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

/// Envelope of paged listings such as sites and teams.
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    pub results: Vec<T>,
    /// Page size the server actually applied, which may be lower than requested.
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default, rename = "_links")]
    pub links: Option<PageLinks>,
}

#[derive(Debug, Deserialize)]
pub struct PageLinks {
    #[serde(default)]
    pub next: Option<Link>,
}

#[derive(Debug, Deserialize)]
pub struct Link {
    pub href: String,
}

impl<T> Page<T> {
    /// Whether another page follows this one.
    ///
    /// A `_links.next` entry decides when the server sends links. Without
    /// links, a page filled up to the limit the server echoed (or the one
    /// requested) may have a successor.
    pub fn has_more(&self, requested_limit: usize) -> bool {
        if self.results.is_empty() {
            return false;
        }
        if let Some(links) = &self.links {
            return links.next.is_some();
        }
        self.results.len() >= self.limit.unwrap_or(requested_limit)
    }
}

#[derive(Debug, Deserialize)]
pub struct OrganizationDto {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl From<OrganizationDto> for Organization {
    fn from(dto: OrganizationDto) -> Self {
        Organization {
            id: dto.id,
            name: dto.name,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteDto {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "available_by_default")]
    pub is_available: bool,
}

fn available_by_default() -> bool {
    true
}

impl SiteDto {
    pub fn into_object(self, organization_id: &str) -> ProtectableObject {
        let name = self
            .title
            .or(self.name)
            .or(self.url)
            .unwrap_or_default();
        ProtectableObject {
            id: self.id,
            name,
            organization_id: organization_id.to_string(),
            kind: ObjectKind::Site,
            available: self.is_available,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamDto {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub mail: Option<String>,
}

impl TeamDto {
    pub fn into_object(self, organization_id: &str) -> ProtectableObject {
        ProtectableObject {
            id: self.id,
            name: self.display_name.or(self.mail).unwrap_or_default(),
            organization_id: organization_id.to_string(),
            kind: ObjectKind::Team,
            available: true,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDto {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default = "available_by_default")]
    pub is_enabled: bool,
}

impl From<JobDto> for BackupJob {
    fn from(dto: JobDto) -> Self {
        BackupJob {
            id: dto.id,
            name: dto.name,
            organization_id: dto.organization_id,
            is_enabled: dto.is_enabled,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryRefDto {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl DirectoryRefDto {
    fn label(self) -> (String, String) {
        let name = self
            .display_name
            .or(self.title)
            .or(self.name)
            .or(self.url)
            .unwrap_or_default();
        (self.id, name)
    }
}

#[derive(Debug, Deserialize)]
pub struct SelectedItemDto {
    pub id: String,
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(default)]
    pub site: Option<DirectoryRefDto>,
    #[serde(default)]
    pub team: Option<DirectoryRefDto>,
}

impl SelectedItemDto {
    /// Site and team entries only; users, groups and whole organizations give `None`.
    pub fn into_selected_item(self) -> Option<SelectedItem> {
        let (kind, reference) = match self.item_type.as_str() {
            "Site" => (ObjectKind::Site, self.site?),
            "Team" => (ObjectKind::Team, self.team?),
            _ => return None,
        };
        let (directory_object_id, directory_object_name) = reference.label();
        Some(SelectedItem {
            veeam_item_id: self.id,
            kind,
            directory_object_id,
            directory_object_name,
        })
    }
}

impl From<Vec<SelectedItemDto>> for JobSelection {
    fn from(dtos: Vec<SelectedItemDto>) -> Self {
        let mut selection = JobSelection::default();
        for dto in dtos {
            match dto.into_selected_item() {
                Some(item) => selection.items.push(item),
                None => selection.other_entries += 1,
            }
        }
        selection
    }
}
