use serde::{Deserialize, Serialize};
use std::fmt;

/// The two kinds of directory object this tool reconciles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Site,
    Team,
}

impl ObjectKind {
    pub fn label(&self) -> &'static str {
        match self {
            ObjectKind::Site => "site",
            ObjectKind::Team => "team",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where the backend reads directory objects from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncMode {
    #[default]
    PreferLocalResynced,
    Production,
}

impl SyncMode {
    /// Value of the `dataSource` query parameter.
    pub fn as_query_value(&self) -> &'static str {
        match self {
            SyncMode::PreferLocalResynced => "PreferLocalResynced",
            SyncMode::Production => "Production",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
}

/// A site or team that currently exists in the source directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProtectableObject {
    pub id: String,
    pub name: String,
    pub organization_id: String,
    pub kind: ObjectKind,
    /// Always true for teams.
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupJob {
    pub id: String,
    pub name: String,
    pub organization_id: Option<String>,
    pub is_enabled: bool,
}

/// One entry of a job's selection list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedItem {
    /// Backend id of the selection entry, not the directory object.
    pub veeam_item_id: String,
    pub kind: ObjectKind,
    pub directory_object_id: String,
    pub directory_object_name: String,
}

/// Everything a job currently selects.
///
/// Only site and team entries are kept as items. Users, groups and
/// organizations are counted but not resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobSelection {
    pub items: Vec<SelectedItem>,
    pub other_entries: usize,
}

impl JobSelection {
    /// Number of entries the job holds, of any type.
    pub fn total(&self) -> usize {
        self.items.len() + self.other_entries
    }
}

/// A selected item tagged with the job that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProtectedItem {
    pub job_id: String,
    pub job_name: String,
    pub organization_id: Option<String>,
    pub item: SelectedItem,
}

/// A protected item whose directory object no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrphanRecord {
    pub job_id: String,
    pub job_name: String,
    pub organization_id: Option<String>,
    pub veeam_item_id: String,
    pub directory_object_id: String,
    pub directory_object_name: String,
    pub kind: ObjectKind,
}

impl From<&ProtectedItem> for OrphanRecord {
    fn from(p: &ProtectedItem) -> Self {
        Self {
            job_id: p.job_id.clone(),
            job_name: p.job_name.clone(),
            organization_id: p.organization_id.clone(),
            veeam_item_id: p.item.veeam_item_id.clone(),
            directory_object_id: p.item.directory_object_id.clone(),
            directory_object_name: p.item.directory_object_name.clone(),
            kind: p.item.kind,
        }
    }
}
