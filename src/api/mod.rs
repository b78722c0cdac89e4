pub mod rest;
pub mod wire;

use crate::error::Error;
use crate::model::{BackupJob, JobSelection, Organization, ProtectableObject, SyncMode};

pub use rest::RestClient;

/// Read and mutation calls the cleaner needs from the backup server.
///
/// Every read returns the complete listing or an error; an implementation must
/// never turn a failed request into an empty result.
pub trait BackupApi {
    fn list_organizations(&self) -> Result<Vec<Organization>, Error>;

    fn list_sites(
        &self,
        organization_id: &str,
        mode: SyncMode,
        include_unavailable: bool,
    ) -> Result<Vec<ProtectableObject>, Error>;

    fn list_teams(
        &self,
        organization_id: &str,
        mode: SyncMode,
    ) -> Result<Vec<ProtectableObject>, Error>;

    fn list_jobs(&self) -> Result<Vec<BackupJob>, Error>;

    /// Every entry a job selects. Entries other than sites and teams are
    /// only counted.
    fn list_selected_items(&self, job_id: &str) -> Result<JobSelection, Error>;

    /// Remove one selection entry from a job.
    fn remove_selected_item(&self, job_id: &str, veeam_item_id: &str) -> Result<(), Error>;

    fn disable_job(&self, job_id: &str) -> Result<(), Error>;
}
