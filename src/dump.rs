//! Diagnostic snapshot files written with `--save`. Nothing reads them back.

use crate::error::Error;
use crate::model::OrphanRecord;
use chrono::Local;
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct SnapshotWriter {
    dir: PathBuf,
}

impl SnapshotWriter {
    /// Create a fresh timestamped directory under `root`.
    pub fn create(root: &Path) -> Result<Self, Error> {
        let dir = root.join(Local::now().format("%Y%m%d-%H%M%S").to_string());
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn write_json<T: Serialize + ?Sized>(&self, file_name: &str, data: &T) -> Result<(), Error> {
        let path = self.dir.join(file_name);
        let writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(writer, data)?;
        debug!("Saved {}", path.display());
        Ok(())
    }

    pub fn write_orphans_csv<'a>(
        &self,
        file_name: &str,
        orphans: impl IntoIterator<Item = &'a OrphanRecord>,
    ) -> Result<(), Error> {
        let path = self.dir.join(file_name);
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record([
            "kind",
            "job_id",
            "job_name",
            "organization_id",
            "veeam_item_id",
            "directory_object_id",
            "directory_object_name",
        ])?;
        for orphan in orphans {
            writer.write_record([
                orphan.kind.label(),
                orphan.job_id.as_str(),
                orphan.job_name.as_str(),
                orphan.organization_id.as_deref().unwrap_or(""),
                orphan.veeam_item_id.as_str(),
                orphan.directory_object_id.as_str(),
                orphan.directory_object_name.as_str(),
            ])?;
        }
        writer.flush()?;
        debug!("Saved {}", path.display());
        Ok(())
    }
}
