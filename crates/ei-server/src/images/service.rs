//! Image workflows coordinating blob storage and the document store.
//!
//! Every workflow reads the employee's record once, performs its blob
//! operations, and writes the record once. Blob deletions are best-effort:
//! their failures land in a [`CleanupReport`] next to the result and never
//! turn a delete into an error.

use std::sync::Arc;

use dashmap::DashMap;
use ei_core::{EmployeeId, Error, Result};
use ei_db::models::{EmployeeImageRecord, ImageEntry};
use ei_db::store::DocumentStore;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::storage::BlobStore;

/// One file part of an upload request, not yet written to storage.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    /// Multipart field the file arrived under.
    pub field_name: String,
    /// Client-side filename, used only for its extension.
    pub original_filename: String,
    pub data: Vec<u8>,
}

/// A blob that could not be removed during a delete workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobDeleteFailure {
    pub path: String,
    pub reason: String,
}

/// Outcome of the blob clean-up step of a delete workflow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Number of blob deletions attempted.
    pub attempted: usize,
    pub failures: Vec<BlobDeleteFailure>,
}

impl CleanupReport {
    /// `true` when every attempted deletion succeeded.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Result of a successful delete workflow.
#[derive(Debug, Clone)]
pub struct DeleteOutcome {
    /// Entries removed from the record.
    pub removed: Vec<ImageEntry>,
    pub cleanup: CleanupReport,
}

/// Image workflows over injected document and blob stores.
///
/// Read-modify-write workflows for the same employee are serialized by a
/// per-employee async mutex, so concurrent uploads in one process cannot
/// overwrite each other's appended entries. Separate processes sharing a
/// database are not coordinated.
pub struct ImageService {
    documents: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
    locks: DashMap<EmployeeId, Arc<Mutex<()>>>,
}

impl ImageService {
    /// Create a new `ImageService`.
    pub fn new(documents: Arc<dyn DocumentStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            documents,
            blobs,
            locks: DashMap::new(),
        }
    }

    /// Write every incoming file to blob storage, in order.
    ///
    /// Stops at the first failure. Blobs written before it stay on disk.
    pub async fn store_uploads(&self, files: &[IncomingFile]) -> Result<Vec<String>> {
        let mut paths = Vec::with_capacity(files.len());
        for file in files {
            let path = self
                .blobs
                .write(&file.field_name, &file.original_filename, &file.data)
                .await?;
            paths.push(path);
        }
        Ok(paths)
    }

    /// Append already-stored blobs to the employee's record, creating it if
    /// absent, and return the full updated record.
    ///
    /// File `i` is titled `titles[i]` when present and non-empty, otherwise
    /// `"Untitled"`.
    pub async fn upload_append(
        &self,
        employee_id: &EmployeeId,
        stored_paths: Vec<String>,
        titles: &[String],
    ) -> Result<EmployeeImageRecord> {
        if stored_paths.is_empty() {
            return Err(Error::NoFilesProvided);
        }

        let entries: Vec<ImageEntry> = stored_paths
            .into_iter()
            .enumerate()
            .map(|(i, path)| ImageEntry::new(titles.get(i).map(String::as_str), path))
            .collect();
        let added = entries.len();

        let _guard = self.lock(employee_id).await;

        let record = match self.documents.find_one(employee_id).await? {
            Some(mut record) => {
                record.images.extend(entries);
                record
            }
            None => EmployeeImageRecord::new(employee_id.clone(), entries),
        };
        self.documents.save(&record).await?;

        tracing::info!(
            employee_id = %employee_id,
            added,
            total = record.images.len(),
            "Appended images"
        );
        Ok(record)
    }

    /// Fetch the employee's full record.
    pub async fn get_images(&self, employee_id: &EmployeeId) -> Result<EmployeeImageRecord> {
        self.documents
            .find_one(employee_id)
            .await?
            .ok_or_else(|| Error::not_found(employee_id))
    }

    /// Remove the first entry whose path contains `filename`, then delete
    /// its blob.
    pub async fn delete_image(
        &self,
        employee_id: &EmployeeId,
        filename: &str,
    ) -> Result<DeleteOutcome> {
        let _guard = self.lock(employee_id).await;

        let mut record = self
            .documents
            .find_one(employee_id)
            .await?
            .ok_or_else(|| Error::employee_not_found(employee_id))?;

        let index = record
            .position_of(filename)
            .ok_or_else(|| Error::image_not_found(employee_id, filename))?;

        let entry = record.images.remove(index);
        self.documents.save(&record).await?;

        let cleanup = self.remove_blobs(std::slice::from_ref(&entry)).await;

        tracing::info!(employee_id = %employee_id, path = %entry.path, "Deleted image");
        Ok(DeleteOutcome {
            removed: vec![entry],
            cleanup,
        })
    }

    /// Delete every blob of the employee, then the record itself.
    pub async fn delete_all_images(&self, employee_id: &EmployeeId) -> Result<DeleteOutcome> {
        let _guard = self.lock(employee_id).await;

        let record = self
            .documents
            .find_one(employee_id)
            .await?
            .ok_or_else(|| Error::employee_not_found(employee_id))?;

        let cleanup = self.remove_blobs(&record.images).await;
        self.documents.delete_one(employee_id).await?;

        tracing::info!(
            employee_id = %employee_id,
            removed = record.images.len(),
            "Deleted all images"
        );
        Ok(DeleteOutcome {
            removed: record.images,
            cleanup,
        })
    }

    /// Best-effort deletion of each entry's blob.
    async fn remove_blobs(&self, entries: &[ImageEntry]) -> CleanupReport {
        let mut report = CleanupReport::default();
        for entry in entries {
            report.attempted += 1;
            if let Err(e) = self.blobs.delete(&entry.path).await {
                tracing::warn!(path = %entry.path, error = %e, "File deletion error");
                report.failures.push(BlobDeleteFailure {
                    path: entry.path.clone(),
                    reason: e.to_string(),
                });
            }
        }
        report
    }

    async fn lock(&self, employee_id: &EmployeeId) -> EmployeeLock<'_> {
        let lock = self.locks.entry(employee_id.clone()).or_default().clone();
        EmployeeLock {
            locks: &self.locks,
            employee_id: employee_id.clone(),
            guard: Some(lock.lock_owned().await),
        }
    }
}

/// Held per-employee lock. Releasing it drops the map entry once no other
/// task holds or waits on the same mutex.
struct EmployeeLock<'a> {
    locks: &'a DashMap<EmployeeId, Arc<Mutex<()>>>,
    employee_id: EmployeeId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for EmployeeLock<'_> {
    fn drop(&mut self) {
        // The guard owns a clone of the Arc; release it before counting.
        drop(self.guard.take());
        self.locks
            .remove_if(&self.employee_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}
