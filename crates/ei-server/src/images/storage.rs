//! Filesystem-level blob storage for uploaded images.
//!
//! Uploaded files land flat in the upload directory under a generated
//! unique name `{field}-{unix_millis}-{random}{.ext}` and are recorded as
//! `uploads/<name>`, the same path they are served under.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use ei_core::{Error, Result};
use rand::Rng;
use tokio::io::AsyncWriteExt;

/// Prefix of every recorded blob path, also the static mount point.
pub const UPLOADS_PREFIX: &str = "uploads";

/// Storage backend for raw uploaded bytes.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Durably write `data` under a freshly generated unique name and return
    /// the recorded path.
    async fn write(
        &self,
        field_name: &str,
        original_filename: &str,
        data: &[u8],
    ) -> Result<String>;

    /// Delete the blob at a previously recorded path.
    async fn delete(&self, path: &str) -> Result<()>;
}

/// [`BlobStore`] writing into a single directory on local disk.
#[derive(Debug, Clone)]
pub struct DiskBlobStore {
    base_dir: PathBuf,
}

impl DiskBlobStore {
    /// Create a new `DiskBlobStore` rooted at `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Directory blobs are written to.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Create the upload directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.base_dir).await?;
        Ok(())
    }

    /// Map a recorded path back to a file inside `base_dir`.
    ///
    /// Only a single plain file-name component is accepted after the
    /// optional `uploads/` prefix; anything else would leave the directory.
    fn resolve(&self, recorded: &str) -> Option<PathBuf> {
        let name = recorded
            .strip_prefix(UPLOADS_PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(recorded);

        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(file)), None) => Some(self.base_dir.join(file)),
            _ => None,
        }
    }
}

#[async_trait]
impl BlobStore for DiskBlobStore {
    async fn write(
        &self,
        field_name: &str,
        original_filename: &str,
        data: &[u8],
    ) -> Result<String> {
        let name = unique_name(field_name, original_filename);
        let recorded = format!("{UPLOADS_PREFIX}/{name}");
        let target = self.base_dir.join(&name);

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
            .await
            .map_err(|e| Error::blob_write(&recorded, e))?;
        file.write_all(data)
            .await
            .map_err(|e| Error::blob_write(&recorded, e))?;
        file.sync_all()
            .await
            .map_err(|e| Error::blob_write(&recorded, e))?;

        tracing::debug!(path = %recorded, bytes = data.len(), "Stored blob");
        Ok(recorded)
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let target = self.resolve(path).ok_or_else(|| {
            Error::blob_delete(
                path,
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "path is outside the upload directory",
                ),
            )
        })?;

        tokio::fs::remove_file(&target)
            .await
            .map_err(|e| Error::blob_delete(path, e))?;

        tracing::debug!(path = %path, "Deleted blob");
        Ok(())
    }
}

/// Generate `{field}-{unix_millis}-{0..1e9}{.ext}` for an upload.
///
/// The field name and extension are reduced to ASCII alphanumerics, `-`
/// and `_` so the result is always a single safe path component.
pub fn unique_name(field_name: &str, original_filename: &str) -> String {
    let mut field: String = field_name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    if field.is_empty() {
        field.push_str("file");
    }

    let ext = Path::new(original_filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            e.chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
        })
        .filter(|e| !e.is_empty())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();

    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);

    format!("{field}-{millis}-{suffix}{ext}")
}
