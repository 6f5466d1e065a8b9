//! Recording blob store on the local filesystem
//!
//! Each recording is one file `<dir>/<file_id>.mp3`. Writes go to a temporary
//! file first and are renamed into place, so a concurrent reader sees either
//! nothing or the complete blob.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use vokab_common::{Error, Result};

use crate::types::BlobStore;

/// Root folder subdirectory holding recording blobs
pub const RECORDINGS_DIR: &str = "recordings";

/// Filesystem-backed [`BlobStore`]
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    dir: PathBuf,
}

impl FsBlobStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn blob_path(&self, file_id: &str) -> Result<PathBuf> {
        validate_file_id(file_id)?;
        Ok(self.dir.join(format!("{}.mp3", file_id)))
    }
}

/// File ids become file names: only ASCII alphanumerics and `-` are allowed.
fn validate_file_id(file_id: &str) -> Result<()> {
    if file_id.is_empty()
        || !file_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(Error::InvalidInput(format!("invalid file id '{}'", file_id)));
    }
    Ok(())
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn get(&self, file_id: &str) -> Result<Option<Vec<u8>>> {
        let path = self.blob_path(file_id)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn put(&self, file_id: &str, bytes: &[u8]) -> Result<()> {
        let path = self.blob_path(file_id)?;
        let tmp_path = self.dir.join(format!("{}.mp3.tmp", file_id));

        let stored = match tokio::fs::write(&tmp_path, bytes).await {
            Ok(()) => tokio::fs::rename(&tmp_path, &path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = stored {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }

        tracing::debug!(file_id = %file_id, bytes = bytes.len(), "Stored recording blob");
        Ok(())
    }
}
