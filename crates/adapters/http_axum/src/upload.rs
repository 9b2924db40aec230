//! Writing accepted uploads to disk.

use std::path::{Path, PathBuf};

use community_domain::error::CommunityError;
use community_domain::time::now;
use community_domain::upload::UploadKind;
use uuid::Uuid;

/// Largest request body accepted by the upload route: the biggest policy
/// ceiling plus room for the multipart framing.
pub const UPLOAD_BODY_LIMIT: usize = 51 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
#[error("failed to store upload at {path}")]
pub struct UploadError {
    path: PathBuf,
    #[source]
    source: std::io::Error,
}

impl From<UploadError> for CommunityError {
    fn from(err: UploadError) -> Self {
        Self::Storage(Box::new(err))
    }
}

/// Where uploads land on disk and under which URL prefix they are served.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    public_prefix: String,
}

impl UploadStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            public_prefix: public_prefix.into(),
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn public_prefix(&self) -> &str {
        &self.public_prefix
    }

    /// Persist `bytes` as `<dir>/<kind>/<unix>_<uuid>.<ext>` and return its
    /// public URL.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError`] when the directory or the file cannot be written.
    pub async fn save(
        &self,
        kind: UploadKind,
        extension: &str,
        bytes: &[u8],
    ) -> Result<String, UploadError> {
        let folder = self.dir.join(kind.as_str());
        tokio::fs::create_dir_all(&folder)
            .await
            .map_err(|source| UploadError {
                path: folder.clone(),
                source,
            })?;

        let name = format!(
            "{}_{}.{extension}",
            now().timestamp(),
            Uuid::new_v4().simple()
        );
        let path = folder.join(&name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| UploadError {
                path: path.clone(),
                source,
            })?;
        tracing::debug!(path = %path.display(), size = bytes.len(), "upload stored");

        Ok(format!(
            "{}/{}/{name}",
            self.public_prefix.trim_end_matches('/'),
            kind.as_str()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn should_store_file_under_kind_folder() {
        let dir = std::env::temp_dir().join(format!("community-upload-{}", Uuid::new_v4()));
        let store = UploadStore::new(&dir, "/uploads/");

        let url = store.save(UploadKind::Image, "png", b"\x89PNG").await.unwrap();

        assert!(url.starts_with("/uploads/image/"));
        assert!(url.ends_with(".png"));
        let name = url.rsplit('/').next().unwrap();
        let written = tokio::fs::read(dir.join("image").join(name)).await.unwrap();
        assert_eq!(written, b"\x89PNG");

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
