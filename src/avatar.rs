// Doctor avatar storage
//
// Avatars are staged to a temporary file by the upload handler, then handed to
// an `AvatarStore`, which answers with a public identifier and a retrieval URL.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::models::DoctorAvatar;

/// MIME types accepted for doctor avatars
pub const ALLOWED_AVATAR_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/webp"];

/// Errors reported by an avatar store
#[derive(Debug, thiserror::Error)]
pub enum AvatarError {
    #[error("Avatar I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("Avatar store returned no result")]
    EmptyResponse,

    #[error("Unsupported avatar type: {0}")]
    UnsupportedType(String),
}

/// An avatar received from the client, not yet stored
#[derive(Debug, Clone)]
pub struct AvatarUpload {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl AvatarUpload {
    pub fn is_supported(&self) -> bool {
        ALLOWED_AVATAR_TYPES.contains(&self.content_type.as_str())
    }

    fn extension(&self) -> Result<&'static str, AvatarError> {
        match self.content_type.as_str() {
            "image/png" => Ok("png"),
            "image/jpeg" => Ok("jpg"),
            "image/webp" => Ok("webp"),
            other => Err(AvatarError::UnsupportedType(other.to_string())),
        }
    }

    /// Write the upload to a temporary file for the store to consume
    pub async fn stage(&self) -> Result<StagedAvatar, AvatarError> {
        let extension = self.extension()?;
        let path = std::env::temp_dir().join(format!("avatar-{}.{}", Uuid::new_v4(), extension));
        tokio::fs::write(&path, &self.bytes).await?;
        Ok(StagedAvatar { path })
    }
}

/// Temporary file holding an avatar between upload and storage
#[derive(Debug)]
pub struct StagedAvatar {
    path: PathBuf,
}

impl StagedAvatar {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the temporary file; a missing file is not an error
    pub async fn discard(self) {
        if let Err(e) = tokio::fs::remove_file(&self.path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to remove staged avatar {:?}: {}", self.path, e);
            }
        }
    }
}

/// Object storage for doctor avatars
#[async_trait]
pub trait AvatarStore: Send + Sync {
    /// Store the file at `temp_path`, returning its identifier and URL
    async fn upload(&self, temp_path: &Path) -> Result<DoctorAvatar, AvatarError>;
}

/// Avatar store backed by a local directory served over HTTP
pub struct LocalAvatarStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalAvatarStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl AvatarStore for LocalAvatarStore {
    async fn upload(&self, temp_path: &Path) -> Result<DoctorAvatar, AvatarError> {
        let extension = temp_path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or(AvatarError::EmptyResponse)?;

        tokio::fs::create_dir_all(&self.root).await?;

        let id = Uuid::new_v4();
        let file_name = format!("{}.{}", id, extension);
        tokio::fs::copy(temp_path, self.root.join(&file_name)).await?;

        tracing::info!("Stored doctor avatar {}", file_name);
        Ok(DoctorAvatar {
            public_id: format!("doctor_avatars/{}", id),
            url: format!("{}/{}", self.public_base_url, file_name),
        })
    }
}
