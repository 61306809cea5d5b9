//! Uploaded-media storage.
//!
//! Relative paths are part of the persisted-state contract:
//! `profile_images/user_{id}/…`, `work_images/{username}/…`,
//! `chef_dishes/…`, `blog_images/…`. Files live under the configured media
//! root and are served at `/media`.

use std::path::{Path, PathBuf};

use ulid::Ulid;

#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn profile_image_path(user_id: &str, filename: &str) -> String {
        format!("profile_images/user_{}/{}", user_id, sanitize(filename))
    }

    pub fn work_image_path(username: &str, filename: &str) -> String {
        format!("work_images/{}/{}", username, sanitize(filename))
    }

    pub fn chef_image_path(filename: &str) -> String {
        format!("chef_dishes/{}", sanitize(filename))
    }

    pub fn blog_image_path(filename: &str) -> String {
        format!("blog_images/{}", sanitize(filename))
    }

    /// Write `bytes` at `relative` under the media root, creating parent
    /// directories as needed.
    pub async fn save(&self, relative: &str, bytes: &[u8]) -> anyhow::Result<()> {
        let full = self.root.join(relative);
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&full, bytes).await?;
        tracing::debug!(path = %full.display(), size = bytes.len(), "Stored media file");
        Ok(())
    }

    /// Best-effort removal of a stored file (replaced or deleted uploads).
    pub async fn remove(&self, relative: &str) {
        let full = self.root.join(relative);
        if let Err(e) = tokio::fs::remove_file(&full).await {
            tracing::debug!(path = %full.display(), error = %e, "Media file not removed");
        }
    }
}

/// Keep only the final path component and a conservative character set so an
/// uploaded filename can never escape the media root.
fn sanitize(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect::<String>();

    if base.trim_matches('.').is_empty() {
        Ulid::new().to_string().to_lowercase()
    } else {
        base
    }
}
