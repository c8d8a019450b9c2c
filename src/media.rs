//! # Media Store
//!
//! Uploaded product images/videos and vendor logos live as flat files under
//! one uploads directory. Records reference them by stored file name only.

use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// An uploaded file as received, before it is stored.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

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

    /// Creates the uploads directory if it is missing.
    pub async fn ensure_root(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    /// Path of a stored file, or `None` if `name` could escape the root.
    pub fn path_of(&self, name: &str) -> Option<PathBuf> {
        let plain = !name.is_empty()
            && !name.contains(['/', '\\'])
            && name != "."
            && name != "..";
        plain.then(|| self.root.join(name))
    }

    /// Writes `bytes` under a fresh name that keeps the original extension.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> io::Result<String> {
        let name = match extension_of(original_name) {
            Some(ext) => format!("{}.{ext}", Uuid::new_v4()),
            None => Uuid::new_v4().to_string(),
        };
        tokio::fs::write(self.root.join(&name), bytes).await?;
        debug!(file = %name, size = bytes.len(), "Media saved");
        Ok(name)
    }

    /// Saves every upload, or none: files written before a failure are removed.
    pub async fn save_all(&self, uploads: &[Upload]) -> io::Result<Vec<String>> {
        let mut saved = Vec::with_capacity(uploads.len());
        for upload in uploads {
            match self.save(&upload.file_name, &upload.bytes).await {
                Ok(name) => saved.push(name),
                Err(e) => {
                    self.remove_all(&saved).await;
                    return Err(e);
                }
            }
        }
        Ok(saved)
    }

    /// Deletes a stored file. Failures are logged and swallowed.
    pub async fn remove(&self, name: &str) {
        let Some(path) = self.path_of(name) else {
            warn!(file = name, "Refusing to remove media outside the uploads directory");
            return;
        };
        match tokio::fs::remove_file(&path).await {
            Ok(()) => debug!(file = name, "Media removed"),
            Err(e) => warn!(file = name, error = %e, "Failed to remove media"),
        }
    }

    pub async fn remove_all(&self, names: &[String]) {
        for name in names {
            self.remove(name).await;
        }
    }
}

/// Lowercased alphanumeric extension of an uploaded file name.
fn extension_of(original_name: &str) -> Option<String> {
    let ext = Path::new(original_name).extension()?.to_str()?;
    (!ext.is_empty() && ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .then(|| ext.to_ascii_lowercase())
}
