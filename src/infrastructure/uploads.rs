use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use uuid::Uuid;

use crate::domain::entity::ImageSlot;
use crate::domain::errors::DomainError;

/// Uploaded images on the local filesystem.
///
/// Files are addressed by paths relative to the root, such as
/// `items/6f1c….png`. Those relative paths are what the database stores.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes `bytes` under the slot's directory with a fresh random name and
    /// returns the relative path. The client's file name only contributes its
    /// extension.
    pub fn save(&self, slot: ImageSlot, file_name: &str, bytes: &[u8]) -> Result<String, DomainError> {
        let directory = self.root.join(slot.directory);
        fs::create_dir_all(&directory).map_err(storage_error)?;

        let name = match extension(file_name) {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };
        fs::write(directory.join(&name), bytes).map_err(storage_error)?;

        Ok(format!("{}/{}", slot.directory, name))
    }

    /// Deletes a previously saved image. A file that is already gone is fine.
    pub fn remove(&self, relative: &str) -> Result<(), DomainError> {
        let path = Path::new(relative);
        if !path.components().all(|c| matches!(c, Component::Normal(_))) {
            return Err(DomainError::invalid(format!("Invalid image path: {relative}")));
        }
        match fs::remove_file(self.root.join(path)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error(e)),
        }
    }
}

fn storage_error(e: io::Error) -> DomainError {
    DomainError::Internal(format!("Image storage failed: {e}"))
}

fn extension(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.len() <= 8)
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_ascii_lowercase)
}
