use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

const TEMP_SUFFIX: &str = "tmp";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read {path}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write {path}")]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to serialize document")]
    Serialize(#[from] serde_json::Error),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

pub fn read_document(path: &Path) -> StorageResult<String> {
    fs::read_to_string(path).map_err(|source| StorageError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Pretty-prints with two-space indentation, keeping construction key order.
pub fn render_document<T: Serialize + ?Sized>(document: &T) -> StorageResult<String> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Writes `contents` through a sibling temp file so `path` is either the old
/// file or the complete new one.
pub fn write_document(path: &Path, contents: &str) -> StorageResult<()> {
    stage_document(path, contents)?.commit()
}

/// Writes `contents` next to `path` without replacing it yet.
///
/// Dropping the result without calling [`StagedDocument::commit`] removes the
/// temp file, so several documents can be staged and then committed together.
pub fn stage_document(path: &Path, contents: &str) -> StorageResult<StagedDocument> {
    let write_err = |source: io::Error| StorageError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let staged = StagedDocument {
        path: path.to_path_buf(),
        temp_path: temp_path_for(path),
        bytes: contents.len(),
        committed: false,
    };
    fs::write(&staged.temp_path, contents).map_err(write_err)?;
    Ok(staged)
}

#[derive(Debug)]
pub struct StagedDocument {
    path: PathBuf,
    temp_path: PathBuf,
    bytes: usize,
    committed: bool,
}

impl StagedDocument {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Renames the temp file over the target path.
    pub fn commit(mut self) -> StorageResult<()> {
        fs::rename(&self.temp_path, &self.path).map_err(|source| StorageError::Write {
            path: self.path.clone(),
            source,
        })?;
        self.committed = true;
        tracing::debug!(path = %self.path.display(), bytes = self.bytes, "wrote document");
        Ok(())
    }
}

impl Drop for StagedDocument {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        if let Err(err) = fs::remove_file(&self.temp_path) {
            if err.kind() != io::ErrorKind::NotFound {
                tracing::warn!(path = %self.temp_path.display(), ?err, "failed to remove temp document");
            }
        }
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(
        ".{file_name}.{}.{TEMP_SUFFIX}",
        std::process::id()
    ))
}
