//! File-backed record storage
//!
//! Reads the whole record file in one go and replaces it with atomic
//! writes (write to temp file, then rename) so a failed rewrite never
//! leaves a half-written file behind. No handle is held between calls.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::{StorageError, StorageResult};
use super::{split_lines, RecordStorage};

/// Record storage over a single text file
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordStorage for FileStorage {
    fn exists(&self) -> bool {
        self.path.exists()
    }

    fn create_empty(&mut self) -> StorageResult<()> {
        atomic_write(&self.path, b"")
    }

    fn read_lines(&self) -> StorageResult<Vec<Vec<u8>>> {
        let content =
            fs::read(&self.path).map_err(|e| StorageError::from_read(e, self.path.clone()))?;
        Ok(split_lines(&content))
    }

    fn overwrite(&mut self, contents: &str) -> StorageResult<()> {
        debug!("Rewriting {:?} ({} bytes)", self.path, contents.len());
        atomic_write(&self.path, contents.as_bytes())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
///
/// The temp file is removed if any step fails.
pub(crate) fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StorageError::CreateDirectory {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    // Same directory as the target so the rename stays on one filesystem
    let temp_path = temp_path_for(path);

    let result = write_synced(&temp_path, data).and_then(|()| {
        fs::rename(&temp_path, path).map_err(|source| StorageError::AtomicWriteFailed {
            from: temp_path.clone(),
            to: path.to_path_buf(),
            source,
        })
    });

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_synced(path: &Path, data: &[u8]) -> StorageResult<()> {
    let mut file = File::create(path).map_err(|e| StorageError::from_io(e, path.to_path_buf()))?;
    file.write_all(data)
        .map_err(|e| StorageError::from_io(e, path.to_path_buf()))?;
    file.sync_all()
        .map_err(|e| StorageError::from_io(e, path.to_path_buf()))
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
