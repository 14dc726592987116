//! In-memory record storage

use std::io;
use std::path::PathBuf;

use super::error::{StorageError, StorageResult};
use super::{split_lines, RecordStorage};

/// Record storage held in a `String`
///
/// Starts out missing, like a file that was never created. Writes can be
/// made to fail with [`MemoryStorage::fail_writes`] to exercise error paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    contents: Option<String>,
    fail_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that already holds the given text
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Some(contents.into()),
            fail_writes: false,
        }
    }

    /// Current contents, `None` if never created
    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }

    /// Make every subsequent write fail (or succeed again)
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    fn check_writable(&self) -> StorageResult<()> {
        if self.fail_writes {
            return Err(StorageError::from_io(
                io::Error::new(io::ErrorKind::Other, "No space left on device"),
                PathBuf::from(self.location()),
            ));
        }
        Ok(())
    }
}

impl RecordStorage for MemoryStorage {
    fn exists(&self) -> bool {
        self.contents.is_some()
    }

    fn create_empty(&mut self) -> StorageResult<()> {
        self.check_writable()?;
        self.contents = Some(String::new());
        Ok(())
    }

    fn read_lines(&self) -> StorageResult<Vec<Vec<u8>>> {
        let contents = self.contents.as_deref().ok_or_else(|| StorageError::NotFound {
            path: PathBuf::from(self.location()),
        })?;
        Ok(split_lines(contents.as_bytes()))
    }

    fn overwrite(&mut self, contents: &str) -> StorageResult<()> {
        self.check_writable()?;
        self.contents = Some(contents.to_string());
        Ok(())
    }

    fn location(&self) -> String {
        "<memory>".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_missing() {
        let storage = MemoryStorage::new();
        assert!(!storage.exists());
        assert!(storage.read_lines().is_err());
    }

    #[test]
    fn test_failed_write_keeps_contents() {
        let mut storage = MemoryStorage::with_contents("1,Bessie,4,Cow\n");
        storage.fail_writes(true);

        let err = storage.overwrite("").unwrap_err();
        assert!(matches!(err, StorageError::DiskFull { .. }));
        assert_eq!(storage.contents(), Some("1,Bessie,4,Cow\n"));
    }
}
