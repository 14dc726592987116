//! Storage layer
//!
//! The repository talks to its backing store through [`RecordStorage`],
//! a line-oriented interface: check existence, create empty, read every
//! line, and overwrite with full contents.
//!
//! - [`FileStorage`]: the record file on disk (atomic rewrites)
//! - [`MemoryStorage`]: in-process buffer, for tests and dry runs

pub mod error;
pub mod file;
pub mod memory;

pub use error::{StorageError, StorageResult};
pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Line-oriented backing store for encoded records
///
/// Implementations acquire any underlying handle per call and release it
/// before returning.
pub trait RecordStorage {
    /// Whether the storage location already exists
    fn exists(&self) -> bool;

    /// Create the location with no contents
    fn create_empty(&mut self) -> StorageResult<()>;

    /// Read every line as raw bytes, without terminators
    ///
    /// Lines are not required to be valid UTF-8; the caller decides what to
    /// do with lines that are not.
    fn read_lines(&self) -> StorageResult<Vec<Vec<u8>>>;

    /// Replace the full contents in a single operation
    ///
    /// Either every byte of `contents` is stored or the previous contents
    /// are left untouched.
    fn overwrite(&mut self, contents: &str) -> StorageResult<()>;

    /// Human-readable description of where records live
    fn location(&self) -> String;
}

/// Split raw contents on `\n`, dropping a trailing `\r` from each line
///
/// A final terminator does not produce an empty trailing line.
pub(crate) fn split_lines(bytes: &[u8]) -> Vec<Vec<u8>> {
    let mut lines: Vec<Vec<u8>> = bytes
        .split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line).to_vec())
        .collect();
    if bytes.is_empty() || bytes.ends_with(b"\n") {
        lines.pop();
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines() {
        assert!(split_lines(b"").is_empty());
        assert_eq!(split_lines(b"a\nb\n"), vec![b"a".to_vec(), b"b".to_vec()]);
        assert_eq!(split_lines(b"a\r\nb"), vec![b"a".to_vec(), b"b".to_vec()]);
        assert_eq!(
            split_lines(b"a\n\n\xFF\n"),
            vec![b"a".to_vec(), Vec::new(), vec![0xFF]]
        );
    }
}
