//! Layered content sources
//!
//! A source maps a `/`-rooted logical path to readable bytes. The content
//! manager layers several sources in registration order and takes the
//! first hit, so an earlier source can shadow documents of a later one.

use std::collections::HashMap;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

/// Capability to open a logical path.
pub trait ContentSource: Send + Sync {
    /// Open `path`, returning `None` when this source does not provide it.
    fn open(&self, path: &str) -> Option<Box<dyn Read + Send>>;
}

/// Serves content from a directory on disk.
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl ContentSource for DirSource {
    fn open(&self, path: &str) -> Option<Box<dyn Read + Send>> {
        let full = self.root.join(path.trim_start_matches('/'));
        if !full.is_file() {
            return None;
        }
        File::open(full)
            .ok()
            .map(|f| Box::new(f) as Box<dyn Read + Send>)
    }
}

/// In-memory bundle of documents.
///
/// Useful for embedded defaults shipped inside the binary and for tests.
#[derive(Debug, Default)]
pub struct MemorySource {
    files: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `path` with the given bytes, replacing any previous entry.
    pub fn insert(&mut self, path: &str, data: impl Into<Vec<u8>>) {
        self.files.insert(path.to_string(), data.into());
    }
}

impl ContentSource for MemorySource {
    fn open(&self, path: &str) -> Option<Box<dyn Read + Send>> {
        self.files
            .get(path)
            .cloned()
            .map(|data| Box::new(Cursor::new(data)) as Box<dyn Read + Send>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn read_all(mut reader: Box<dyn Read + Send>) -> Vec<u8> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_dir_source_opens_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("docs/note.md"), "note body").unwrap();

        let source = DirSource::new(dir.path());
        let reader = source.open("/docs/note.md").unwrap();
        assert_eq!(read_all(reader), b"note body");
    }

    #[test]
    fn test_dir_source_misses() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirSource::new(dir.path());
        assert!(source.open("/absent.md").is_none());
    }

    #[test]
    fn test_dir_source_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let source = DirSource::new(dir.path());
        assert!(source.open("/sub").is_none());
    }

    #[test]
    fn test_memory_source_round_trip() {
        let mut source = MemorySource::new();
        source.insert("/index.md", "hello");

        let reader = source.open("/index.md").unwrap();
        assert_eq!(read_all(reader), b"hello");
        assert!(source.open("/other.md").is_none());
    }
}
