//! Resources definitions are read from and written to
//!
//! Only [`FileResource`] points at the filesystem and can be watched.
//! [`InMemoryResource`] stands in for packaged or remote content.

use parking_lot::RwLock;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Readable source of definition content
pub trait Resource: Send + Sync {
    /// Human-readable location used in logs and errors
    fn description(&self) -> String;

    fn exists(&self) -> bool;

    fn read_to_string(&self) -> io::Result<String>;

    /// Filesystem path, when the resource is a plain file
    fn file_path(&self) -> Option<&Path> {
        None
    }
}

/// Resource that can be overwritten
pub trait WritableResource: Resource {
    /// Replace the resource content
    fn write_string(&self, content: &str) -> io::Result<()>;
}

/// Resource backed by a file on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileResource {
    path: PathBuf,
}

impl FileResource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Resource for FileResource {
    fn description(&self) -> String {
        format!("file [{}]", self.path.display())
    }

    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn read_to_string(&self) -> io::Result<String> {
        std::fs::read_to_string(&self.path)
    }

    fn file_path(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

impl WritableResource for FileResource {
    fn write_string(&self, content: &str) -> io::Result<()> {
        std::fs::write(&self.path, content)
    }
}

/// Resource held in memory
pub struct InMemoryResource {
    name: String,
    content: RwLock<Option<String>>,
}

impl InMemoryResource {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: RwLock::new(Some(content.into())),
        }
    }

    /// A resource that does not exist until written
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: RwLock::new(None),
        }
    }

    pub fn content(&self) -> Option<String> {
        self.content.read().clone()
    }
}

impl fmt::Debug for InMemoryResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryResource")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Resource for InMemoryResource {
    fn description(&self) -> String {
        format!("in-memory resource [{}]", self.name)
    }

    fn exists(&self) -> bool {
        self.content.read().is_some()
    }

    fn read_to_string(&self) -> io::Result<String> {
        self.content.read().clone().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} has no content", self.name),
            )
        })
    }
}

impl WritableResource for InMemoryResource {
    fn write_string(&self, content: &str) -> io::Result<()> {
        *self.content.write() = Some(content.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_resource_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let resource = FileResource::new(dir.path().join("missing.json"));

        assert!(!resource.exists());
        assert!(resource.read_to_string().is_err());
        assert!(resource.file_path().is_some());
    }

    #[test]
    fn test_directory_is_not_a_file_resource() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!FileResource::new(dir.path()).exists());
    }

    #[test]
    fn test_in_memory_resource_write_then_read() {
        let resource = InMemoryResource::empty("definitions");
        assert!(!resource.exists());
        assert!(resource.file_path().is_none());

        resource.write_string("{}").unwrap();
        assert!(resource.exists());
        assert_eq!(resource.read_to_string().unwrap(), "{}");
    }
}
