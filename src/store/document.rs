use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

/// The text document that carries the badges (the project README).
pub trait DocumentStore {
    /// `Ok(None)` when the document does not exist.
    fn read(&self) -> io::Result<Option<String>>;
    fn write(&self, text: &str) -> io::Result<()>;
}

pub struct FileDocument {
    path: PathBuf,
}

impl FileDocument {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentStore for FileDocument {
    fn read(&self) -> io::Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, text: &str) -> io::Result<()> {
        fs::write(&self.path, text)
    }
}
