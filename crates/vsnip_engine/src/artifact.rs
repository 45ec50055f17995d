//! Generated snippet files in the output directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::errors::EngineError;

/// Where an artifact's content came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Found on disk before it was requested.
    PreExisting,
    /// Produced by a generator during this run.
    FreshlyGenerated,
    /// Produced during this run and already saved by the generator itself,
    /// as external scripts do.
    WrittenByGenerator,
}

/// A snippet identified by its file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Name without extension, e.g. `mem_fifo`.
    pub name: String,
    /// File content.
    pub content: String,
    /// Where the content came from.
    pub origin: Origin,
}

impl Artifact {
    /// Creates a freshly generated artifact.
    pub fn generated(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            origin: Origin::FreshlyGenerated,
        }
    }
}

/// Reads and writes artifacts as `<dir>/<name>.<ext>`.
///
/// Existence on disk is the only freshness signal. A file that is present is
/// reused as-is for the rest of the run, even if an earlier generator left it
/// half-written.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
    extension: String,
}

impl ArtifactStore {
    /// Creates a store rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
        }
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Snippet extension, without the dot.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// File name for `name`.
    pub fn file_name(&self, name: &str) -> String {
        format!("{name}.{}", self.extension)
    }

    /// Full path for `name`.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(self.file_name(name))
    }

    /// Returns `true` if the artifact exists on disk.
    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }

    /// Loads an existing artifact, or `None` if it is not on disk.
    pub fn load(&self, name: &str) -> Result<Option<Artifact>, EngineError> {
        let path = self.path_for(name);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(Artifact {
                name: name.to_string(),
                content,
                origin: Origin::PreExisting,
            })),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(EngineError::io(path, e)),
        }
    }

    /// Writes `artifact`, creating the output directory if needed.
    pub fn write(&self, artifact: &Artifact) -> Result<PathBuf, EngineError> {
        fs::create_dir_all(&self.dir).map_err(|e| EngineError::io(&self.dir, e))?;
        let path = self.path_for(&artifact.name);
        fs::write(&path, &artifact.content).map_err(|e| EngineError::io(&path, e))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_load_marks_pre_existing() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path(), "vs");
        assert!(!store.exists("reg_a"));
        assert_eq!(store.load("reg_a").unwrap(), None);

        let path = store
            .write(&Artifact::generated("reg_a", "  a <= a_n;\n"))
            .unwrap();
        assert_eq!(path, dir.path().join("reg_a.vs"));
        assert!(store.exists("reg_a"));

        let loaded = store.load("reg_a").unwrap().unwrap();
        assert_eq!(loaded.content, "  a <= a_n;\n");
        assert_eq!(loaded.origin, Origin::PreExisting);
    }

    #[test]
    fn creates_missing_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("gen/out"), "vs");
        store.write(&Artifact::generated("x", "")).unwrap();
        assert!(dir.path().join("gen/out/x.vs").is_file());
    }
}
