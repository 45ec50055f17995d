//! Classification of the files in a source tree.
//!
//! One walk per invocation. Within each directory the files are listed in
//! file-name order before any subdirectory is entered, and subdirectories are
//! then walked in name order. The catalog order (and with it the resolver's
//! tie-breaking) does not depend on the platform's directory listing order.

use std::fs;
use std::path::{Path, PathBuf};

use vsnip_config::VsnipConfig;

use crate::errors::EngineError;

/// What a catalog file is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Hardware definition source, e.g. `adder.v`.
    Definition,
    /// External generator script, e.g. `crc.py`.
    GeneratorScript,
    /// Hand-written or previously generated snippet, e.g. `reg_a.vs`.
    Snippet,
}

/// A classified file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// Path to the file.
    pub path: PathBuf,
    /// Classification.
    pub kind: SourceKind,
}

impl SourceEntry {
    /// File name without its extension.
    pub fn stem(&self) -> &str {
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
    }

    /// File name with its extension.
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
    }
}

/// Walk and classification settings.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Directory names pruned wherever they appear.
    pub exclude: Vec<String>,
    /// Extensions of definition sources.
    pub definition_extensions: Vec<String>,
    /// Extension of snippet files.
    pub snippet_extension: String,
    /// Extensions of generator scripts.
    pub script_extensions: Vec<String>,
}

impl ScanOptions {
    /// Takes the scan settings from a loaded configuration.
    pub fn from_config(config: &VsnipConfig) -> Self {
        Self {
            exclude: config.scan.exclude.clone(),
            definition_extensions: config.scan.definition_extensions.clone(),
            snippet_extension: config.scan.snippet_extension.clone(),
            script_extensions: config.generators.script_extensions.clone(),
        }
    }

    fn classify(&self, path: &Path) -> Option<SourceKind> {
        let ext = path.extension()?.to_str()?;
        if self.definition_extensions.iter().any(|e| e == ext) {
            Some(SourceKind::Definition)
        } else if ext == self.snippet_extension {
            Some(SourceKind::Snippet)
        } else if self.script_extensions.iter().any(|e| e == ext) {
            Some(SourceKind::GeneratorScript)
        } else {
            None
        }
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::from_config(&VsnipConfig::default())
    }
}

/// All classified files under a root, in traversal order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<SourceEntry>,
}

impl Catalog {
    /// Walks `root` and classifies every file that is not pruned.
    pub fn scan(root: &Path, options: &ScanOptions) -> Result<Self, EngineError> {
        let mut entries = Vec::new();
        walk_dir(root, options, &mut entries)?;
        log::debug!("catalog: {} entries under {}", entries.len(), root.display());
        Ok(Self { entries })
    }

    /// Every entry in traversal order.
    pub fn entries(&self) -> &[SourceEntry] {
        &self.entries
    }

    /// Entries of one kind in traversal order.
    pub fn of_kind(&self, kind: SourceKind) -> impl Iterator<Item = &SourceEntry> {
        self.entries.iter().filter(move |e| e.kind == kind)
    }

    /// Definition sources in traversal order.
    pub fn definitions(&self) -> impl Iterator<Item = &SourceEntry> {
        self.of_kind(SourceKind::Definition)
    }

    /// Generator scripts in traversal order.
    pub fn scripts(&self) -> impl Iterator<Item = &SourceEntry> {
        self.of_kind(SourceKind::GeneratorScript)
    }

    /// Definition stems in traversal order; the resolver's candidate list.
    pub fn definition_names(&self) -> Vec<&str> {
        self.definitions().map(SourceEntry::stem).collect()
    }

    /// First definition whose stem is `name`.
    pub fn find_definition(&self, name: &str) -> Option<&SourceEntry> {
        self.definitions().find(|e| e.stem() == name)
    }

    /// First snippet whose stem is `name`.
    pub fn find_snippet(&self, name: &str) -> Option<&SourceEntry> {
        self.of_kind(SourceKind::Snippet).find(|e| e.stem() == name)
    }
}

fn walk_dir(dir: &Path, options: &ScanOptions, out: &mut Vec<SourceEntry>) -> Result<(), EngineError> {
    let mut files = Vec::new();
    let mut subdirs = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| EngineError::io(dir, e))? {
        let entry = entry.map_err(|e| EngineError::io(dir, e))?;
        let path = entry.path();
        if path.is_dir() {
            subdirs.push(path);
        } else {
            files.push(path);
        }
    }
    files.sort();
    subdirs.sort();

    // Files of a directory come before anything below it.
    for path in files {
        if let Some(kind) = options.classify(&path) {
            out.push(SourceEntry { path, kind });
        }
    }
    for path in subdirs {
        let pruned = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| options.exclude.iter().any(|x| x == n));
        if !pruned {
            walk_dir(&path, options, out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn classifies_and_prunes() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "rtl/adder.v");
        touch(dir.path(), "rtl/top.sv");
        touch(dir.path(), "scripts/crc.py");
        touch(dir.path(), "reg_a.vs");
        touch(dir.path(), "README.md");
        touch(dir.path(), "build/stale.v");
        touch(dir.path(), ".git/hooks/x.py");

        let catalog = Catalog::scan(dir.path(), &ScanOptions::default()).unwrap();
        assert_eq!(catalog.entries().len(), 4);
        assert_eq!(catalog.definition_names(), vec!["adder", "top"]);
        assert_eq!(catalog.scripts().count(), 1);
        assert!(catalog.find_snippet("reg_a").is_some());
        assert!(catalog.find_definition("stale").is_none());
    }

    #[test]
    fn traversal_order_is_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["zeta.v", "alpha.v", "mid/beta.v", "gamma.v"] {
            touch(dir.path(), name);
        }
        let catalog = Catalog::scan(dir.path(), &ScanOptions::default()).unwrap();
        assert_eq!(catalog.definition_names(), vec!["alpha", "gamma", "zeta", "beta"]);
    }

    #[test]
    fn files_come_before_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b/deep/d.v", "b/c.v", "a/x.v", "z.v"] {
            touch(dir.path(), name);
        }
        let catalog = Catalog::scan(dir.path(), &ScanOptions::default()).unwrap();
        assert_eq!(catalog.definition_names(), vec!["z", "x", "c", "d"]);
    }

    #[test]
    fn missing_root_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Catalog::scan(&dir.path().join("nope"), &ScanOptions::default()).unwrap_err();
        assert!(matches!(err, EngineError::Io { .. }));
    }
}
