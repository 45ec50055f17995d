//! Owner of every text read or produced during one invocation.

use crate::file_id::FileId;
use crate::resolved_span::ResolvedSpan;
use crate::source_file::SourceFile;
use crate::span::Span;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// All texts registered during a run, addressable by [`FileId`].
///
/// A path is registered once: loading it again, or adding the same text
/// under it again, returns the existing id.
pub struct SourceDb {
    files: Vec<SourceFile>,
    by_path: HashMap<PathBuf, FileId>,
}

impl SourceDb {
    /// Creates an empty database.
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            by_path: HashMap::new(),
        }
    }

    /// Reads a file from disk and registers it, unless `path` is already
    /// registered.
    pub fn load_file(&mut self, path: &Path) -> Result<FileId, io::Error> {
        if let Some(&id) = self.by_path.get(path) {
            return Ok(id);
        }
        let content = std::fs::read_to_string(path)?;
        Ok(self.add_source(path.to_path_buf(), content))
    }

    /// Registers in-memory text under `name`.
    ///
    /// Returns the existing id when `name` already holds identical text.
    pub fn add_source(&mut self, name: impl Into<PathBuf>, content: String) -> FileId {
        let name = name.into();
        if let Some(&id) = self.by_path.get(&name) {
            if self.get_file(id).content == content {
                return id;
            }
        }
        let id = FileId::from_raw(self.files.len() as u32);
        self.by_path.insert(name.clone(), id);
        self.files.push(SourceFile::new(id, name, content));
        id
    }

    /// Id of the text registered under `path`, if any.
    pub fn lookup(&self, path: &Path) -> Option<FileId> {
        self.by_path.get(path).copied()
    }

    /// Returns the registered text for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not handed out by this database.
    pub fn get_file(&self, id: FileId) -> &SourceFile {
        &self.files[id.as_raw() as usize]
    }

    /// Number of registered texts.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if nothing has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Translates a span into line/column coordinates.
    pub fn resolve_span(&self, span: Span) -> ResolvedSpan {
        let file = self.get_file(span.file);
        let (start_line, start_col) = file.line_col(span.start);
        let (end_line, end_col) = file.line_col(span.end.saturating_sub(1).max(span.start));
        ResolvedSpan {
            file_path: file.path.clone(),
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Returns the text a span covers.
    pub fn snippet(&self, span: Span) -> &str {
        self.get_file(span.file).snippet(span.start, span.end)
    }
}

impl Default for SourceDb {
    fn default() -> Self {
        Self::new()
    }
}
