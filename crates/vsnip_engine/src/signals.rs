//! Append-only sink for net declarations shared by generators.
//!
//! Each parent definition gets one accumulation file,
//! `<parent>_generated_signals.<ext>`, that the parent includes to pick up the
//! registers, memories and wires generated on its behalf. The file is only
//! ever appended to.

use std::collections::{HashMap, HashSet};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;

use crate::emit::Wire;
use crate::errors::EngineError;

/// Suffix of accumulation file names, before the extension.
pub const SIGNALS_SUFFIX: &str = "_generated_signals";

/// Handle to the per-parent declaration files.
#[derive(Debug)]
pub struct SignalSink {
    dir: PathBuf,
    extension: String,
    declared: HashMap<String, HashSet<String>>,
}

impl SignalSink {
    /// Creates a sink writing into `dir`.
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
            declared: HashMap::new(),
        }
    }

    /// Artifact name of the accumulation file for `parent`.
    pub fn artifact_name(parent: &str) -> String {
        format!("{parent}{SIGNALS_SUFFIX}")
    }

    /// Returns the parent name if `target` names an accumulation file.
    pub fn parent_of(target: &str) -> Option<&str> {
        target.strip_suffix(SIGNALS_SUFFIX).filter(|p| !p.is_empty())
    }

    /// Path of the accumulation file for `parent`.
    pub fn path_for(&self, parent: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", Self::artifact_name(parent), self.extension))
    }

    /// Appends `text` to the file for `parent`.
    pub fn append(&mut self, parent: &str, text: &str) -> Result<(), EngineError> {
        self.known_lines(parent)?;
        fs::create_dir_all(&self.dir).map_err(|e| EngineError::io(&self.dir, e))?;
        let path = self.path_for(parent);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| EngineError::io(&path, e))?;
        file.write_all(text.as_bytes())
            .map_err(|e| EngineError::io(&path, e))?;
        let lines = self.declared.entry(parent.to_string()).or_default();
        lines.extend(text.lines().map(|l| l.trim().to_string()));
        Ok(())
    }

    /// Appends declarations for `wires` not already in the file for `parent`.
    ///
    /// Returns how many were written.
    pub fn declare_wires(
        &mut self,
        parent: &str,
        header: &str,
        wires: &[Wire],
    ) -> Result<usize, EngineError> {
        let known = self.known_lines(parent)?;
        let mut fresh = Vec::new();
        for wire in wires {
            let line = wire.declaration();
            if !known.contains(&line) && !fresh.contains(&line) {
                fresh.push(line);
            }
        }
        if fresh.is_empty() {
            return Ok(0);
        }
        let mut text = format!("  // {header}\n");
        for line in &fresh {
            text.push_str("  ");
            text.push_str(line);
            text.push('\n');
        }
        self.append(parent, &text)?;
        Ok(fresh.len())
    }

    /// Current content of the file for `parent`, empty if it does not exist.
    pub fn read(&self, parent: &str) -> Result<String, EngineError> {
        let path = self.path_for(parent);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(EngineError::io(path, e)),
        }
    }

    // Trimmed lines already in the file, loaded on first use so declarations
    // left by an earlier run are not repeated.
    fn known_lines(&mut self, parent: &str) -> Result<&HashSet<String>, EngineError> {
        if !self.declared.contains_key(parent) {
            let existing = self.read(parent)?;
            let lines = existing.lines().map(|l| l.trim().to_string()).collect();
            self.declared.insert(parent.to_string(), lines);
        }
        Ok(self.declared.entry(parent.to_string()).or_default())
    }
}
