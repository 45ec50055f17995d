//! A registered source text with a precomputed line index.

use crate::file_id::FileId;
use std::path::PathBuf;

/// One text known to the [`SourceDb`](crate::SourceDb): a definition source,
/// a snippet, or an artifact produced during the run.
pub struct SourceFile {
    /// Handle of this text.
    pub id: FileId,
    /// Filesystem path, or a synthetic name for in-memory text.
    pub path: PathBuf,
    /// Full text.
    pub content: String,
    /// Byte offset at which each line begins; always starts with 0.
    line_starts: Vec<u32>,
}

impl SourceFile {
    /// Registers `content` under `path` and indexes its lines.
    pub fn new(id: FileId, path: PathBuf, content: String) -> Self {
        let line_starts = compute_line_starts(&content);
        Self {
            id,
            path,
            content,
            line_starts,
        }
    }

    /// Converts a byte offset to a 1-indexed `(line, column)` pair.
    pub fn line_col(&self, byte_offset: u32) -> (u32, u32) {
        let line_idx = match self.line_starts.binary_search(&byte_offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let line = (line_idx as u32) + 1;
        let col = byte_offset - self.line_starts[line_idx] + 1;
        (line, col)
    }

    /// Number of lines in the text.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Returns the text between two byte offsets.
    pub fn snippet(&self, start: u32, end: u32) -> &str {
        &self.content[start as usize..end as usize]
    }
}

fn compute_line_starts(content: &str) -> Vec<u32> {
    let mut starts = vec![0u32];
    for (i, byte) in content.bytes().enumerate() {
        if byte == b'\n' {
            starts.push((i + 1) as u32);
        }
    }
    starts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_file(content: &str) -> SourceFile {
        SourceFile::new(
            FileId::from_raw(0),
            PathBuf::from("top.v"),
            content.to_string(),
        )
    }

    #[test]
    fn line_index() {
        let f = make_file("module top (\n);\nendmodule\n");
        assert_eq!(f.line_starts, vec![0, 13, 16, 26]);
        assert_eq!(f.line_count(), 4);
    }

    #[test]
    fn line_col_resolution() {
        let f = make_file("abc\ndef\nghi");
        assert_eq!(f.line_col(0), (1, 1));
        assert_eq!(f.line_col(5), (2, 2));
        assert_eq!(f.line_col(8), (3, 1));
    }

    #[test]
    fn empty_text() {
        let f = make_file("");
        assert_eq!(f.line_col(0), (1, 1));
        assert_eq!(f.snippet(0, 0), "");
    }
}
