//! Line/column form of a [`Span`](crate::Span) for display.

use std::fmt;
use std::path::PathBuf;

/// A span translated to 1-indexed line and column numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSpan {
    /// Path (or synthetic name) of the text.
    pub file_path: PathBuf,
    /// First line, 1-indexed.
    pub start_line: u32,
    /// First column, 1-indexed.
    pub start_col: u32,
    /// Last line, 1-indexed.
    pub end_line: u32,
    /// Last column, 1-indexed.
    pub end_col: u32,
}

impl fmt::Display for ResolvedSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.file_path.display(),
            self.start_line,
            self.start_col
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_start_position() {
        let rs = ResolvedSpan {
            file_path: PathBuf::from("rtl/top.v"),
            start_line: 12,
            start_col: 3,
            end_line: 15,
            end_col: 5,
        };
        assert_eq!(rs.to_string(), "rtl/top.v:12:3");
    }
}
