//! Terminal rendering of diagnostics.

use crate::diagnostic::Diagnostic;
use crate::label::LabelStyle;
use crate::severity::Severity;
use colored::Colorize;
use vsnip_source::SourceDb;

/// Formats a diagnostic for output.
pub trait DiagnosticRenderer {
    /// Renders one diagnostic.
    fn render(&self, diag: &Diagnostic, source_db: &SourceDb) -> String;
}

/// Renders diagnostics in a rustc-like layout:
///
/// ```text
/// warning[W301]: could not resolve include `mem_fifo.vs`
///   --> rtl/top.v:14:3
///    |
/// 14 |   `include "mem_fifo.vs" // RAM, 16
///    | ^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^ requested here
///    = note: ...
/// ```
pub struct TerminalRenderer {
    /// Whether to emit ANSI colors.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn header(&self, diag: &Diagnostic) -> String {
        let head = format!("{}[{}]", diag.severity, diag.code);
        if !self.color {
            return head;
        }
        match diag.severity {
            Severity::Error => head.red().bold().to_string(),
            Severity::Warning => head.yellow().bold().to_string(),
            Severity::Note => head.cyan().to_string(),
        }
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic, source_db: &SourceDb) -> String {
        let mut out = format!("{}: {}\n", self.header(diag), diag.message);

        if !diag.primary_span.is_dummy() {
            let resolved = source_db.resolve_span(diag.primary_span);
            out.push_str(&format!("  --> {resolved}\n"));

            let file = source_db.get_file(diag.primary_span.file);
            let (line, col) = file.line_col(diag.primary_span.start);
            let line_num = line.to_string();
            let padding = " ".repeat(line_num.len());
            let line_content = get_source_line(&file.content, diag.primary_span.start);

            out.push_str(&format!("{padding} |\n"));
            out.push_str(&format!("{line_num} | {line_content}\n"));

            // Multi-line spans are underlined up to the end of their first line.
            let visible = line_content.len().saturating_sub((col as usize).saturating_sub(1));
            let span_len = (diag.primary_span.len() as usize).clamp(1, visible.max(1));
            let carets = "^".repeat(span_len);
            let col_padding = " ".repeat((col as usize).saturating_sub(1));
            let primary_msg = diag
                .labels
                .iter()
                .find(|l| l.style == LabelStyle::Primary)
                .map(|l| format!(" {}", l.message))
                .unwrap_or_default();

            out.push_str(&format!("{padding} | {col_padding}{carets}{primary_msg}\n"));
        }

        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }
        for help in &diag.help {
            out.push_str(&format!("   = help: {help}\n"));
        }

        out
    }
}

fn get_source_line(content: &str, byte_offset: u32) -> &str {
    let offset = byte_offset as usize;
    let start = content[..offset].rfind('\n').map_or(0, |pos| pos + 1);
    let end = content[offset..]
        .find('\n')
        .map_or(content.len(), |pos| offset + pos);
    &content[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::{Category, DiagnosticCode};
    use crate::label::Label;
    use vsnip_source::Span;

    #[test]
    fn render_warning_with_location() {
        let mut db = SourceDb::new();
        let text = "module top (\n  `include \"mem_x.vs\" // RAM\n);\n";
        let id = db.add_source("top.v", text.to_string());
        let span = Span::new(id, 13, 41);
        let diag = Diagnostic::warning(
            DiagnosticCode::new(Category::Warning, 301),
            "could not resolve include `mem_x.vs`",
            span,
        )
        .with_label(Label::primary(span, "requested here"));

        let out = TerminalRenderer::new(false).render(&diag, &db);
        assert!(out.starts_with("warning[W301]: could not resolve include `mem_x.vs`\n"));
        assert!(out.contains("--> top.v:2:1"));
        assert!(out.contains("2 |   `include \"mem_x.vs\" // RAM"));
        assert!(out.contains("^ requested here"));
    }

    #[test]
    fn render_without_location() {
        let db = SourceDb::new();
        let diag = Diagnostic::error(
            DiagnosticCode::new(Category::Error, 301),
            "definition `adder` not found",
            Span::DUMMY,
        )
        .with_help("add adder.v to the source tree");

        let out = TerminalRenderer::new(false).render(&diag, &db);
        assert!(out.contains("error[E301]: definition `adder` not found"));
        assert!(!out.contains("-->"));
        assert!(out.contains("= help: add adder.v to the source tree"));
    }
}
