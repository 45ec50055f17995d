//! Recognition of `include "TARGET.vs"` directives in source text.
//!
//! A directive whose target does not carry the snippet extension is an
//! ordinary preprocessor include and passes through untouched. Arguments come
//! in two shapes:
//!
//! ```text
//!   `include "counter_tick.vs" // 8, tick_en
//!   `include "FSM_ctrl.vs" /*
//!     IDLE -> RUN, start_i
//!     RUN -> IDLE, stop_i
//!   */
//! ```

use std::sync::LazyLock;

use regex::Regex;
use vsnip_source::{FileId, Span};

use crate::errors::EngineError;

static DIRECTIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^([ \t]*)`include[ \t]+"([^"]+)"(.*)$"#).expect("directive pattern is valid")
});

fn push_entries(chunk: &str, entries: &mut Vec<String>) {
    for entry in chunk.lines().map(str::trim).filter(|l| !l.is_empty()) {
        entries.push(entry.to_string());
    }
}

/// How a directive carries its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveForm {
    /// Arguments in a trailing `//` comment on the same line.
    Line,
    /// One logical entry per line inside a `/* ... */` block.
    Block,
}

/// A parsed directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// Artifact name without extension, e.g. `FSM_ctrl`.
    pub target: String,
    /// Argument text. Block arguments are trimmed and joined with `\n`.
    pub arguments: String,
    /// Argument shape.
    pub form: DirectiveForm,
    /// Location of the `` `include`` line.
    pub span: Span,
    /// Leading whitespace of the directive line.
    pub indent: String,
}

/// A piece of scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text copied through verbatim, line endings included.
    Text(String),
    /// A directive, replacing its line(s) and the final line ending.
    Directive {
        /// The parsed directive.
        directive: Directive,
        /// Whether the consumed lines ended with a newline.
        newline: bool,
    },
}

/// Splits `text` into pass-through text and snippet directives.
///
/// `base_offset` is the byte offset of `text` inside `file`, so spans stay
/// valid when scanning a module body cut out of a larger source.
pub fn scan_directives(
    text: &str,
    file: FileId,
    base_offset: u32,
    extension: &str,
) -> Result<Vec<Segment>, EngineError> {
    let suffix = format!(".{extension}");
    let mut segments = Vec::new();
    let mut pending = String::new();
    let mut lines = text.split_inclusive('\n');
    let mut offset = base_offset;

    while let Some(raw) = lines.next() {
        let line_start = offset;
        offset += raw.len() as u32;
        let line = raw.trim_end_matches(['\n', '\r']);

        let Some(caps) = DIRECTIVE_RE.captures(line) else {
            pending.push_str(raw);
            continue;
        };
        let Some(target) = caps[2].strip_suffix(suffix.as_str()) else {
            pending.push_str(raw);
            continue;
        };

        let indent = caps[1].to_string();
        let rest = caps[3].trim();
        let span_start = line_start + indent.len() as u32;
        let span = Span::new(file, span_start, line_start + line.len() as u32);
        let mut newline = raw.ends_with('\n');

        let (form, arguments) = if let Some(block) = rest.strip_prefix("/*") {
            let mut entries = Vec::new();
            let mut closed = false;
            if let Some((inner, _)) = block.split_once("*/") {
                push_entries(inner, &mut entries);
                closed = true;
            } else {
                push_entries(block, &mut entries);
                for raw in lines.by_ref() {
                    offset += raw.len() as u32;
                    newline = raw.ends_with('\n');
                    if let Some((inner, _)) = raw.split_once("*/") {
                        push_entries(inner, &mut entries);
                        closed = true;
                        break;
                    }
                    push_entries(raw, &mut entries);
                }
            }
            if !closed {
                return Err(EngineError::malformed(
                    target,
                    "argument block is missing its closing `*/`",
                ));
            }
            (DirectiveForm::Block, entries.join("\n"))
        } else if let Some(comment) = rest.strip_prefix("//") {
            (DirectiveForm::Line, comment.trim().to_string())
        } else {
            (DirectiveForm::Line, String::new())
        };

        if !pending.is_empty() {
            segments.push(Segment::Text(std::mem::take(&mut pending)));
        }
        segments.push(Segment::Directive {
            directive: Directive {
                target: target.to_string(),
                arguments,
                form,
                span,
                indent,
            },
            newline,
        });
    }

    if !pending.is_empty() {
        segments.push(Segment::Text(pending));
    }
    Ok(segments)
}
