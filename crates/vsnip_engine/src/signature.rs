//! Module header location and parameter/port extraction.
//!
//! Only the constrained declaration style is understood: one declaration per
//! line inside the header parentheses, each line opening with `parameter`,
//! `input`, `output` or `inout`.
//!
//! ```text
//! module adder #(
//!     parameter WIDTH = 8  // operand width
//! ) (
//!     input  wire [WIDTH-1:0] a_i,
//!     output wire [WIDTH:0]   sum_o
//! );
//! ```

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::errors::EngineError;

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ms)^[ \t]*module\s+([A-Za-z_][A-Za-z0-9_$]*)\s*(?:#\s*)?\([ \t]*\r?\n(.*?)\);")
        .expect("module header pattern is valid")
});

static RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\[\]:]*):([^\[\]]*)\]").expect("range pattern is valid")
});

/// Port direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `input`
    Input,
    /// `output`
    Output,
    /// `inout`
    Inout,
}

impl Direction {
    fn from_keyword(line: &str) -> Option<Self> {
        let keyword = line.split_whitespace().next()?;
        match keyword {
            "input" => Some(Direction::Input),
            "output" => Some(Direction::Output),
            "inout" => Some(Direction::Inout),
            _ => None,
        }
    }
}

/// A `[high:low]` range as written in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Range {
    /// Left bound expression.
    pub high: String,
    /// Right bound expression.
    pub low: String,
}

/// A declared parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Default value expression; empty if the declaration has none.
    pub default: String,
    /// Trailing `//` comment text.
    pub comment: Option<String>,
}

/// A declared port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Port {
    /// Port name.
    pub name: String,
    /// Port direction.
    pub direction: Direction,
    /// Last bracketed range of the declaration, if any.
    pub range: Option<Range>,
    /// Trailing `//` comment text.
    pub comment: Option<String>,
}

impl Port {
    /// Port name without a trailing `_i` or `_o` direction suffix.
    pub fn core_name(&self) -> &str {
        self.name
            .strip_suffix("_i")
            .or_else(|| self.name.strip_suffix("_o"))
            .filter(|core| !core.is_empty())
            .unwrap_or(&self.name)
    }
}

/// Parameters and ports of one module, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSignature {
    /// Module name.
    pub name: String,
    /// Parameters in declaration order.
    pub parameters: Vec<Parameter>,
    /// Ports in declaration order.
    pub ports: Vec<Port>,
}

/// The first module header found in a source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleHeader<'a> {
    /// Declared module name.
    pub name: &'a str,
    /// Text between the opening parenthesis line and the closing `);`.
    pub body: &'a str,
    /// Byte offset of `body` in the source text.
    pub body_offset: usize,
}

/// Finds the first `module name ( ... );` header.
pub fn find_module_header(text: &str) -> Option<ModuleHeader<'_>> {
    let caps = HEADER_RE.captures(text)?;
    let name = caps.get(1)?;
    let body = caps.get(2)?;
    Some(ModuleHeader {
        name: name.as_str(),
        body: body.as_str(),
        body_offset: body.start(),
    })
}

/// Splits a line at its first `//` into code and comment text.
pub fn split_comment(line: &str) -> (&str, Option<&str>) {
    match line.split_once("//") {
        Some((code, comment)) => (code.trim(), Some(comment.trim())),
        None => (line.trim(), None),
    }
}

/// Extracts the signature of `module` from its expanded header body.
pub fn extract_signature(module: &str, body: &str) -> Result<ModuleSignature, EngineError> {
    let mut signature = ModuleSignature {
        name: module.to_string(),
        parameters: Vec::new(),
        ports: Vec::new(),
    };
    let mut seen = HashSet::new();

    for line in body.lines() {
        let (code, comment) = split_comment(line);
        let comment = comment.filter(|c| !c.is_empty()).map(str::to_string);

        if code.starts_with("parameter") {
            let (decl, default) = code.split_once('=').unwrap_or((code, ""));
            let Some(name) = decl.split_whitespace().last() else {
                continue;
            };
            signature.parameters.push(Parameter {
                name: name.to_string(),
                default: default.trim().trim_end_matches(',').trim_end().to_string(),
                comment,
            });
        } else if let Some(direction) = Direction::from_keyword(code) {
            let Some(name) = code.split_whitespace().last() else {
                continue;
            };
            let name = name.trim_end_matches(',');
            if !seen.insert(name.to_string()) {
                return Err(EngineError::DuplicatePort {
                    module: module.to_string(),
                    port: name.to_string(),
                });
            }
            let range = RANGE_RE.captures_iter(code).last().map(|caps| Range {
                high: caps[1].trim().to_string(),
                low: caps[2].trim().to_string(),
            });
            signature.ports.push(Port {
                name: name.to_string(),
                direction,
                range,
                comment,
            });
        }
    }

    Ok(signature)
}
