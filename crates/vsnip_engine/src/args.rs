//! Bracket- and quote-aware splitting of directive argument text.
//!
//! Generator arguments routinely contain Verilog groupings such as
//! `{a, b}`, `sig[3:0]` or `(W+1)`, and quoted strings such as
//! `prefix="a,b"`. Delimiters inside those groupings never split a field.

use std::fmt;

/// Failure to split argument text because its groupings do not balance.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SplitError {
    /// A closing bracket has no opener.
    #[error("unbalanced `{found}` at offset {offset}")]
    UnexpectedClose {
        /// The closing bracket.
        found: char,
        /// Byte offset in the argument text.
        offset: usize,
    },
    /// A closing bracket does not match the innermost opener.
    #[error("mismatched `{found}` at offset {offset}, expected `{expected}`")]
    Mismatched {
        /// Closer that would have matched.
        expected: char,
        /// Closer actually found.
        found: char,
        /// Byte offset in the argument text.
        offset: usize,
    },
    /// Text ended with open brackets.
    #[error("unclosed `{open}`")]
    Unclosed {
        /// Innermost unclosed opener.
        open: char,
    },
    /// Text ended inside a quoted string.
    #[error("unterminated string literal")]
    UnterminatedQuote,
}

fn closer_for(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

/// Splits `text` on every delimiter that sits outside brackets and quotes.
///
/// Pieces are trimmed. Empty pieces are kept, since positional argument
/// lists use them for "take the default".
pub fn split_top_level(
    text: &str,
    is_delimiter: impl Fn(char) -> bool,
) -> Result<Vec<String>, SplitError> {
    let mut pieces = Vec::new();
    let mut stack: Vec<char> = Vec::new();
    let mut in_quote = false;
    let mut current = String::new();

    for (offset, c) in text.char_indices() {
        if in_quote {
            in_quote = c != '"';
            current.push(c);
            continue;
        }
        match c {
            '"' => in_quote = true,
            '(' | '[' | '{' => stack.push(c),
            ')' | ']' | '}' => match stack.pop() {
                None => return Err(SplitError::UnexpectedClose { found: c, offset }),
                Some(open) if closer_for(open) != c => {
                    return Err(SplitError::Mismatched {
                        expected: closer_for(open),
                        found: c,
                        offset,
                    })
                }
                Some(_) => {}
            },
            _ if stack.is_empty() && is_delimiter(c) => {
                pieces.push(current.trim().to_string());
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(c);
    }

    if in_quote {
        return Err(SplitError::UnterminatedQuote);
    }
    if let Some(&open) = stack.last() {
        return Err(SplitError::Unclosed { open });
    }
    pieces.push(current.trim().to_string());
    Ok(pieces)
}

/// Splits a positional, comma-separated argument list.
pub fn split_fields(text: &str) -> Result<Vec<String>, SplitError> {
    split_top_level(text, |c| c == ',')
}

/// Splits on whitespace, dropping empty pieces.
pub fn split_words(text: &str) -> Result<Vec<String>, SplitError> {
    Ok(split_top_level(text, char::is_whitespace)?
        .into_iter()
        .filter(|w| !w.is_empty())
        .collect())
}

/// Strips one pair of surrounding double quotes.
pub fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// A caller-supplied `key=value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingOverride {
    /// Parameter or port name, or one of the reserved keys.
    pub key: String,
    /// Value with surrounding quotes removed.
    pub value: String,
}

/// Ordered set of binding overrides parsed from argument text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    entries: Vec<BindingOverride>,
}

impl Bindings {
    /// Reserved key for the synthesized-name prefix.
    pub const PREFIX: &'static str = "prefix";
    /// Reserved key for the synthesized-name suffix.
    pub const SUFFIX: &'static str = "suffix";

    /// Parses whitespace-separated `key=value` tokens.
    ///
    /// Tokens without `=` are positional and ignored. A repeated key keeps
    /// its last value.
    pub fn parse(text: &str) -> Result<Self, SplitError> {
        let mut bindings = Bindings::default();
        for word in split_words(text)? {
            if let Some((key, value)) = word.split_once('=') {
                let key = key.trim();
                if key.is_empty() {
                    continue;
                }
                bindings.insert(key, unquote(value.trim()));
            }
        }
        Ok(bindings)
    }

    /// Adds or replaces a binding.
    pub fn insert(&mut self, key: &str, value: &str) {
        match self.entries.iter_mut().find(|b| b.key == key) {
            Some(existing) => existing.value = value.to_string(),
            None => self.entries.push(BindingOverride {
                key: key.to_string(),
                value: value.to_string(),
            }),
        }
    }

    /// Returns the value bound to `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|b| b.key == key)
            .map(|b| b.value.as_str())
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &BindingOverride> {
        self.entries.iter()
    }
}

impl fmt::Display for BindingOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}
