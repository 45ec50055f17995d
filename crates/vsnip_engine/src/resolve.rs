//! Fuzzy matching of an underscore-delimited identifier against a list of
//! candidate names.
//!
//! The identifier `adder_core_fast_u0` is split into tokens and grown one
//! token at a time (`adder`, `adder_core`, `adder_core_fast`, ...). Each
//! candidate scores the largest token count whose prefix string it starts
//! with. The best score wins under a strict greater-than comparison, so on a
//! tie the candidate seen first is kept and the result depends on the order
//! the candidates are supplied in.

/// Outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Identifier prefix that matched, e.g. `adder_core_fast`.
    pub name: String,
    /// Number of identifier tokens in `name`.
    pub matched_tokens: usize,
    /// Identifier remainder after `name` and one separating underscore.
    /// Empty when the whole identifier matched.
    pub remainder: String,
    /// Index of the winning candidate in the supplied list.
    pub index: usize,
}

/// Resolves `identifier` against `candidates`.
///
/// Returns `None` when no candidate starts with even the first token.
pub fn resolve<S: AsRef<str>>(identifier: &str, candidates: &[S]) -> Option<Resolution> {
    let tokens: Vec<&str> = identifier.split('_').collect();
    let mut best: Option<(usize, usize, String)> = None;

    for (index, candidate) in candidates.iter().enumerate() {
        let candidate = candidate.as_ref();
        let mut prefix = String::new();
        for (count, token) in tokens.iter().enumerate().map(|(i, t)| (i + 1, t)) {
            if count > 1 {
                prefix.push('_');
            }
            prefix.push_str(token);
            if !candidate.starts_with(&prefix) {
                continue;
            }
            let current = best.as_ref().map_or(0, |(k, _, _)| *k);
            if count > current {
                best = Some((count, index, prefix.clone()));
            }
        }
    }

    let (matched_tokens, index, name) = best?;
    let remainder = identifier
        .strip_prefix(name.as_str())
        .and_then(|rest| rest.strip_prefix('_'))
        .unwrap_or_default()
        .to_string();
    Some(Resolution {
        name,
        matched_tokens,
        remainder,
        index,
    })
}
