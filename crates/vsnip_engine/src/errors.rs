//! Engine errors and the diagnostic codes they map to.
//!
//! Error codes `E301`--`E310` are fatal: the invocation stops and the CLI
//! exits non-zero. Warning codes `W301`--`W303` are emitted when a nested
//! directive cannot be materialized and a placeholder comment is inlined
//! instead.

use std::io;
use std::path::PathBuf;

use vsnip_diagnostics::{Category, Diagnostic, DiagnosticCode, Label};
use vsnip_source::Span;

use crate::args::SplitError;

/// No catalog candidate matched the requested identifier.
pub const E301: DiagnosticCode = DiagnosticCode::new(Category::Error, 301);
/// First module declared in a definition differs from the requested name.
pub const E302: DiagnosticCode = DiagnosticCode::new(Category::Error, 302);
/// Generator arguments missing or malformed.
pub const E303: DiagnosticCode = DiagnosticCode::new(Category::Error, 303);
/// A directive includes itself through a chain of artifacts.
pub const E304: DiagnosticCode = DiagnosticCode::new(Category::Error, 304);
/// Include nesting exceeded the configured depth.
pub const E305: DiagnosticCode = DiagnosticCode::new(Category::Error, 305);
/// Definition source contains no module header.
pub const E306: DiagnosticCode = DiagnosticCode::new(Category::Error, 306);
/// A port name appears twice in one module.
pub const E307: DiagnosticCode = DiagnosticCode::new(Category::Error, 307);
/// A generator could not complete.
pub const E308: DiagnosticCode = DiagnosticCode::new(Category::Error, 308);
/// Filesystem error.
pub const E309: DiagnosticCode = DiagnosticCode::new(Category::Error, 309);
/// No generator matched the directive target.
pub const E310: DiagnosticCode = DiagnosticCode::new(Category::Error, 310);

/// Include target could not be resolved to a snippet or a generator.
pub const W301: DiagnosticCode = DiagnosticCode::new(Category::Warning, 301);
/// The generator for an include target failed.
pub const W302: DiagnosticCode = DiagnosticCode::new(Category::Warning, 302);
/// The generator ran but did not produce the requested artifact.
pub const W303: DiagnosticCode = DiagnosticCode::new(Category::Warning, 303);

/// Errors raised by the expansion engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// No definition source matches the identifier.
    #[error("definition for `{identifier}` not found in the source catalog")]
    DefinitionNotFound {
        /// The requested identifier, e.g. `adder_core_u0`.
        identifier: String,
    },

    /// The module parsed from the definition is not the one requested.
    #[error("expected module `{expected}` in {}, found `{found}`", path.display())]
    NameMismatch {
        /// Name derived from the request.
        expected: String,
        /// Name of the first module header in the file.
        found: String,
        /// Definition source path.
        path: PathBuf,
    },

    /// Generator arguments are missing or malformed.
    #[error("malformed arguments for `{target}`: {reason}")]
    MalformedArguments {
        /// Directive target being generated.
        target: String,
        /// What is wrong with the arguments.
        reason: String,
    },

    /// An artifact ends up including itself.
    #[error("cyclic include: {}", chain.join(" -> "))]
    CyclicInclude {
        /// Artifact names from the outermost include to the repeated one.
        chain: Vec<String>,
    },

    /// Include nesting went deeper than the configured limit.
    #[error("include nesting exceeds {limit} levels at `{target}`")]
    IncludeDepthExceeded {
        /// Artifact that would exceed the limit.
        target: String,
        /// Configured maximum depth.
        limit: usize,
    },

    /// The definition source has no `module name ( ... );` header.
    #[error("no module header found in {}", path.display())]
    NoModuleHeader {
        /// Definition source path.
        path: PathBuf,
    },

    /// A port name is declared twice.
    #[error("port `{port}` declared twice in module `{module}`")]
    DuplicatePort {
        /// Module being parsed.
        module: String,
        /// Repeated port name.
        port: String,
    },

    /// A generator could not complete for a reason other than its arguments.
    #[error("generator `{generator}` failed: {reason}")]
    GeneratorFailed {
        /// Generator name.
        generator: String,
        /// Failure description.
        reason: String,
    },

    /// A generator ran but wrote nothing under the requested name.
    #[error("generator `{generator}` produced no artifact named `{target}`")]
    NoArtifact {
        /// Generator name.
        generator: String,
        /// Directive target.
        target: String,
    },

    /// No registered generator matches the target.
    #[error("no generator matches `{target}`")]
    NoGenerator {
        /// Directive target.
        target: String,
    },

    /// Filesystem error.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

impl EngineError {
    /// Wraps an I/O error with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        EngineError::Io {
            path: path.into(),
            source,
        }
    }

    /// Builds a [`EngineError::MalformedArguments`].
    pub fn malformed(target: impl Into<String>, reason: impl Into<String>) -> Self {
        EngineError::MalformedArguments {
            target: target.into(),
            reason: reason.into(),
        }
    }

    /// Builds a [`EngineError::MalformedArguments`] from a splitting failure.
    pub fn from_split(target: impl Into<String>, err: SplitError) -> Self {
        Self::malformed(target, err.to_string())
    }

    /// Returns the diagnostic code for this error.
    pub fn code(&self) -> DiagnosticCode {
        match self {
            EngineError::DefinitionNotFound { .. } => E301,
            EngineError::NameMismatch { .. } => E302,
            EngineError::MalformedArguments { .. } => E303,
            EngineError::CyclicInclude { .. } => E304,
            EngineError::IncludeDepthExceeded { .. } => E305,
            EngineError::NoModuleHeader { .. } => E306,
            EngineError::DuplicatePort { .. } => E307,
            EngineError::GeneratorFailed { .. } | EngineError::NoArtifact { .. } => E308,
            EngineError::Io { .. } => E309,
            EngineError::NoGenerator { .. } => E310,
        }
    }

    /// Returns `true` if this error must abort the run even when it happens
    /// inside a nested directive.
    ///
    /// Everything else is downgraded to a warning plus placeholder comment
    /// when it occurs below the top-level request.
    pub fn aborts_nested_expansion(&self) -> bool {
        matches!(
            self,
            EngineError::CyclicInclude { .. }
                | EngineError::IncludeDepthExceeded { .. }
                | EngineError::Io { .. }
        )
    }

    /// Warning code used when this error is downgraded inside a nested directive.
    pub fn nested_warning_code(&self) -> DiagnosticCode {
        match self {
            EngineError::NoGenerator { .. } | EngineError::DefinitionNotFound { .. } => W301,
            EngineError::NoArtifact { .. } => W303,
            _ => W302,
        }
    }

    /// Renders this error as a fatal diagnostic at `span`.
    pub fn to_diagnostic(&self, span: Span) -> Diagnostic {
        let mut diag = Diagnostic::error(self.code(), self.to_string(), span);
        if !span.is_dummy() {
            diag = diag.with_label(Label::primary(span, "requested here"));
        }
        match self {
            EngineError::DefinitionNotFound { .. } => diag.with_help(
                "instantiation targets are named instantiate_{module}_{instance}",
            ),
            EngineError::CyclicInclude { .. } => {
                diag.with_note("an artifact may not include itself, directly or indirectly")
            }
            _ => diag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        let errors = [
            EngineError::DefinitionNotFound {
                identifier: "x".into(),
            },
            EngineError::malformed("reg_a", "empty"),
            EngineError::CyclicInclude {
                chain: vec!["a".into(), "b".into(), "a".into()],
            },
            EngineError::NoGenerator { target: "q".into() },
        ];
        let codes: Vec<String> = errors.iter().map(|e| e.code().to_string()).collect();
        assert_eq!(codes, vec!["E301", "E303", "E304", "E310"]);
    }

    #[test]
    fn display_messages() {
        let err = EngineError::CyclicInclude {
            chain: vec!["FSM_a".into(), "reg_a".into(), "FSM_a".into()],
        };
        assert_eq!(err.to_string(), "cyclic include: FSM_a -> reg_a -> FSM_a");

        let err = EngineError::NameMismatch {
            expected: "adder".into(),
            found: "adder_fast".into(),
            path: PathBuf::from("rtl/adder.v"),
        };
        assert_eq!(
            err.to_string(),
            "expected module `adder` in rtl/adder.v, found `adder_fast`"
        );
    }

    #[test]
    fn only_structural_errors_abort_nested_expansion() {
        assert!(EngineError::IncludeDepthExceeded {
            target: "a".into(),
            limit: 4
        }
        .aborts_nested_expansion());
        assert!(!EngineError::malformed("mem_a", "missing depth").aborts_nested_expansion());
        assert!(!EngineError::NoGenerator { target: "x".into() }.aborts_nested_expansion());
    }

    #[test]
    fn nested_warning_codes() {
        assert_eq!(
            EngineError::NoGenerator { target: "x".into() }.nested_warning_code(),
            W301
        );
        assert_eq!(
            EngineError::malformed("mem_a", "bad").nested_warning_code(),
            W302
        );
        assert_eq!(
            EngineError::NoArtifact {
                generator: "AXI".into(),
                target: "AXI_lite_m_logic".into()
            }
            .nested_warning_code(),
            W303
        );
    }

    #[test]
    fn diagnostic_carries_code() {
        let diag = EngineError::DefinitionNotFound {
            identifier: "adder_u0".into(),
        }
        .to_diagnostic(Span::DUMMY);
        assert_eq!(diag.code.to_string(), "E301");
        assert!(diag.labels.is_empty());
        assert_eq!(diag.help.len(), 1);
    }
}
