//! Diagnostics reported while resolving and expanding snippet directives.
//!
//! Fatal problems (unknown definitions, naming mismatches, malformed
//! arguments) and recoverable ones (an include that could not be
//! materialized) are both reported as [`Diagnostic`]s. The [`DiagnosticSink`]
//! collects them for a run and [`TerminalRenderer`] prints them.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod label;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use label::{Label, LabelStyle};
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
