//! Source text bookkeeping for snippet expansion.
//!
//! Every hardware source, hand-written snippet and generated artifact the
//! engine touches is registered in a [`SourceDb`], so that directives and
//! diagnostics can point back to a `file:line:col` location.

#![warn(missing_docs)]

pub mod file_id;
pub mod resolved_span;
pub mod source_db;
pub mod source_file;
pub mod span;

pub use file_id::FileId;
pub use resolved_span::ResolvedSpan;
pub use source_db::SourceDb;
pub use source_file::SourceFile;
pub use span::Span;
