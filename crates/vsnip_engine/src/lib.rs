//! Snippet directive expansion for hardware description sources.
//!
//! Source files request generated constructs through directives embedded as
//! preprocessor includes:
//!
//! ```text
//! `include "instantiate_adder_u0.vs" // WIDTH=16
//! `include "FSM_ctrl.vs" /*
//!   IDLE -> RUN, start_i
//! */
//! ```
//!
//! The engine resolves each target to an existing snippet or to a generator,
//! writes the artifact next to the sources and inlines its content, expanding
//! nested directives as it goes.
//!
//! # Pipeline
//!
//! - [`catalog`] walks the tree and classifies definitions, scripts and snippets.
//! - [`mod@resolve`] fuzzy-matches identifiers against catalog and generator names.
//! - [`signature`] extracts parameters and ports from a module header.
//! - [`engine`] dispatches generators and expands directives recursively.
//! - [`emit`] binds a signature and renders the instantiation.

#![warn(missing_docs)]

pub mod args;
pub mod arith;
pub mod artifact;
pub mod catalog;
pub mod directive;
pub mod emit;
pub mod engine;
pub mod errors;
pub mod generator;
pub mod generators;
pub mod resolve;
pub mod signals;
pub mod signature;

pub use args::{Bindings, SplitError};
pub use artifact::{Artifact, ArtifactStore, Origin};
pub use catalog::{Catalog, ScanOptions, SourceEntry, SourceKind};
pub use directive::{Directive, DirectiveForm};
pub use emit::{InstantiationSpec, Wire, WireWidth};
pub use engine::{BuildReport, Engine, EngineOptions, Expander, ParentContext};
pub use errors::EngineError;
pub use generator::{GenerateRequest, Generator, GeneratorRegistry};
pub use generators::register_builtin_generators;
pub use resolve::{resolve, Resolution};
pub use signals::SignalSink;
pub use signature::{Direction, ModuleSignature, Parameter, Port};
