//! Directive expansion and generator dispatch.
//!
//! [`Engine`] owns the state of one invocation: the catalog walked at
//! startup, the artifact store, the signal sink, the source database used for
//! diagnostics and the include stack. [`Expander`] is the handle generators
//! receive, so that a generator can expand text, parse signatures and declare
//! signals while it runs.

use std::fs;
use std::path::{Path, PathBuf};

use vsnip_config::VsnipConfig;
use vsnip_diagnostics::{Diagnostic, DiagnosticSink, Label};
use vsnip_source::{FileId, SourceDb, Span};

use crate::artifact::{Artifact, ArtifactStore, Origin};
use crate::catalog::{Catalog, ScanOptions, SourceEntry};
use crate::directive::{scan_directives, Directive, DirectiveForm, Segment};
use crate::errors::EngineError;
use crate::generator::{GenerateRequest, GeneratorRegistry};
use crate::generators::{register_builtin_generators, register_script_generators};
use crate::resolve::resolve;
use crate::signals::SignalSink;
use crate::signature::{extract_signature, find_module_header, ModuleSignature};

/// Settings for one invocation.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Project root that is scanned.
    pub root: PathBuf,
    /// Directory artifacts and signal files are written to.
    pub output_dir: PathBuf,
    /// Walk and classification settings.
    pub scan: ScanOptions,
    /// Maximum include nesting.
    pub max_depth: usize,
    /// Interpreter for external generator scripts.
    pub interpreter: String,
}

impl EngineOptions {
    /// Builds options for `root` from a loaded configuration.
    pub fn from_config(root: &Path, config: &VsnipConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            output_dir: root.join(&config.output.dir),
            scan: ScanOptions::from_config(config),
            max_depth: config.expand.max_depth,
            interpreter: config.generators.interpreter.clone(),
        }
    }
}

/// Definition a directive is expanded on behalf of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentContext {
    /// Base name; keys the signal sink.
    pub name: String,
    /// File name.
    pub file_name: String,
}

impl ParentContext {
    /// Context for the definition stored at `path`.
    pub fn of_path(path: &Path) -> Self {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        let file_name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        Self { name, file_name }
    }

    /// Context for a bare parent name, e.g. one given on the command line.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            file_name: name.to_string(),
        }
    }
}

/// Mutable state shared by the dispatcher and every generator.
pub struct EngineState {
    options: EngineOptions,
    catalog: Catalog,
    store: ArtifactStore,
    signals: SignalSink,
    source_db: SourceDb,
    diagnostics: DiagnosticSink,
    stack: Vec<String>,
    generated: Vec<PathBuf>,
}

/// Summary of a [`Engine::build`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Definition sources that were expanded.
    pub definitions: usize,
    /// Artifacts written during the run, in order.
    pub generated: Vec<PathBuf>,
}

/// The expansion engine for one invocation.
pub struct Engine {
    registry: GeneratorRegistry,
    state: EngineState,
}

impl Engine {
    /// Scans the project and registers the built-in and script generators.
    pub fn open(root: &Path, config: &VsnipConfig) -> Result<Self, EngineError> {
        let options = EngineOptions::from_config(root, config);
        let catalog = Catalog::scan(&options.root, &options.scan)?;
        let mut registry = GeneratorRegistry::new();
        register_builtin_generators(&mut registry);
        register_script_generators(&mut registry, &catalog, &options.interpreter);
        Ok(Self::with_catalog(options, catalog, registry))
    }

    /// Creates an engine from an already scanned catalog and registry.
    pub fn with_catalog(options: EngineOptions, catalog: Catalog, registry: GeneratorRegistry) -> Self {
        let ext = options.scan.snippet_extension.clone();
        let state = EngineState {
            store: ArtifactStore::new(&options.output_dir, &ext),
            signals: SignalSink::new(&options.output_dir, &ext),
            options,
            catalog,
            source_db: SourceDb::new(),
            diagnostics: DiagnosticSink::new(),
            stack: Vec::new(),
            generated: Vec::new(),
        };
        Self { registry, state }
    }

    /// Handle for expansion calls.
    pub fn expander(&mut self) -> Expander<'_> {
        Expander {
            registry: &self.registry,
            state: &mut self.state,
        }
    }

    /// Expands every directive in the file at `path`.
    pub fn expand_file(&mut self, path: &Path) -> Result<String, EngineError> {
        self.expander().expand_file(path)
    }

    /// Materializes `target` directly, outside any source file.
    ///
    /// Failures are returned instead of being downgraded to warnings.
    pub fn generate(
        &mut self,
        target: &str,
        arguments: &str,
        parent: &ParentContext,
    ) -> Result<Artifact, EngineError> {
        let mut cx = self.expander();
        let form = if arguments.contains('\n') {
            DirectiveForm::Block
        } else {
            DirectiveForm::Line
        };
        let directive = Directive {
            target: target.to_string(),
            arguments: arguments.to_string(),
            form,
            span: Span::DUMMY,
            indent: String::new(),
        };
        cx.state.stack.push(target.to_string());
        let result = cx.materialize(&directive, parent);
        cx.state.stack.pop();
        result
    }

    /// Path an artifact is stored at.
    pub fn artifact_path(&self, name: &str) -> PathBuf {
        self.state.store.path_for(name)
    }

    /// Expands every definition source in the catalog.
    ///
    /// Expanded text is discarded; the point is to leave every reachable
    /// artifact on disk.
    pub fn build(&mut self) -> Result<BuildReport, EngineError> {
        let paths: Vec<PathBuf> = self
            .state
            .catalog
            .definitions()
            .map(|e| e.path.clone())
            .collect();
        for path in &paths {
            log::info!("expanding {}", path.display());
            self.expand_file(path)?;
        }
        Ok(BuildReport {
            definitions: paths.len(),
            generated: self.state.generated.clone(),
        })
    }

    /// Registered generators.
    pub fn registry(&self) -> &GeneratorRegistry {
        &self.registry
    }

    /// Catalog walked at startup.
    pub fn catalog(&self) -> &Catalog {
        &self.state.catalog
    }

    /// Invocation settings.
    pub fn options(&self) -> &EngineOptions {
        &self.state.options
    }

    /// Every file read or generated so far, for rendering diagnostics.
    pub fn source_db(&self) -> &SourceDb {
        &self.state.source_db
    }

    /// Diagnostics emitted so far.
    pub fn diagnostics(&self) -> &DiagnosticSink {
        &self.state.diagnostics
    }

    /// Artifacts written so far, in order.
    pub fn generated(&self) -> &[PathBuf] {
        &self.state.generated
    }
}

// Output of one directive before signal files are filled in.
enum Piece {
    Text(String),
    Signals {
        parent: String,
        indent: String,
        newline: bool,
    },
}

/// Expansion handle passed to generators.
pub struct Expander<'e> {
    registry: &'e GeneratorRegistry,
    state: &'e mut EngineState,
}

impl Expander<'_> {
    /// Loads `path` and expands it on behalf of its own definition.
    pub fn expand_file(&mut self, path: &Path) -> Result<String, EngineError> {
        let file = self
            .state
            .source_db
            .load_file(path)
            .map_err(|e| EngineError::io(path, e))?;
        let content = self.state.source_db.get_file(file).content.clone();
        self.expand_text(&content, file, 0, &ParentContext::of_path(path))
    }

    /// Expands every directive in `text`.
    ///
    /// `base_offset` is where `text` starts inside `file`. Lines that are not
    /// directives are copied through unchanged. A directive that cannot be
    /// materialized becomes a one-line warning comment, unless the failure
    /// aborts expansion altogether (cycles, depth, I/O).
    pub fn expand_text(
        &mut self,
        text: &str,
        file: FileId,
        base_offset: u32,
        parent: &ParentContext,
    ) -> Result<String, EngineError> {
        let segments = scan_directives(text, file, base_offset, self.state.store.extension())?;
        let mut pieces = Vec::with_capacity(segments.len());

        for segment in segments {
            match segment {
                Segment::Text(text) => pieces.push(Piece::Text(text)),
                Segment::Directive { directive, newline } => {
                    if let Some(owner) = SignalSink::parent_of(&directive.target) {
                        pieces.push(Piece::Signals {
                            parent: owner.to_string(),
                            indent: directive.indent.clone(),
                            newline,
                        });
                        continue;
                    }
                    let mut content = self.inline(&directive, parent)?;
                    if newline && !content.is_empty() && !content.ends_with('\n') {
                        content.push('\n');
                    }
                    pieces.push(Piece::Text(content));
                }
            }
        }

        // Signal files are inlined last so they include everything the
        // directives above declared.
        let mut out = String::new();
        for piece in pieces {
            match piece {
                Piece::Text(text) => out.push_str(&text),
                Piece::Signals {
                    parent,
                    indent,
                    newline,
                } => {
                    let content = self.state.signals.read(&parent)?;
                    if content.is_empty() {
                        log::debug!("no generated signals for `{parent}` yet");
                        out.push_str(&indent);
                        out.push_str("// no generated signals\n");
                    } else {
                        out.push_str(&content);
                        if newline && !content.ends_with('\n') {
                            out.push('\n');
                        }
                    }
                }
            }
        }
        Ok(out)
    }

    /// Materializes one directive and returns its fully expanded content.
    pub fn inline(&mut self, directive: &Directive, parent: &ParentContext) -> Result<String, EngineError> {
        let target = &directive.target;
        if self.state.stack.iter().any(|t| t == target) {
            let mut chain = self.state.stack.clone();
            chain.push(target.clone());
            return Err(EngineError::CyclicInclude { chain });
        }
        if self.state.stack.len() >= self.state.options.max_depth {
            return Err(EngineError::IncludeDepthExceeded {
                target: target.clone(),
                limit: self.state.options.max_depth,
            });
        }

        self.state.stack.push(target.clone());
        let result = self.materialize_and_expand(directive, parent);
        self.state.stack.pop();

        match result {
            Ok(content) => Ok(content),
            Err(e) if e.aborts_nested_expansion() => Err(e),
            Err(e) => {
                let file_name = self.state.store.file_name(target);
                log::warn!("{file_name}: {e}");
                let mut diag = Diagnostic::warning(
                    e.nested_warning_code(),
                    format!("`{file_name}` was not substituted: {e}"),
                    directive.span,
                );
                if !directive.span.is_dummy() {
                    diag = diag.with_label(Label::primary(directive.span, "included here"));
                }
                self.state
                    .diagnostics
                    .emit(diag.with_note("a warning comment was inlined in its place"));
                let reason = e.to_string().replace('\n', " ");
                Ok(format!(
                    "{}// WARNING: {file_name} could not be substituted: {reason}\n",
                    directive.indent
                ))
            }
        }
    }

    fn materialize_and_expand(
        &mut self,
        directive: &Directive,
        parent: &ParentContext,
    ) -> Result<String, EngineError> {
        let artifact = self.materialize(directive, parent)?;
        let path = self.state.store.path_for(&artifact.name);
        let file = self.state.source_db.add_source(path, artifact.content.clone());
        self.expand_text(&artifact.content, file, 0, parent)
    }

    /// Returns the artifact for `directive`, generating it if needed.
    ///
    /// Lookup order: the output directory, then snippet files anywhere in the
    /// catalog, then the generator registry.
    pub fn materialize(&mut self, directive: &Directive, parent: &ParentContext) -> Result<Artifact, EngineError> {
        let target = &directive.target;
        if let Some(artifact) = self.state.store.load(target)? {
            log::debug!("reusing {}", self.state.store.path_for(target).display());
            return Ok(artifact);
        }
        let snippet_path = self.state.catalog.find_snippet(target).map(|e| e.path.clone());
        if let Some(path) = snippet_path {
            log::debug!("using snippet {}", path.display());
            let content = fs::read_to_string(&path).map_err(|e| EngineError::io(&path, e))?;
            return Ok(Artifact {
                name: target.clone(),
                content,
                origin: Origin::PreExisting,
            });
        }

        let registry = self.registry;
        let (generator, resolution) = registry.find(target).ok_or_else(|| EngineError::NoGenerator {
            target: target.clone(),
        })?;
        let request = GenerateRequest {
            target: target.clone(),
            name: resolution.remainder,
            arguments: directive.arguments.clone(),
            form: directive.form,
            parent: parent.name.clone(),
            parent_file: parent.file_name.clone(),
            span: directive.span,
        };
        log::debug!("generating {target} with `{}`", generator.name());
        let artifacts = generator.generate(&request, self)?;

        let mut requested = None;
        for artifact in artifacts {
            if artifact.origin == Origin::WrittenByGenerator {
                let path = self.state.store.path_for(&artifact.name);
                log::info!("generated {}", path.display());
                self.state.generated.push(path);
            } else if self.state.store.exists(&artifact.name) {
                log::debug!("keeping existing {}", self.state.store.file_name(&artifact.name));
            } else {
                let path = self.state.store.write(&artifact)?;
                log::info!("generated {}", path.display());
                self.state.generated.push(path);
            }
            if artifact.name == *target {
                requested = Some(artifact);
            }
        }
        requested.ok_or_else(|| EngineError::NoArtifact {
            generator: generator.name().to_string(),
            target: target.clone(),
        })
    }

    /// Resolves `identifier` to a definition source.
    ///
    /// Returns the winning entry and the instance part of the identifier.
    pub fn resolve_definition(&self, identifier: &str) -> Result<(SourceEntry, String), EngineError> {
        let names = self.state.catalog.definition_names();
        let resolution = resolve(identifier, &names).ok_or_else(|| EngineError::DefinitionNotFound {
            identifier: identifier.to_string(),
        })?;
        let entry = self
            .state
            .catalog
            .definitions()
            .nth(resolution.index)
            .cloned()
            .ok_or_else(|| EngineError::DefinitionNotFound {
                identifier: identifier.to_string(),
            })?;
        Ok((entry, resolution.remainder))
    }

    /// Parses the signature of the module defined in `path`.
    ///
    /// The first module header must declare `expected`. Directives in the
    /// header body are expanded first, on behalf of that module, so ports
    /// they contribute are part of the signature.
    pub fn parse_signature(&mut self, path: &Path, expected: &str) -> Result<ModuleSignature, EngineError> {
        let file = self
            .state
            .source_db
            .load_file(path)
            .map_err(|e| EngineError::io(path, e))?;
        let content = self.state.source_db.get_file(file).content.clone();
        let header = find_module_header(&content).ok_or_else(|| EngineError::NoModuleHeader {
            path: path.to_path_buf(),
        })?;
        if header.name != expected {
            return Err(EngineError::NameMismatch {
                expected: expected.to_string(),
                found: header.name.to_string(),
                path: path.to_path_buf(),
            });
        }
        let owner = ParentContext::of_path(path);
        let body = self.expand_text(header.body, file, header.body_offset as u32, &owner)?;
        extract_signature(expected, &body)
    }

    /// Signal sink for net declarations.
    pub fn signals(&mut self) -> &mut SignalSink {
        &mut self.state.signals
    }

    /// Catalog walked at startup.
    pub fn catalog(&self) -> &Catalog {
        &self.state.catalog
    }

    /// Invocation settings.
    pub fn options(&self) -> &EngineOptions {
        &self.state.options
    }

    /// Diagnostic sink of the run.
    pub fn diagnostics(&self) -> &DiagnosticSink {
        &self.state.diagnostics
    }
}
