//! The uniform generator contract and the registry that dispatches to it.

use vsnip_source::Span;

use crate::artifact::Artifact;
use crate::directive::DirectiveForm;
use crate::engine::Expander;
use crate::errors::EngineError;
use crate::resolve::{resolve, Resolution};

/// Everything a generator gets to know about one directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    /// Artifact name requested by the directive, e.g. `FSM_ctrl`.
    pub target: String,
    /// Target without the generator name and separator, e.g. `ctrl`.
    pub name: String,
    /// Argument text as scanned from the directive.
    pub arguments: String,
    /// Argument shape.
    pub form: DirectiveForm,
    /// Base name of the definition the directive belongs to. Keys the
    /// signal sink.
    pub parent: String,
    /// File name of that definition.
    pub parent_file: String,
    /// Directive location, or [`Span::DUMMY`] for direct requests.
    pub span: Span,
}

/// Produces artifacts for directive targets.
///
/// A generator may return several artifacts; the one named after
/// [`GenerateRequest::target`] is inlined and the rest are written alongside.
/// Net declarations go to [`Expander::signals`] keyed by
/// [`GenerateRequest::parent`].
pub trait Generator {
    /// Name the resolver matches the target against, e.g. `reg`.
    fn name(&self) -> &str;

    /// One-line description for listings.
    fn description(&self) -> &str;

    /// Produces the artifacts for `request`.
    fn generate(
        &self,
        request: &GenerateRequest,
        cx: &mut Expander<'_>,
    ) -> Result<Vec<Artifact>, EngineError>;
}

/// Generators in registration order.
#[derive(Default)]
pub struct GeneratorRegistry {
    generators: Vec<Box<dyn Generator>>,
}

impl GeneratorRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a generator. Earlier registrations win resolver ties.
    pub fn register(&mut self, generator: Box<dyn Generator>) {
        self.generators.push(generator);
    }

    /// Registered names in order.
    pub fn names(&self) -> Vec<&str> {
        self.generators.iter().map(|g| g.name()).collect()
    }

    /// Iterates over registered generators in order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Generator> {
        self.generators.iter().map(|g| g.as_ref())
    }

    /// Number of registered generators.
    pub fn len(&self) -> usize {
        self.generators.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// Looks up a generator by exact name.
    pub fn get(&self, name: &str) -> Option<&dyn Generator> {
        self.iter().find(|g| g.name() == name)
    }

    /// Resolves `target` against the registered names.
    pub fn find(&self, target: &str) -> Option<(&dyn Generator, Resolution)> {
        let resolution = resolve(target, &self.names())?;
        let generator = self.generators.get(resolution.index)?;
        Some((generator.as_ref(), resolution))
    }
}
