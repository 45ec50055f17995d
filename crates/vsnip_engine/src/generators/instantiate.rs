//! `instantiate_{module}_{instance}`: a bound module instantiation.
//!
//! ```text
//! `include "instantiate_adder_u0.vs" // prefix="sum_" WIDTH=16 carry_o=co
//! ```
//!
//! The module part is resolved against the definition sources, the
//! definition's header is expanded and parsed, and every port without an
//! override gets a synthesized wire declared for the parent definition.

use crate::args::Bindings;
use crate::artifact::Artifact;
use crate::emit::InstantiationSpec;
use crate::engine::Expander;
use crate::errors::EngineError;
use crate::generator::{GenerateRequest, Generator};

/// The `instantiate` generator.
pub struct Instantiate;

impl Generator for Instantiate {
    fn name(&self) -> &str {
        "instantiate"
    }

    fn description(&self) -> &str {
        "module instantiation with default port wiring"
    }

    fn generate(
        &self,
        request: &GenerateRequest,
        cx: &mut Expander<'_>,
    ) -> Result<Vec<Artifact>, EngineError> {
        let overrides = Bindings::parse(&request.arguments)
            .map_err(|e| EngineError::from_split(&request.target, e))?;
        if request.name.is_empty() {
            return Err(EngineError::malformed(&request.target, "module name is missing"));
        }

        let (definition, instance) = cx.resolve_definition(&request.name)?;
        if instance.is_empty() {
            return Err(EngineError::malformed(
                &request.target,
                format!("instance name is missing after `{}`", definition.stem()),
            ));
        }
        let module = definition.stem().to_string();
        log::debug!("instantiating {module} as {instance} from {}", definition.path.display());

        let signature = cx.parse_signature(&definition.path, &module)?;
        let spec = InstantiationSpec::bind(&signature, &instance, &overrides);
        let declared = cx.signals().declare_wires(
            &request.parent,
            &format!("Wires for {module} {instance}"),
            &spec.wires,
        )?;
        log::debug!("{declared} of {} wires declared for {}", spec.wires.len(), request.parent);

        Ok(vec![Artifact::generated(&request.target, spec.render())])
    }
}
