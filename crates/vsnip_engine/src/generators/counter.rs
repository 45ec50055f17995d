//! `counter_{name}`: free-running or enabled up-counter.
//!
//! ```text
//! `include "counter_tick.vs" // 8, tick_en, tick_clr
//! ```
//!
//! Width is required; enable defaults to `1'b1` and reset to `1'b0`. The
//! register itself is produced by a nested `reg_{name}` directive.

use super::{fields, range_prefix};
use crate::artifact::Artifact;
use crate::directive::DirectiveForm;
use crate::engine::Expander;
use crate::errors::EngineError;
use crate::generator::{GenerateRequest, Generator};

/// The `counter` generator.
pub struct Counter;

impl Generator for Counter {
    fn name(&self) -> &str {
        "counter"
    }

    fn description(&self) -> &str {
        "up-counter built on a generated register"
    }

    fn generate(
        &self,
        request: &GenerateRequest,
        cx: &mut Expander<'_>,
    ) -> Result<Vec<Artifact>, EngineError> {
        if request.form != DirectiveForm::Line {
            return Err(EngineError::malformed(
                &request.target,
                "counter arguments go in a `//` comment",
            ));
        }
        let args = fields(request, &request.arguments)?;
        let (width, enable, reset) = match args.as_slice() {
            [w] => (w.as_str(), "1'b1", "1'b0"),
            [w, en] => (w.as_str(), en.as_str(), "1'b0"),
            [w, en, rst] => (w.as_str(), en.as_str(), rst.as_str()),
            _ => {
                return Err(EngineError::malformed(
                    &request.target,
                    format!("expected 1 to 3 arguments, got {}", args.len()),
                ))
            }
        };
        let width: u32 = width.parse().map_err(|_| {
            EngineError::malformed(&request.target, format!("counter width `{width}` is not an integer"))
        })?;
        if width == 0 {
            return Err(EngineError::malformed(&request.target, "counter width must be positive"));
        }

        let name = &request.name;
        let ext = &cx.options().scan.snippet_extension;
        let content = format!(
            "  // Automatically generated {name}\n\
             \x20 `include \"reg_{name}.{ext}\" // {width}, 0, {reset}, {enable}, {name}_next\n\
             \x20 assign {name}_next = {name} + 1;\n"
        );

        let range = range_prefix(&width.to_string());
        let signals = format!(
            "  // Automatically generated signals for {name} counter\n\
             \x20 reg {range}{name};\n\
             \x20 wire {range}{name}_next;\n"
        );
        cx.signals().append(&request.parent, &signals)?;

        Ok(vec![Artifact::generated(&request.target, content)])
    }
}
