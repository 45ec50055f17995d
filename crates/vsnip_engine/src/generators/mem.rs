//! `mem_{name}`: RAM or ROM array.
//!
//! ```text
//! `include "mem_lut.vs" // ROM, 256, 8, lut.hex
//! ```


use super::{fields, range_prefix};
use crate::artifact::Artifact;
use crate::engine::Expander;
use crate::errors::EngineError;
use crate::generator::{GenerateRequest, Generator};

/// Memory flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryKind {
    /// Read/write memory.
    Ram,
    /// Read-only memory; needs an init file.
    Rom,
}

/// The `mem` generator.
pub struct Memory;

impl Generator for Memory {
    fn name(&self) -> &str {
        "mem"
    }

    fn description(&self) -> &str {
        "RAM or ROM array with signals"
    }

    fn generate(
        &self,
        request: &GenerateRequest,
        cx: &mut Expander<'_>,
    ) -> Result<Vec<Artifact>, EngineError> {
        let args = fields(request, &request.arguments)?;
        let malformed = |reason: &str| EngineError::malformed(&request.target, reason);
        let get = |i: usize| args.get(i).map(String::as_str).unwrap_or_default();
        if args.len() > 4 {
            return Err(malformed("expected `RAM|ROM, depth, width[, init_file]`"));
        }

        let kind = match get(0).to_ascii_uppercase().as_str() {
            "RAM" => MemoryKind::Ram,
            "ROM" => MemoryKind::Rom,
            "" => return Err(malformed("memory type is missing, use RAM or ROM")),
            other => {
                return Err(EngineError::malformed(
                    &request.target,
                    format!("invalid memory type `{other}`, use RAM or ROM"),
                ))
            }
        };
        let (depth, width, init_file) = (get(1), get(2), get(3));
        if depth.is_empty() {
            return Err(malformed("memory depth is missing"));
        }
        if width.is_empty() {
            return Err(malformed("memory width is missing"));
        }
        if kind == MemoryKind::Rom && init_file.is_empty() {
            return Err(malformed("a ROM needs an init file"));
        }

        let name = &request.name;
        let data = range_prefix(width);
        let mut signals = format!("  // Automatically generated signals for {name} memory\n");
        signals.push_str(&format!("  reg {data}{name} [0:{depth}-1];\n"));
        signals.push_str(&format!("  wire [$clog2({depth})-1:0] {name}_addr;\n"));
        signals.push_str(&format!("  wire {data}{name}_data_out;\n"));
        signals.push_str(&format!("  wire {name}_read_en;\n"));
        if kind == MemoryKind::Ram {
            signals.push_str(&format!("  wire {data}{name}_data_in;\n"));
            signals.push_str(&format!("  wire {name}_write_en;\n"));
        }
        cx.signals().append(&request.parent, &signals)?;

        let mut out = format!("  // Automatically generated logic for {name} memory\n");
        if !init_file.is_empty() {
            out.push_str("  initial begin\n");
            out.push_str(&format!("    $readmemh(\"{init_file}\", {name});\n"));
            out.push_str("  end\n\n");
        }
        if kind == MemoryKind::Ram {
            out.push_str("  always @(posedge clk_i) begin\n");
            out.push_str(&format!("    if ({name}_write_en) begin\n"));
            out.push_str(&format!("      {name}[{name}_addr] <= {name}_data_in;\n"));
            out.push_str("    end\n");
            out.push_str("  end\n\n");
        }
        out.push_str(&format!("  assign {name}_data_out = {name}[{name}_addr];\n"));

        Ok(vec![Artifact::generated(&request.target, out)])
    }
}
