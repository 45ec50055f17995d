//! `mmio_{name}`: memory-mapped register file.
//!
//! Block form, one register per line:
//!
//! ```text
//! name, size, reset value, reset, enable, next, address, access, default
//! ```
//!
//! The first six fields are those of a `reg` line. `address` is required,
//! `access` defaults to `R/W` and `default` (the next value when not written)
//! to the register itself. The registers are produced by a nested block-form
//! `reg_mmio_{name}` directive.


use super::reg::Register;
use super::{block_lines, field, fields};
use crate::artifact::Artifact;
use crate::engine::Expander;
use crate::errors::EngineError;
use crate::generator::{GenerateRequest, Generator};

const BUS_SIGNALS: &str = "\
  reg [DATA_WIDTH-1:0] r_data;
  wire [DATA_WIDTH-1:0] w_data;
  wire [ADDR_WIDTH-1:0] r_address;
  wire [ADDR_WIDTH-1:0] w_address;
  wire r_enable;
  wire w_enable;
";

/// One memory-mapped register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedRegister {
    /// Underlying register.
    pub reg: Register,
    /// Bus address expression.
    pub address: String,
    /// Access string; readable if it contains `R`, writable if it contains `W`.
    pub access: String,
    /// Next value when the register is not written.
    pub default: String,
}

impl MappedRegister {
    /// Builds a mapped register from its nine positional fields.
    pub fn from_fields(fields: &[String]) -> Result<Self, String> {
        if fields.len() > 9 {
            return Err(format!("register takes at most 9 fields, got {}", fields.len()));
        }
        let reg = Register::from_fields(&fields[..fields.len().min(6)])?;
        let address = field(fields, 6, "address");
        if address.is_empty() {
            return Err(format!("register `{}` has no address", reg.signal));
        }
        let access = match field(fields, 7, "access_type") {
            "" => "R/W",
            a => a,
        };
        let default = match field(fields, 8, "default") {
            "" => reg.signal.clone(),
            d => d.to_string(),
        };
        Ok(Self {
            address: address.to_string(),
            access: access.to_string(),
            default,
            reg,
        })
    }

    fn readable(&self) -> bool {
        self.access.contains('R')
    }

    fn writable(&self) -> bool {
        self.access.contains('W')
    }

    fn read_select(&self) -> String {
        format!("r_{}_sel", self.reg.name)
    }

    fn write_select(&self) -> String {
        format!("w_{}_sel", self.reg.name)
    }

    fn select_term(&self, address: &str) -> String {
        match &self.reg.enable {
            Some(en) => format!("({address} == {}) & ({en})", self.address),
            None => format!("({address} == {})", self.address),
        }
    }
}

/// The `mmio` generator.
pub struct Mmio;

impl Generator for Mmio {
    fn name(&self) -> &str {
        "mmio"
    }

    fn description(&self) -> &str {
        "memory-mapped register file"
    }

    fn generate(
        &self,
        request: &GenerateRequest,
        cx: &mut Expander<'_>,
    ) -> Result<Vec<Artifact>, EngineError> {
        let mut registers = Vec::new();
        for line in block_lines(&request.arguments) {
            let f = fields(request, line)?;
            let reg = MappedRegister::from_fields(&f)
                .map_err(|reason| EngineError::malformed(&request.target, reason))?;
            registers.push(reg);
        }
        if registers.is_empty() {
            return Err(EngineError::malformed(&request.target, "no registers described"));
        }

        let name = &request.name;
        let mut signals = String::from("  // Additional signals for memory mapped registers\n");
        signals.push_str(BUS_SIGNALS);
        for r in &registers {
            if r.writable() {
                signals.push_str(&format!("  wire {};\n", r.write_select()));
            }
            if r.readable() {
                signals.push_str(&format!("  wire {};\n", r.read_select()));
            }
            signals.push_str(&format!("  reg [{}-1:0] {};\n", r.reg.size, r.reg.signal));
            signals.push_str(&format!("  reg [{}-1:0] {};\n", r.reg.size, r.reg.next));
        }
        signals.push('\n');
        cx.signals().append(&request.parent, &signals)?;

        let mut out =
            format!("  // Automatically generated memory mapped registers interface for {name}\n");
        for r in &registers {
            if r.writable() {
                out.push_str(&format!("  assign {} = {};\n", r.write_select(), r.select_term("w_address")));
            }
            if r.readable() {
                out.push_str(&format!("  assign {} = {};\n", r.read_select(), r.select_term("r_address")));
            }
        }

        out.push_str("  // Write memory mapped register always block\n");
        out.push_str("  always @(*) begin\n");
        for r in &registers {
            out.push_str(&format!("    {} = {};\n", r.reg.next, r.default));
        }
        out.push_str("    if (w_enable) begin\n");
        for r in registers.iter().filter(|r| r.writable()) {
            out.push_str(&format!("      if ({}) begin\n", r.write_select()));
            out.push_str(&format!("        {} = w_data;\n", r.reg.next));
            out.push_str("      end\n");
        }
        out.push_str("    end\n");
        out.push_str("  end\n");

        out.push_str("  // Read memory mapped register always block\n");
        out.push_str("  always @(*) begin\n");
        out.push_str("    r_data = 0;\n");
        out.push_str("    if (r_enable) begin\n");
        for r in registers.iter().filter(|r| r.readable()) {
            out.push_str(&format!("      if ({}) begin\n", r.read_select()));
            out.push_str(&format!(
                "        r_data = {{{{(DATA_WIDTH-{}){{1'b0}}}}, {}}};\n",
                r.reg.size, r.reg.signal
            ));
            out.push_str("      end\n");
        }
        out.push_str("    end\n");
        out.push_str("  end\n");

        let ext = &cx.options().scan.snippet_extension;
        out.push_str(&format!("  `include \"reg_mmio_{name}.{ext}\" /*\n"));
        for r in &registers {
            out.push_str(&format!(
                "    {}, {}, {}, {}, , {}\n",
                r.reg.signal,
                r.reg.size,
                r.reg.reset_value,
                r.reg.reset.as_deref().unwrap_or_default(),
                r.reg.next
            ));
        }
        out.push_str("  */\n");

        Ok(vec![Artifact::generated(&request.target, out)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapped(line: &str) -> Result<MappedRegister, String> {
        let f: Vec<String> = line.split(',').map(|s| s.trim().to_string()).collect();
        MappedRegister::from_fields(&f)
    }

    #[test]
    fn defaults() {
        let r = mapped("ctrl_q, 8, , , , , 'h0").unwrap();
        assert_eq!(r.access, "R/W");
        assert_eq!(r.default, "ctrl_q");
        assert_eq!(r.reg.next, "ctrl_n");
        assert_eq!(r.write_select(), "w_ctrl_sel");
        assert_eq!(r.select_term("w_address"), "(w_address == 'h0)");
    }

    #[test]
    fn enable_gates_select() {
        let r = mapped("stat_q, 4, , , unlocked, , 'h4, R, 0").unwrap();
        assert!(r.readable());
        assert!(!r.writable());
        assert_eq!(r.default, "0");
        assert_eq!(r.select_term("r_address"), "(r_address == 'h4) & (unlocked)");
    }

    #[test]
    fn address_is_required() {
        assert!(mapped("ctrl_q, 8").unwrap_err().contains("no address"));
    }
}
