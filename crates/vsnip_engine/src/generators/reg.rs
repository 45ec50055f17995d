//! `reg_{name}`: clocked registers with asynchronous reset.
//!
//! Line form, one register named after the target:
//!
//! ```text
//! `include "reg_cnt_q.vs" // 8, 0, clear_i, _en, _n
//! ```
//!
//! Block form, one `name, size, reset value, reset, enable, next` per line.
//! Any field may be written `key=value` with the keys `name`, `size`,
//! `rst_val`, `rst`, `en` and `next`.


use super::{block_lines, field, fields};
use crate::artifact::Artifact;
use crate::directive::DirectiveForm;
use crate::engine::Expander;
use crate::errors::EngineError;
use crate::generator::{GenerateRequest, Generator};

const NAME_SUFFIXES: [&str; 4] = ["_q", "_r", "_reg", "_o"];

/// One register description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Register {
    /// Driven signal, as written.
    pub signal: String,
    /// Signal without a `_q`/`_r`/`_reg`/`_o` suffix; used for derived names.
    pub name: String,
    /// Width expression.
    pub size: String,
    /// Reset value expression.
    pub reset_value: String,
    /// Synchronous clear condition.
    pub reset: Option<String>,
    /// Load enable.
    pub enable: Option<String>,
    /// Next-value expression.
    pub next: String,
}

impl Register {
    /// Builds a register from its six positional fields.
    ///
    /// Missing trailing fields take their defaults. The error is a reason
    /// suitable for [`EngineError::MalformedArguments`].
    pub fn from_fields(fields: &[String]) -> Result<Self, String> {
        if fields.len() > 6 {
            return Err(format!("register takes at most 6 fields, got {}", fields.len()));
        }
        let signal = field(fields, 0, "name");
        if signal.is_empty() {
            return Err("register name is missing".to_string());
        }
        let name = NAME_SUFFIXES
            .iter()
            .find_map(|s| signal.strip_suffix(s).filter(|n| !n.is_empty()))
            .unwrap_or(signal)
            .to_string();

        let size = match field(fields, 1, "size") {
            "" => "1".to_string(),
            s => s.to_string(),
        };
        let reset_value = match field(fields, 2, "rst_val") {
            "" | "0" if size == "1" => "1'b0".to_string(),
            "" | "0" => format!("{{{size}{{1'b0}}}}"),
            v if v.chars().all(|c| c.is_ascii_digit()) => format!("'d{v}"),
            v => v.to_string(),
        };
        let derived = |value: &str| {
            if value.starts_with('_') {
                format!("{name}{value}")
            } else {
                value.to_string()
            }
        };
        let reset = match field(fields, 3, "rst") {
            "" | "None" | "1'b0" => None,
            v => Some(derived(v)),
        };
        let enable = match field(fields, 4, "en") {
            "" | "None" | "1'b1" => None,
            v => Some(derived(v)),
        };
        let next = match field(fields, 5, "next") {
            "" => format!("{name}_n"),
            v => derived(v),
        };

        Ok(Self {
            signal: signal.to_string(),
            name,
            size,
            reset_value,
            reset,
            enable,
            next,
        })
    }

    fn render_update(&self, out: &mut String) {
        out.push_str(&format!("      // Register {}\n", self.signal));
        match (&self.reset, &self.enable) {
            (Some(rst), Some(en)) => {
                out.push_str(&format!("      if ({rst}) begin\n"));
                out.push_str(&format!("        {} <= {};\n", self.signal, self.reset_value));
                out.push_str(&format!("      end else if ({en}) begin\n"));
                out.push_str(&format!("        {} <= {};\n", self.signal, self.next));
                out.push_str("      end\n");
            }
            (Some(rst), None) => {
                out.push_str(&format!("      if ({rst}) begin\n"));
                out.push_str(&format!("        {} <= {};\n", self.signal, self.reset_value));
                out.push_str("      end else begin\n");
                out.push_str(&format!("        {} <= {};\n", self.signal, self.next));
                out.push_str("      end\n");
            }
            (None, Some(en)) => {
                out.push_str(&format!("      if ({en}) begin\n"));
                out.push_str(&format!("        {} <= {};\n", self.signal, self.next));
                out.push_str("      end\n");
            }
            (None, None) => {
                out.push_str(&format!("      {} <= {};\n", self.signal, self.next));
            }
        }
    }
}

/// Renders one `always` block updating every register in `registers`.
pub fn render_registers(label: &str, registers: &[Register]) -> String {
    let mut out = format!("  // Automatically generated register {label}\n");
    out.push_str("  always @(posedge clk_i, posedge arst_i) begin\n");
    out.push_str("    if (arst_i) begin\n");
    for reg in registers {
        out.push_str(&format!("      {} <= {};\n", reg.signal, reg.reset_value));
    }
    out.push_str("    end else begin\n");
    for reg in registers {
        reg.render_update(&mut out);
    }
    out.push_str("    end\n");
    out.push_str("  end\n");
    out
}

/// The `reg` generator.
pub struct RegisterBank;

impl Generator for RegisterBank {
    fn name(&self) -> &str {
        "reg"
    }

    fn description(&self) -> &str {
        "clocked registers with asynchronous reset"
    }

    fn generate(
        &self,
        request: &GenerateRequest,
        _cx: &mut Expander<'_>,
    ) -> Result<Vec<Artifact>, EngineError> {
        let descriptions: Vec<Vec<String>> = match request.form {
            DirectiveForm::Line => {
                let mut line = vec![request.name.clone()];
                line.extend(fields(request, &request.arguments)?);
                vec![line]
            }
            DirectiveForm::Block => block_lines(&request.arguments)
                .map(|l| fields(request, l))
                .collect::<Result<_, _>>()?,
        };
        if descriptions.is_empty() {
            return Err(EngineError::malformed(&request.target, "no registers described"));
        }
        let registers = descriptions
            .iter()
            .map(|f| Register::from_fields(f))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|reason| EngineError::malformed(&request.target, reason))?;

        let content = render_registers(&request.name, &registers);
        Ok(vec![Artifact::generated(&request.target, content)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn reg(fields: &[&str]) -> Register {
        let fields: Vec<String> = fields.iter().map(|s| s.to_string()).collect();
        Register::from_fields(&fields).unwrap()
    }

    #[test]
    fn defaults() {
        let r = reg(&["flag_q"]);
        assert_eq!(r.name, "flag");
        assert_eq!(r.size, "1");
        assert_eq!(r.reset_value, "1'b0");
        assert_eq!(r.reset, None);
        assert_eq!(r.enable, None);
        assert_eq!(r.next, "flag_n");
    }

    #[test]
    fn reset_values() {
        assert_eq!(reg(&["a", "8"]).reset_value, "{8{1'b0}}");
        assert_eq!(reg(&["a", "8", "5"]).reset_value, "'d5");
        assert_eq!(reg(&["a", "8", "8'hFF"]).reset_value, "8'hFF");
    }

    #[test]
    fn underscore_values_derive_from_base_name() {
        let r = reg(&["cnt_reg", "4", "", "_clr", "_en", "_next"]);
        assert_eq!(r.reset.as_deref(), Some("cnt_clr"));
        assert_eq!(r.enable.as_deref(), Some("cnt_en"));
        assert_eq!(r.next, "cnt_next");
    }

    #[test]
    fn keyed_fields_and_inactive_controls() {
        let r = reg(&["name=state_q", "size=2", "rst_val=IDLE", "rst=None", "en=1'b1", "next=state_d"]);
        assert_eq!(r.signal, "state_q");
        assert_eq!(r.reset_value, "IDLE");
        assert_eq!(r.reset, None);
        assert_eq!(r.enable, None);
        assert_eq!(r.next, "state_d");
    }

    #[test]
    fn missing_name_or_extra_fields_are_rejected() {
        let fields: Vec<String> = vec!["".into(), "4".into()];
        assert!(Register::from_fields(&fields).is_err());
        let fields: Vec<String> = (0..7).map(|i| i.to_string()).collect();
        assert!(Register::from_fields(&fields).is_err());
    }

    #[test]
    fn renders_always_block() {
        let text = render_registers("cnt", &[reg(&["cnt_q", "8", "0", "clr_i", "en_i", ""])]);
        assert_eq!(
            text,
            "  // Automatically generated register cnt\n\
             \x20 always @(posedge clk_i, posedge arst_i) begin\n\
             \x20   if (arst_i) begin\n\
             \x20     cnt_q <= {8{1'b0}};\n\
             \x20   end else begin\n\
             \x20     // Register cnt_q\n\
             \x20     if (clr_i) begin\n\
             \x20       cnt_q <= {8{1'b0}};\n\
             \x20     end else if (en_i) begin\n\
             \x20       cnt_q <= cnt_n;\n\
             \x20     end\n\
             \x20   end\n\
             \x20 end\n"
        );
    }
}
