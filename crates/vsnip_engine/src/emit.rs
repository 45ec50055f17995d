//! Binding of a module signature and rendering of the instantiation text.


use crate::arith::eval_int;
use crate::args::Bindings;
use crate::signature::{ModuleSignature, Port};

/// Tool name written into generated headers.
pub const GENERATOR_TAG: &str = "vsnip";

/// One `.name(value)` connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// Parameter or port name.
    pub name: String,
    /// Connected expression.
    pub value: String,
    /// Declaration comment carried over from the definition.
    pub comment: Option<String>,
    /// `true` if the caller supplied the value.
    pub overridden: bool,
}

/// Width of a synthesized wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireWidth {
    /// Single bit.
    Scalar,
    /// Vector with a known bit count greater than one.
    Bits(u64),
    /// Vector whose upper bound could not be evaluated, e.g. `WIDTH-1`.
    Symbolic(String),
}

impl WireWidth {
    /// Derives a width from a port's range, evaluating `high + 1`.
    pub fn of_port(port: &Port) -> Self {
        let Some(range) = &port.range else {
            return WireWidth::Scalar;
        };
        match eval_int(&format!("{}+1", range.high)) {
            Some(bits) if bits > 1 => WireWidth::Bits(bits as u64),
            Some(_) => WireWidth::Scalar,
            None => WireWidth::Symbolic(range.high.clone()),
        }
    }
}

/// A net declared to connect a port left at its default name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wire {
    /// Net name.
    pub name: String,
    /// Net width.
    pub width: WireWidth,
}

impl Wire {
    /// The `wire ...;` declaration line, without indentation.
    pub fn declaration(&self) -> String {
        match &self.width {
            WireWidth::Scalar => format!("wire {};", self.name),
            WireWidth::Bits(bits) => format!("wire [{}:0] {};", bits - 1, self.name),
            WireWidth::Symbolic(high) => format!("wire [{high}:0] {};", self.name),
        }
    }
}

/// A fully bound instantiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstantiationSpec {
    /// Instantiated module.
    pub callee: String,
    /// Instance name.
    pub instance: String,
    /// Parameter bindings in declaration order.
    pub parameters: Vec<Binding>,
    /// Port bindings in declaration order.
    pub ports: Vec<Binding>,
    /// Wires for every port that received a synthesized name.
    pub wires: Vec<Wire>,
}

impl InstantiationSpec {
    /// Binds `signature` for `instance` using `overrides`.
    ///
    /// Ports without an override connect to `{prefix}{core}{suffix}`, where
    /// `core` is the port name without its `_i`/`_o` suffix. The prefix
    /// defaults to `{module}_` and the suffix to nothing.
    pub fn bind(signature: &ModuleSignature, instance: &str, overrides: &Bindings) -> Self {
        let default_prefix = format!("{}_", signature.name);
        let prefix = overrides.get(Bindings::PREFIX).unwrap_or(&default_prefix);
        let suffix = overrides.get(Bindings::SUFFIX).unwrap_or("");

        let parameters = signature
            .parameters
            .iter()
            .map(|param| {
                let bound = overrides.get(&param.name);
                Binding {
                    name: param.name.clone(),
                    value: bound.unwrap_or(&param.default).to_string(),
                    comment: param.comment.clone(),
                    overridden: bound.is_some(),
                }
            })
            .collect();

        let mut wires = Vec::new();
        let ports = signature
            .ports
            .iter()
            .map(|port| {
                let bound = overrides.get(&port.name);
                let value = match bound {
                    Some(value) => value.to_string(),
                    None => {
                        let name = format!("{prefix}{}{suffix}", port.core_name());
                        wires.push(Wire {
                            name: name.clone(),
                            width: WireWidth::of_port(port),
                        });
                        name
                    }
                };
                Binding {
                    name: port.name.clone(),
                    value,
                    comment: port.comment.clone(),
                    overridden: bound.is_some(),
                }
            })
            .collect();

        Self {
            callee: signature.name.clone(),
            instance: instance.to_string(),
            parameters,
            ports,
            wires,
        }
    }

    /// Renders the instantiation text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push('\n');
        out.push_str(&format!(
            "  // Instantiation of {}, autogenerated by {GENERATOR_TAG}\n",
            self.callee
        ));
        out.push_str(&format!("  {} ", self.callee));
        if !self.parameters.is_empty() {
            out.push_str("#(\n");
            render_list(&mut out, &self.parameters);
            out.push_str("  ) ");
        }
        if self.ports.is_empty() {
            out.push_str(&format!("{} ();\n", self.instance));
        } else {
            out.push_str(&format!("{} (\n", self.instance));
            render_list(&mut out, &self.ports);
            out.push_str("  );\n");
        }
        out
    }
}

// Every line but the last ends with a comma; comments follow the separator.
fn render_list(out: &mut String, bindings: &[Binding]) {
    let last = bindings.len().saturating_sub(1);
    for (i, binding) in bindings.iter().enumerate() {
        out.push_str(&format!("      .{}({})", binding.name, binding.value));
        if i != last {
            out.push(',');
        }
        if let Some(comment) = &binding.comment {
            out.push_str(&format!(" // {comment}"));
        }
        out.push('\n');
    }
}
