//! Built-in generators and external generator scripts.

mod axi;
mod counter;
mod fsm;
mod instantiate;
mod mem;
mod mmio;
mod reg;
mod script;

pub use axi::Axi;
pub use counter::Counter;
pub use fsm::Fsm;
pub use instantiate::Instantiate;
pub use mem::Memory;
pub use mmio::Mmio;
pub use reg::{Register, RegisterBank};
pub use script::ScriptGenerator;

use crate::args::split_fields;
use crate::catalog::Catalog;
use crate::errors::EngineError;
use crate::generator::{GenerateRequest, GeneratorRegistry};

/// Registers the built-in generators in resolver order.
pub fn register_builtin_generators(registry: &mut GeneratorRegistry) {
    registry.register(Box::new(Instantiate));
    registry.register(Box::new(RegisterBank));
    registry.register(Box::new(Counter));
    registry.register(Box::new(Fsm));
    registry.register(Box::new(Memory));
    registry.register(Box::new(Mmio));
    registry.register(Box::new(Axi));
}

/// Registers one [`ScriptGenerator`] per catalog script, after the built-ins.
///
/// A script whose name is already registered is skipped.
pub fn register_script_generators(registry: &mut GeneratorRegistry, catalog: &Catalog, interpreter: &str) {
    for entry in catalog.scripts() {
        if registry.get(entry.stem()).is_some() {
            log::debug!("script {} shadowed by a built-in generator", entry.path.display());
            continue;
        }
        registry.register(Box::new(ScriptGenerator::new(
            entry.stem(),
            &entry.path,
            interpreter,
        )));
    }
}

/// Splits positional fields, mapping grouping errors to the request target.
fn fields(request: &GenerateRequest, text: &str) -> Result<Vec<String>, EngineError> {
    split_fields(text).map_err(|e| EngineError::from_split(&request.target, e))
}

/// Returns field `index` with an optional `key=` prefix removed, or `""`.
fn field<'a>(fields: &'a [String], index: usize, key: &str) -> &'a str {
    let Some(value) = fields.get(index) else {
        return "";
    };
    value
        .strip_prefix(key)
        .and_then(|v| v.strip_prefix('='))
        .unwrap_or(value.as_str())
        .trim()
}

/// Lines of a block argument list.
fn block_lines(arguments: &str) -> impl Iterator<Item = &str> {
    arguments.lines().map(str::trim).filter(|l| !l.is_empty())
}

/// Declaration range for a width expression: `""` for one bit,
/// `[N-1:0] ` otherwise.
fn range_prefix(width: &str) -> String {
    match width.parse::<u64>() {
        Ok(1) => String::new(),
        Ok(bits) => format!("[{}:0] ", bits.saturating_sub(1)),
        Err(_) => format!("[{width}-1:0] "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyed_and_positional_fields() {
        let fields: Vec<String> = ["cnt", "size=8", "", "rst=clear"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(field(&fields, 1, "size"), "8");
        assert_eq!(field(&fields, 2, "rst_val"), "");
        assert_eq!(field(&fields, 3, "rst"), "clear");
        assert_eq!(field(&fields, 9, "next"), "");
        // A different key is kept as the value.
        assert_eq!(field(&fields, 3, "en"), "rst=clear");
    }

    #[test]
    fn declaration_ranges() {
        assert_eq!(range_prefix("1"), "");
        assert_eq!(range_prefix("8"), "[7:0] ");
        assert_eq!(range_prefix("DATA_WIDTH"), "[DATA_WIDTH-1:0] ");
    }

    #[test]
    fn builtin_order() {
        let mut registry = GeneratorRegistry::new();
        register_builtin_generators(&mut registry);
        assert_eq!(
            registry.names(),
            vec!["instantiate", "reg", "counter", "FSM", "mem", "mmio", "AXI"]
        );
    }
}
