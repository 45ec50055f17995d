//! `vsnip build`: materialize every directive in the project.
//!
//! 1. Resolve the project root and load `vsnip.toml`
//! 2. Scan the tree into a catalog and register generators
//! 3. Expand each definition source, writing artifacts as they are reached
//! 4. Render diagnostics

use colored::Colorize;

use crate::pipeline::{finish, open_engine, record_fatal};
use crate::GlobalArgs;

/// Runs the `vsnip build` command.
///
/// Returns exit code 0 if no errors, 1 if there are errors.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let mut engine = open_engine(global)?;

    let report = match engine.build() {
        Ok(report) => report,
        Err(e) => {
            record_fatal(&engine, &e);
            return Ok(finish(&engine, global));
        }
    };

    if !global.quiet {
        for path in &report.generated {
            eprintln!("   {} {}", "Generated".green(), path.display());
        }
        eprintln!(
            "   Expanded {} definition(s), {} artifact(s) written",
            report.definitions,
            report.generated.len()
        );
    }

    Ok(finish(&engine, global))
}
