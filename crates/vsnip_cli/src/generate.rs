//! `vsnip generate`: run one generator outside any source file.

use colored::Colorize;
use vsnip_engine::ParentContext;

use crate::pipeline::{finish, open_engine, record_fatal};
use crate::{GenerateArgs, GlobalArgs};

/// Runs the `vsnip generate` command.
///
/// Resolution and argument errors are fatal here, unlike inside a nested
/// directive. A `\n` in the arguments selects the block form.
pub fn run(args: &GenerateArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let mut engine = open_engine(global)?;
    let parent = ParentContext::named(&args.parent);
    let arguments = args.args.replace("\\n", "\n");

    match engine.generate(&args.target, &arguments, &parent) {
        Ok(artifact) => {
            if !global.quiet {
                let verb = if artifact.origin == vsnip_engine::Origin::PreExisting {
                    "Reused".yellow()
                } else {
                    "Generated".green()
                };
                eprintln!(
                    "   {verb} {}",
                    engine.artifact_path(&artifact.name).display()
                );
            }
        }
        Err(e) => record_fatal(&engine, &e),
    }

    Ok(finish(&engine, global))
}
