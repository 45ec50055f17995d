//! `vsnip expand`: inline every directive of one file.

use std::path::PathBuf;

use crate::pipeline::{finish, open_engine, record_fatal};
use crate::{ExpandArgs, GlobalArgs};

/// Runs the `vsnip expand` command.
///
/// The expanded text goes to `--output` if given, else stdout. Nothing is
/// written when a fatal error aborts the expansion.
pub fn run(args: &ExpandArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let mut engine = open_engine(global)?;
    let file = PathBuf::from(&args.file);

    if !global.quiet {
        eprintln!("   Expanding {}", file.display());
    }

    let text = match engine.expand_file(&file) {
        Ok(text) => text,
        Err(e) => {
            record_fatal(&engine, &e);
            return Ok(finish(&engine, global));
        }
    };

    match args.output {
        Some(ref out) => {
            let out = PathBuf::from(out);
            if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&out, &text)?;
            if !global.quiet {
                eprintln!("      Wrote {} ({} bytes)", out.display(), text.len());
            }
        }
        None => print!("{text}"),
    }

    Ok(finish(&engine, global))
}
