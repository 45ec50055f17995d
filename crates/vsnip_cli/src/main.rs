//! vsnip CLI: expands snippet directives in a hardware source tree.
//!
//! Provides `vsnip build` to materialize every directive reachable from the
//! project's definition sources, `vsnip expand` to print one fully inlined
//! file, and `vsnip generate` to run a single generator directly.

#![warn(missing_docs)]

mod build;
mod expand;
mod generate;
mod pipeline;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// vsnip: snippet generation and inlining for Verilog sources.
#[derive(Parser, Debug)]
#[command(name = "vsnip", version, about = "Verilog snippet expander")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Output format for diagnostics.
    #[arg(long, global = true, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Project root to scan (defaults to the directory of `--config`, else the
    /// current directory).
    #[arg(long, global = true)]
    pub root: Option<String>,

    /// Path to a custom `vsnip.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Materialize every directive reachable from the definition sources.
    Build,
    /// Print or write one file with every directive inlined.
    Expand(ExpandArgs),
    /// Run one generator directly.
    Generate(GenerateArgs),
}

/// Arguments for the `vsnip expand` subcommand.
#[derive(Parser, Debug)]
pub struct ExpandArgs {
    /// Source file to expand.
    pub file: String,

    /// Write the expanded text here instead of stdout.
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Arguments for the `vsnip generate` subcommand.
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Directive target without extension, e.g. `instantiate_adder_u0`.
    pub target: String,

    /// Argument text as it would follow `//` in a directive.
    #[arg(default_value = "")]
    pub args: String,

    /// Definition the artifact is generated for; keys the signal file.
    #[arg(long, default_value = "top")]
    pub parent: String,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Diagnostic output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Diagnostic output format.
    pub format: ReportFormat,
    /// Optional explicit project root.
    pub root: Option<String>,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => atty_is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };
    colored::control::set_override(color);

    init_logging(cli.verbose, cli.quiet);

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        format: cli.format,
        root: cli.root,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Build => build::run(&global),
        Command::Expand(ref args) => expand::run(args, &global),
        Command::Generate(ref args) => generate::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Default log filter for the given verbosity flags.
fn default_filter(verbose: bool, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    }
}

/// Installs `env_logger`; `RUST_LOG` overrides the flag-derived default.
fn init_logging(verbose: bool, quiet: bool) {
    let env = env_logger::Env::default().default_filter_or(default_filter(verbose, quiet));
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}

/// Rough terminal detection: checks the TERM env var.
fn atty_is_terminal() -> bool {
    std::env::var("TERM").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_build_default() {
        let cli = Cli::parse_from(["vsnip", "build"]);
        assert!(matches!(cli.command, Command::Build));
        assert_eq!(cli.format, ReportFormat::Text);
        assert_eq!(cli.color, ColorChoice::Auto);
        assert!(cli.root.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn parse_expand_with_output() {
        let cli = Cli::parse_from(["vsnip", "expand", "rtl/top.v", "-o", "out/top.v"]);
        match cli.command {
            Command::Expand(ref args) => {
                assert_eq!(args.file, "rtl/top.v");
                assert_eq!(args.output.as_deref(), Some("out/top.v"));
            }
            _ => panic!("expected Expand command"),
        }
    }

    #[test]
    fn parse_expand_to_stdout() {
        let cli = Cli::parse_from(["vsnip", "expand", "top.v"]);
        match cli.command {
            Command::Expand(ref args) => assert!(args.output.is_none()),
            _ => panic!("expected Expand command"),
        }
    }

    #[test]
    fn parse_generate_defaults() {
        let cli = Cli::parse_from(["vsnip", "generate", "counter_tick"]);
        match cli.command {
            Command::Generate(ref args) => {
                assert_eq!(args.target, "counter_tick");
                assert_eq!(args.args, "");
                assert_eq!(args.parent, "top");
            }
            _ => panic!("expected Generate command"),
        }
    }

    #[test]
    fn parse_generate_with_args() {
        let cli = Cli::parse_from([
            "vsnip",
            "generate",
            "mem_fifo",
            "RAM, 16, 8",
            "--parent",
            "soc_top",
        ]);
        match cli.command {
            Command::Generate(ref args) => {
                assert_eq!(args.target, "mem_fifo");
                assert_eq!(args.args, "RAM, 16, 8");
                assert_eq!(args.parent, "soc_top");
            }
            _ => panic!("expected Generate command"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from([
            "vsnip", "--quiet", "--color", "never", "--format", "json", "build",
        ]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.color, ColorChoice::Never);
        assert_eq!(cli.format, ReportFormat::Json);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["vsnip", "build", "--root", "hw", "--verbose"]);
        assert!(cli.verbose);
        assert_eq!(cli.root.as_deref(), Some("hw"));
    }

    #[test]
    fn parse_config_path() {
        let cli = Cli::parse_from(["vsnip", "--config", "hw/vsnip.toml", "build"]);
        assert_eq!(cli.config.as_deref(), Some("hw/vsnip.toml"));
    }

    #[test]
    fn quiet_wins_over_verbose() {
        assert_eq!(default_filter(true, true), "error");
        assert_eq!(default_filter(true, false), "debug");
        assert_eq!(default_filter(false, false), "warn");
    }

    #[test]
    fn missing_subcommand_is_an_error() {
        assert!(Cli::try_parse_from(["vsnip"]).is_err());
    }
}
