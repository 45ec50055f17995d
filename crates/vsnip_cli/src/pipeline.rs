//! Shared pipeline helpers for CLI commands.
//!
//! Project root resolution, config loading, and diagnostic rendering used by
//! `build`, `expand` and `generate`.

use std::path::{Path, PathBuf};

use vsnip_config::VsnipConfig;
use vsnip_diagnostics::{DiagnosticRenderer, DiagnosticSink, Severity, TerminalRenderer};
use vsnip_engine::{Engine, EngineError};
use vsnip_source::{SourceDb, Span};

use crate::{GlobalArgs, ReportFormat};

/// Resolves the project root directory from global CLI args.
///
/// `--root` wins. Otherwise, if `--config` is specified, uses that path
/// (file → parent dir, dir → itself). Otherwise the current directory.
pub fn resolve_project_root(global: &GlobalArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(ref root) = global.root {
        let p = PathBuf::from(root);
        if !p.is_dir() {
            return Err(format!("project root {} is not a directory", p.display()).into());
        }
        return Ok(p);
    }
    if let Some(ref config_path) = global.config {
        let p = PathBuf::from(config_path);
        if p.is_file() {
            Ok(p.parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".")))
        } else {
            Ok(p)
        }
    } else {
        Ok(std::env::current_dir()?)
    }
}

/// Loads the configuration for `root`.
///
/// An explicit `--config` file must exist; otherwise `<root>/vsnip.toml` is
/// used when present and the defaults when not.
pub fn load_project_config(
    root: &Path,
    global: &GlobalArgs,
) -> Result<VsnipConfig, Box<dyn std::error::Error>> {
    match global.config {
        Some(ref config_path) if Path::new(config_path).is_file() => {
            let content = std::fs::read_to_string(config_path)?;
            Ok(vsnip_config::load_config_from_str(&content)?)
        }
        _ => Ok(vsnip_config::load_config_or_default(root)?),
    }
}

/// Display name of the project: `[project].name`, else the root directory name.
pub fn project_name(root: &Path, config: &VsnipConfig) -> String {
    if let Some(ref name) = config.project.name {
        return name.clone();
    }
    root.canonicalize()
        .ok()
        .as_deref()
        .unwrap_or(root)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("project")
        .to_string()
}

/// Resolves the root, loads config and opens an engine over the project.
pub fn open_engine(global: &GlobalArgs) -> Result<Engine, Box<dyn std::error::Error>> {
    let root = resolve_project_root(global)?;
    let config = load_project_config(&root, global)?;
    log::debug!("project root {}", root.display());

    if !global.quiet {
        eprintln!("   Scanning {}", project_name(&root, &config));
    }

    let engine = Engine::open(&root, &config)?;
    log::info!(
        "catalog: {} entries, {} generators",
        engine.catalog().entries().len(),
        engine.registry().len()
    );
    Ok(engine)
}

/// Records a fatal engine error in the engine's sink so it renders with the
/// other diagnostics.
pub fn record_fatal(engine: &Engine, err: &EngineError) {
    engine.diagnostics().emit(err.to_diagnostic(Span::DUMMY));
}

/// Renders all diagnostics and the summary line.
///
/// Returns exit code 0 if no errors were recorded, 1 otherwise.
pub fn finish(engine: &Engine, global: &GlobalArgs) -> i32 {
    let sink = engine.diagnostics();
    render_diagnostics(sink, engine.source_db(), global);

    if !global.quiet && global.format == ReportFormat::Text {
        eprintln!(
            "   Result: {} error(s), {} warning(s)",
            sink.error_count(),
            sink.warning_count()
        );
    }

    if sink.has_errors() {
        1
    } else {
        0
    }
}

/// Renders all diagnostics from a sink in the selected format.
///
/// Text goes to stderr through the terminal renderer, JSON to stdout.
/// Returns the number of diagnostics rendered.
pub fn render_diagnostics(sink: &DiagnosticSink, source_db: &SourceDb, global: &GlobalArgs) -> usize {
    let diagnostics = sink.diagnostics();
    match global.format {
        ReportFormat::Text => {
            let renderer = TerminalRenderer::new(global.color);
            for diag in &diagnostics {
                if global.quiet && diag.severity != Severity::Error {
                    continue;
                }
                eprintln!("{}", renderer.render(diag, source_db));
            }
        }
        ReportFormat::Json => {
            let json =
                serde_json::to_string_pretty(&diagnostics).unwrap_or_else(|_| "[]".to_string());
            println!("{json}");
        }
    }
    diagnostics.len()
}
