//! Configuration types deserialized from `vsnip.toml`.

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VsnipConfig {
    /// Project metadata.
    #[serde(default)]
    pub project: ProjectMeta,
    /// Source tree scanning.
    #[serde(default)]
    pub scan: ScanConfig,
    /// Where artifacts are written.
    #[serde(default)]
    pub output: OutputConfig,
    /// Recursive expansion limits.
    #[serde(default)]
    pub expand: ExpandConfig,
    /// External generator scripts.
    #[serde(default)]
    pub generators: GeneratorConfig,
}

/// Project metadata.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectMeta {
    /// Display name; the CLI falls back to the root directory name.
    pub name: Option<String>,
}

/// Controls the source catalog walk.
#[derive(Debug, Deserialize)]
pub struct ScanConfig {
    /// Directory names pruned from the walk wherever they appear.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
    /// Extensions of hardware definition sources.
    #[serde(default = "default_definition_extensions")]
    pub definition_extensions: Vec<String>,
    /// Extension of snippet files (directive targets).
    #[serde(default = "default_snippet_extension")]
    pub snippet_extension: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            exclude: default_exclude(),
            definition_extensions: default_definition_extensions(),
            snippet_extension: default_snippet_extension(),
        }
    }
}

/// Artifact output location.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Directory for artifacts and `*_generated_signals.vs` files, relative to the root.
    #[serde(default = "default_output_dir")]
    pub dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

/// Limits on recursive directive expansion.
#[derive(Debug, Deserialize)]
pub struct ExpandConfig {
    /// Maximum include nesting before the run aborts.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for ExpandConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

/// External generator scripts discovered in the source tree.
#[derive(Debug, Deserialize)]
pub struct GeneratorConfig {
    /// Program used to run a script.
    #[serde(default = "default_interpreter")]
    pub interpreter: String,
    /// Extensions that mark a file as a generator script.
    #[serde(default = "default_script_extensions")]
    pub script_extensions: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            interpreter: default_interpreter(),
            script_extensions: default_script_extensions(),
        }
    }
}

fn default_exclude() -> Vec<String> {
    [".git", "build", "generated", "__pycache__"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_definition_extensions() -> Vec<String> {
    vec!["v".to_string(), "sv".to_string()]
}

fn default_snippet_extension() -> String {
    "vs".to_string()
}

fn default_output_dir() -> String {
    ".".to_string()
}

fn default_max_depth() -> usize {
    32
}

fn default_interpreter() -> String {
    "python3".to_string()
}

fn default_script_extensions() -> Vec<String> {
    vec!["py".to_string()]
}
