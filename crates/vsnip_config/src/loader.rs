//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::VsnipConfig;
use std::path::Path;

/// Name of the configuration file looked up at the project root.
pub const CONFIG_FILE_NAME: &str = "vsnip.toml";

/// Loads and validates `<project_dir>/vsnip.toml`.
pub fn load_config(project_dir: &Path) -> Result<VsnipConfig, ConfigError> {
    let content = std::fs::read_to_string(project_dir.join(CONFIG_FILE_NAME))?;
    load_config_from_str(&content)
}

/// Like [`load_config`], but returns the defaults when the file does not exist.
pub fn load_config_or_default(project_dir: &Path) -> Result<VsnipConfig, ConfigError> {
    if project_dir.join(CONFIG_FILE_NAME).is_file() {
        load_config(project_dir)
    } else {
        Ok(VsnipConfig::default())
    }
}

/// Parses and validates configuration text.
pub fn load_config_from_str(content: &str) -> Result<VsnipConfig, ConfigError> {
    let config: VsnipConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &VsnipConfig) -> Result<(), ConfigError> {
    if config.scan.definition_extensions.is_empty() {
        return Err(ConfigError::ValidationError(
            "scan.definition_extensions must not be empty".to_string(),
        ));
    }
    if config.scan.snippet_extension.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "scan.snippet_extension must not be empty".to_string(),
        ));
    }
    if config.expand.max_depth == 0 {
        return Err(ConfigError::ValidationError(
            "expand.max_depth must be greater than 0".to_string(),
        ));
    }
    if config.generators.interpreter.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "generators.interpreter must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.expand.max_depth, 32);
        assert_eq!(config.output.dir, ".");
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[project]
name = "soc"

[scan]
exclude = [".git", "sim"]
definition_extensions = ["v"]
snippet_extension = "vs"

[output]
dir = "generated"

[expand]
max_depth = 8

[generators]
interpreter = "python"
script_extensions = ["py", "pl"]
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.project.name.as_deref(), Some("soc"));
        assert_eq!(config.scan.exclude, vec![".git", "sim"]);
        assert_eq!(config.scan.definition_extensions, vec!["v"]);
        assert_eq!(config.output.dir, "generated");
        assert_eq!(config.expand.max_depth, 8);
        assert_eq!(config.generators.interpreter, "python");
        assert_eq!(config.generators.script_extensions, vec!["py", "pl"]);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config = load_config_from_str("[scan]\nexclude = []\n").unwrap();
        assert!(config.scan.exclude.is_empty());
        assert_eq!(config.scan.definition_extensions, vec!["v", "sv"]);
    }

    #[test]
    fn zero_depth_rejected() {
        let err = load_config_from_str("[expand]\nmax_depth = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn empty_extension_list_rejected() {
        let err = load_config_from_str("[scan]\ndefinition_extensions = []\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn unknown_section_rejected() {
        let err = load_config_from_str("[targets]\nx = 1\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is {{ not toml").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn missing_file_is_io_error_or_default() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(matches!(
            load_config(dir.path()).unwrap_err(),
            ConfigError::IoError(_)
        ));
        let config = load_config_or_default(dir.path()).unwrap();
        assert_eq!(config.scan.snippet_extension, "vs");

        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[output]\ndir = \"out\"\n").unwrap();
        assert_eq!(load_config_or_default(dir.path()).unwrap().output.dir, "out");
    }
}
