use crate::translate::assemble::{Destination, DEFAULT_SOURCE_PREFIX, DEFAULT_TARGET_ROOT};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Conversion settings, loaded from an optional YAML file and overridden by
/// command line flags.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ConverterConfig {
    /// Identifier prefix given to source files in place of the windup root
    #[serde(default = "default_source_prefix")]
    pub source_prefix: String,
    /// Directory the analyzer rulesets are written under
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Mirror parsed source rulesets as YAML here
    #[serde(default)]
    pub dump_source: Option<PathBuf>,
    /// Write collected diagnostics as JSON here
    #[serde(default)]
    pub report: Option<PathBuf>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            source_prefix: default_source_prefix(),
            output: default_output(),
            dump_source: None,
            report: None,
        }
    }
}

fn default_source_prefix() -> String {
    DEFAULT_SOURCE_PREFIX.to_string()
}

fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_TARGET_ROOT)
}

impl ConverterConfig {
    pub fn destination(&self) -> Destination {
        Destination {
            source_prefix: self.source_prefix.clone(),
            target_root: self.output.to_string_lossy().into_owned(),
        }
    }
}

/// Load configuration from a YAML file
pub fn load_config(path: &Path) -> Result<ConverterConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: ConverterConfig =
        serde_yaml::from_str(&content).with_context(|| "Failed to parse YAML config file")?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = ConverterConfig::default();
        assert_eq!(config.source_prefix, DEFAULT_SOURCE_PREFIX);
        assert_eq!(config.output, PathBuf::from("analyzer-lsp-rules/"));
        assert_eq!(config.destination(), Destination::default());
    }

    #[test]
    fn test_load_partial_config() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        write!(temp_file, "output: converted\nreport: report.json\n")?;

        let config = load_config(temp_file.path())?;
        assert_eq!(config.output, PathBuf::from("converted"));
        assert_eq!(config.report, Some(PathBuf::from("report.json")));
        assert_eq!(config.source_prefix, DEFAULT_SOURCE_PREFIX);
        assert_eq!(config.dump_source, None);
        Ok(())
    }

    #[test]
    fn test_invalid_yaml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "output: [unclosed").unwrap();

        let result = load_config(temp_file.path());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("parse"));
    }

    #[test]
    fn test_file_not_found() {
        let result = load_config(Path::new("nonexistent.yaml"));
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Failed to read config file"));
    }
}
