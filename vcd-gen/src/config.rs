//! Settings for the generator.
//!
//! ```yaml
//! logging:
//!   level: debug
//!   format: json
//! output:
//!   indent: 4
//!   declaration: true
//! default_document: edge-gateway
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use vcd_compute::{DocumentType, RenderOptions};

use crate::cli::Args;

/// Settings file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/vcd/vcd-gen.yaml";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Document rendering configuration
    pub output: OutputConfig,
    /// Document type used when `--type` is not given
    pub default_document: Option<String>,
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found: {}", path.display()));
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load the settings named on the command line, or the default file if
    /// it exists, or fall back to defaults.
    pub fn resolve(args: &Args) -> Result<Self> {
        let config = match &args.config {
            Some(path) => Self::load(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::load(DEFAULT_CONFIG_PATH)?,
            None => Self::default(),
        };
        Ok(config.with_cli_overrides(args))
    }

    /// Apply CLI argument overrides to the configuration.
    pub fn with_cli_overrides(mut self, args: &Args) -> Self {
        if let Some(ref level) = args.log_level {
            self.logging.level = level.clone();
        }

        if let Some(format) = args.log_format {
            self.logging.format = format;
        }

        if let Some(indent) = args.indent {
            self.output.indent = indent;
        }

        if args.compact {
            self.output.indent = 0;
            self.output.declaration = false;
        }

        if args.no_declaration {
            self.output.declaration = false;
        }

        if let Some(ref document_type) = args.document_type {
            self.default_document = Some(document_type.clone());
        }

        self
    }

    /// The document type to compile.
    pub fn document_type(&self) -> Result<DocumentType> {
        let name = self
            .default_document
            .as_deref()
            .context("No document type given (use --type or set default_document)")?;
        name.parse::<DocumentType>()
            .with_context(|| format!("Unsupported document type: {}", name))
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            indent: self.output.indent,
            declaration: self.output.declaration,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level or filter directive; `RUST_LOG` still wins when set
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::default(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

/// Document rendering configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Spaces per nesting level; 0 renders on one line
    pub indent: usize,
    /// Emit the XML declaration
    pub declaration: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        let options = RenderOptions::default();
        Self {
            indent: options.indent,
            declaration: options.declaration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_renderer() {
        let config = Config::default();

        assert_eq!(config.render_options(), RenderOptions::default());
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_cli_overrides() {
        let args = Args {
            log_level: Some("debug".to_string()),
            document_type: Some("compose-vapp".to_string()),
            compact: true,
            ..Default::default()
        };

        let config = Config::default().with_cli_overrides(&args);

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.render_options(), RenderOptions::compact());
        assert_eq!(config.document_type().unwrap(), DocumentType::ComposeVAppParams);
    }

    #[test]
    fn test_document_type_is_required() {
        let err = Config::default().document_type().unwrap_err();
        assert!(err.to_string().contains("No document type"));
    }

    #[test]
    fn test_unknown_document_type() {
        let config = Config {
            default_document: Some("vapp-template".to_string()),
            ..Default::default()
        };

        assert!(config.document_type().is_err());
    }
}
