//! Reading configuration files and producing documents.

use anyhow::{Context, Result};
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, info};
use vcd_compute::{compile_with, ConfigNode, DocumentType, RenderOptions};

/// Input format, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    /// YAML; also accepts JSON documents.
    Yaml,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => InputFormat::Json,
            _ => InputFormat::Yaml,
        }
    }
}

/// Parse configuration text into a configuration node.
pub fn parse_node(content: &str, format: InputFormat) -> Result<ConfigNode> {
    let node = match format {
        InputFormat::Json => {
            serde_json::from_str(content).context("Failed to parse JSON configuration")?
        }
        InputFormat::Yaml => {
            serde_yaml::from_str(content).context("Failed to parse YAML configuration")?
        }
    };
    Ok(node)
}

/// Read a configuration node from a file, or from stdin when the path is `-`.
pub fn load_node(path: &Path) -> Result<ConfigNode> {
    if path == Path::new("-") {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read configuration from stdin")?;
        return parse_node(&content, InputFormat::Yaml);
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    debug!(path = %path.display(), bytes = content.len(), "Configuration read");

    parse_node(&content, InputFormat::from_path(path))
        .with_context(|| format!("Invalid configuration file: {}", path.display()))
}

/// Compile the configuration at `input` into a document.
pub fn generate(input: &Path, document_type: DocumentType, options: &RenderOptions) -> Result<String> {
    let node = load_node(input)?;

    let xml = compile_with(&node, document_type, options)
        .with_context(|| format!("Failed to compile {} document", document_type))?;

    info!(
        document_type = %document_type,
        content_type = document_type.content_type(),
        bytes = xml.len(),
        "Document generated"
    );
    Ok(xml)
}

/// Write a document to `output`, or to stdout when no path is given.
pub fn write_document(output: Option<&Path>, xml: &str) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, xml)
            .with_context(|| format!("Failed to write document: {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(xml.as_bytes())
                .and_then(|_| stdout.flush())
                .context("Failed to write document to stdout")
        }
    }
}
