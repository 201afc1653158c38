//! Command-line argument parsing.

use clap::Parser;
use std::path::PathBuf;

use crate::config::LogFormat;

/// vcd-gen - Compile vCloud Director configuration into request documents
#[derive(Parser, Debug, Default)]
#[command(name = "vcd-gen")]
#[command(about = "Compile vCloud Director configuration files into request documents")]
#[command(version)]
pub struct Args {
    /// Input configuration (YAML or JSON); `-` reads stdin
    pub input: Option<PathBuf>,

    /// Document type (edge-gateway, network-cards, network-cards-v2,
    /// org-vdc-network, compose-vapp)
    #[arg(short = 't', long = "type")]
    pub document_type: Option<String>,

    /// Write the document here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path to settings file (optional, defaults used if not found)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Spaces per nesting level
    #[arg(long)]
    pub indent: Option<usize>,

    /// Single-line output without XML declaration
    #[arg(long)]
    pub compact: bool,

    /// Omit the XML declaration
    #[arg(long)]
    pub no_declaration: bool,

    /// List the supported document types and exit
    #[arg(long)]
    pub list_types: bool,
}
