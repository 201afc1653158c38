//! # vcd-gen
//!
//! Compiles vCloud Director configuration files into request documents.
//!
//! ## Usage
//! ```bash
//! vcd-gen --type edge-gateway gateway.yaml > services.xml
//! vcd-gen -t network-cards-v2 --compact cards.json -o cards.xml
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use vcd_compute::DocumentType;
use vcd_gen::{generate, write_document, Args, Config, LogFormat};

fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    if args.list_types {
        for document_type in DocumentType::ALL {
            println!("{:<18} {}", document_type, document_type.content_type());
        }
        return Ok(());
    }

    // Load configuration
    let config = Config::resolve(&args)?;

    // Initialize logging
    match config.logging.format {
        LogFormat::Pretty => vcd_common::init_logging(&config.logging.level)?,
        LogFormat::Json => vcd_common::init_logging_json(&config.logging.level)?,
    }

    info!(version = env!("CARGO_PKG_VERSION"), "Starting vcd-gen");

    let input = args
        .input
        .as_deref()
        .context("No input file given (use `-` for stdin)")?;
    let document_type = config.document_type()?;

    let xml = match generate(input, document_type, &config.render_options()) {
        Ok(xml) => xml,
        Err(e) => {
            error!(error = %format!("{:#}", e), "Generation failed");
            return Err(e);
        }
    };

    write_document(args.output.as_deref(), &xml)
}
