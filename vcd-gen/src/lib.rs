//! # vcd-gen
//!
//! Command-line front end for `vcd-compute`: reads a YAML or JSON
//! configuration, compiles it into the requested vCloud document and writes
//! the XML to stdout or a file.

pub mod cli;
pub mod config;
pub mod generate;

pub use cli::Args;
pub use config::{Config, LogFormat};
pub use generate::{generate, load_node, parse_node, write_document, InputFormat};
