//! # vcd Common
//!
//! Shared utilities for the vcd crates.
//!
//! ## Logging
//!
//! ```rust
//! use vcd_common::init_logging;
//!
//! init_logging("info").unwrap();
//! tracing::info!(document_type = "edge-gateway", "Compiling");
//! ```

pub mod logging;

pub use logging::{init_logging, init_logging_json};
