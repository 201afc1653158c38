//! # vcd-compute
//!
//! Compiles vCloud Director configuration into request documents.
//!
//! Supported documents:
//! - **Edge gateway services** - firewall, NAT and load balancer
//! - **Network cards** - RASD item lists, with or without connection attributes
//! - **Org vDC networks** - gateway-attached or isolated
//! - **Compose vApp** - parameters for a new vApp
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────┐   deserialize   ┌────────────────┐   build   ┌──────────┐
//! │   ConfigNode   │ ──────────────▶ │  typed config  │ ────────▶ │ Element  │
//! │ (serde_json)   │                 │ (per document) │           │  tree    │
//! └────────────────┘                 └────────────────┘           └────┬─────┘
//!                                                                      │ render
//!                                     ┌────────────────┐               ▼
//!                                     │ ComputeClient  │ ◀──────── XML text
//!                                     │  + Transport   │
//!                                     └────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vcd_compute::{compile, DocumentType};
//! use serde_json::json;
//!
//! let xml = compile(
//!     &json!({"name": "web", "Description": "frontend"}),
//!     DocumentType::ComposeVAppParams,
//! )?;
//! ```

pub mod compiler;
pub mod error;
pub mod generators;
pub mod mock;
pub mod requests;
pub mod traits;
pub mod types;
pub mod xml;

pub use compiler::{compile, compile_document, compile_with, from_node};
pub use error::{ComputeError, Result};
pub use generators::*;
pub use mock::MockTransport;
pub use requests::{ComputeClient, Method, Request, Response};
pub use traits::{DocumentBuilder, Transport};
pub use types::*;
pub use xml::{render, Content, Element, RenderOptions};
