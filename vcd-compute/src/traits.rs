//! Core abstractions: document builders and the request transport.

use async_trait::async_trait;

use crate::error::Result;
use crate::requests::{Request, Response};
use crate::types::DocumentType;
use crate::xml::{render, Element, RenderOptions};

/// A typed configuration that can be turned into a vCloud XML document.
///
/// Implementors only assemble the element tree; rendering is shared.
pub trait DocumentBuilder {
    /// The document type this builder produces.
    fn document_type(&self) -> DocumentType;

    /// Build the document tree in schema order.
    ///
    /// Fails with [`ComputeError::InvalidConfiguration`](crate::ComputeError::InvalidConfiguration)
    /// when the configuration cannot be expressed in the schema.
    fn build(&self) -> Result<Element>;

    /// Render the document with the default options.
    fn to_xml(&self) -> Result<String> {
        self.to_xml_with(&RenderOptions::default())
    }

    /// Render the document with explicit options.
    fn to_xml_with(&self, options: &RenderOptions) -> Result<String> {
        render(&self.build()?, options)
    }
}

/// Sends requests to a vCloud Director endpoint.
///
/// The HTTP client lives behind this trait so the request layer can be
/// exercised against [`MockTransport`](crate::MockTransport).
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and return the raw response.
    ///
    /// Status checking is left to the caller.
    async fn send(&self, request: Request) -> Result<Response>;
}
