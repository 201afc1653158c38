//! Configuration-to-XML entry point.
//!
//! [`compile`] takes a dynamic [`ConfigNode`], validates its shape by
//! deserializing it into the typed model for the requested document type,
//! and renders the document. Nothing is rendered unless the whole
//! configuration is valid.

use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::generators::{
    CardGeneration, ComposeVAppConfig, ComposeVAppXmlBuilder, EdgeGatewayServiceConfiguration,
    EdgeGatewayXmlBuilder, NetworkCardsConfig, NetworkCardsXmlBuilder, OrgVdcNetworkConfig,
    OrgVdcNetworkXmlBuilder,
};
use crate::traits::DocumentBuilder;
use crate::types::{ConfigNode, DocumentType};
use crate::xml::{Element, RenderOptions};

/// Compile a configuration node into an XML document using default
/// rendering (declaration, two-space indentation).
pub fn compile(configuration: &ConfigNode, document_type: DocumentType) -> Result<String> {
    compile_with(configuration, document_type, &RenderOptions::default())
}

/// Compile a configuration node with explicit rendering options.
#[instrument(skip_all, fields(document_type = %document_type))]
pub fn compile_with(
    configuration: &ConfigNode,
    document_type: DocumentType,
    options: &RenderOptions,
) -> Result<String> {
    let xml = match document_type {
        DocumentType::EdgeGatewayServiceConfiguration => {
            let config: EdgeGatewayServiceConfiguration = from_node(configuration)?;
            EdgeGatewayXmlBuilder::new(&config).to_xml_with(options)?
        }
        DocumentType::NetworkCards => {
            let config: NetworkCardsConfig = from_node(configuration)?;
            NetworkCardsXmlBuilder::new(&config, CardGeneration::V1).to_xml_with(options)?
        }
        DocumentType::NetworkCardsV2 => {
            let config: NetworkCardsConfig = from_node(configuration)?;
            NetworkCardsXmlBuilder::new(&config, CardGeneration::V2).to_xml_with(options)?
        }
        DocumentType::OrgVdcNetwork => {
            let config: OrgVdcNetworkConfig = from_node(configuration)?;
            OrgVdcNetworkXmlBuilder::new(&config).to_xml_with(options)?
        }
        DocumentType::ComposeVAppParams => {
            let config: ComposeVAppConfig = from_node(configuration)?;
            ComposeVAppXmlBuilder::new(&config).to_xml_with(options)?
        }
    };

    debug!(bytes = xml.len(), "Compiled document");
    Ok(xml)
}

/// Compile a configuration node into a document tree without rendering it.
pub fn compile_document(configuration: &ConfigNode, document_type: DocumentType) -> Result<Element> {
    match document_type {
        DocumentType::EdgeGatewayServiceConfiguration => {
            EdgeGatewayXmlBuilder::new(&from_node(configuration)?).build()
        }
        DocumentType::NetworkCards => {
            NetworkCardsXmlBuilder::new(&from_node(configuration)?, CardGeneration::V1).build()
        }
        DocumentType::NetworkCardsV2 => {
            NetworkCardsXmlBuilder::new(&from_node(configuration)?, CardGeneration::V2).build()
        }
        DocumentType::OrgVdcNetwork => OrgVdcNetworkXmlBuilder::new(&from_node(configuration)?).build(),
        DocumentType::ComposeVAppParams => {
            ComposeVAppXmlBuilder::new(&from_node(configuration)?).build()
        }
    }
}

/// Deserialize a configuration node into a typed model.
///
/// Shape errors surface as `InvalidConfiguration`.
pub fn from_node<T: DeserializeOwned>(configuration: &ConfigNode) -> Result<T> {
    Ok(T::deserialize(configuration)?)
}
