//! Network card RASD item lists.
//!
//! Accepts the item shape returned by the network card listing call, so a
//! VM's cards can be read, edited and written back:
//!
//! ```text
//! {"Item": [{"rasd:Address": "00:50:56:01:01:01",
//!            "rasd:AddressOnParent": "1",
//!            "rasd:AutomaticAllocation": "true",
//!            "rasd:Connection": "NetworkTest3",
//!            ...}]}
//! ```
//!
//! Two generations of the list exist. The first carries the connection as a
//! plain network name; the second adds `vcloud:` attributes (IP address,
//! primary flag, addressing mode) to `rasd:Connection`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ComputeError, Result};
use crate::traits::DocumentBuilder;
use crate::types::{
    one_or_many, DocumentType, Scalar, RASD_ITEMS_LIST_TYPE, RASD_NAMESPACE, VCLOUD_NAMESPACE,
};
use crate::xml::Element;

/// `rasd:ResourceType` for Ethernet adapters.
pub const ETHERNET_RESOURCE_TYPE: &str = "10";

/// Which generation of the RASD items list to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CardGeneration {
    /// Connection is a plain network name.
    #[default]
    V1,
    /// Connection carries IP address, primary flag and addressing mode.
    V2,
}

impl CardGeneration {
    pub fn document_type(&self) -> DocumentType {
        match self {
            CardGeneration::V1 => DocumentType::NetworkCards,
            CardGeneration::V2 => DocumentType::NetworkCardsV2,
        }
    }
}

/// All network cards of a VM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkCardsConfig {
    /// A single item is accepted and treated as a one-element list.
    #[serde(rename = "Item", deserialize_with = "one_or_many::required")]
    pub items: Vec<NetworkCardItem>,
}

/// One network adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkCardItem {
    #[serde(rename = "rasd:Address", alias = "Address")]
    pub address: Scalar,
    #[serde(rename = "rasd:AddressOnParent", alias = "AddressOnParent")]
    pub address_on_parent: Scalar,
    #[serde(rename = "rasd:AutomaticAllocation", alias = "AutomaticAllocation")]
    pub automatic_allocation: Scalar,
    #[serde(rename = "rasd:Connection", alias = "Connection")]
    pub connection: NetworkConnection,
    #[serde(rename = "rasd:Description", alias = "Description")]
    pub description: Scalar,
    #[serde(rename = "rasd:ElementName", alias = "ElementName")]
    pub element_name: Scalar,
    #[serde(rename = "rasd:InstanceID", alias = "InstanceID")]
    pub instance_id: Scalar,
    #[serde(rename = "rasd:ResourceSubType", alias = "ResourceSubType")]
    pub resource_sub_type: Scalar,
}

/// Network connection of a card: a bare network name, or a name with
/// connection attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NetworkConnection {
    Name(Scalar),
    Detailed(ConnectionDetails),
}

impl NetworkConnection {
    pub fn network_name(&self) -> &Scalar {
        match self {
            NetworkConnection::Name(name) => name,
            NetworkConnection::Detailed(details) => &details.value,
        }
    }
}

impl From<&str> for NetworkConnection {
    fn from(name: &str) -> Self {
        NetworkConnection::Name(name.into())
    }
}

/// Connection attributes understood by the second-generation list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionDetails {
    /// Network name (element text).
    #[serde(alias = "Value")]
    pub value: Scalar,
    #[serde(
        default,
        rename = "ipAddress",
        alias = "vcloud:ipAddress",
        skip_serializing_if = "Option::is_none"
    )]
    pub ip_address: Option<Scalar>,
    #[serde(
        default,
        rename = "primaryNetworkConnection",
        alias = "vcloud:primaryNetworkConnection",
        skip_serializing_if = "Option::is_none"
    )]
    pub primary_network_connection: Option<Scalar>,
    #[serde(
        default,
        rename = "ipAddressingMode",
        alias = "vcloud:ipAddressingMode",
        skip_serializing_if = "Option::is_none"
    )]
    pub ip_addressing_mode: Option<Scalar>,
}

/// Builder for `vcloud:RasdItemsList` documents.
pub struct NetworkCardsXmlBuilder<'a> {
    config: &'a NetworkCardsConfig,
    generation: CardGeneration,
}

impl<'a> NetworkCardsXmlBuilder<'a> {
    pub fn new(config: &'a NetworkCardsConfig, generation: CardGeneration) -> Self {
        Self { config, generation }
    }

    fn build_item(&self, item: &NetworkCardItem) -> Result<Element> {
        let mut xml = Element::qualified("vcloud", "Item");
        xml.push_text("rasd:Address", &item.address);
        xml.push_text("rasd:AddressOnParent", &item.address_on_parent);
        xml.push_text("rasd:AutomaticAllocation", &item.automatic_allocation);
        xml.push(self.build_connection(item)?);
        xml.push_text("rasd:Description", &item.description);
        xml.push_text("rasd:ElementName", &item.element_name);
        xml.push_text("rasd:InstanceID", &item.instance_id);
        xml.push_text("rasd:ResourceSubType", &item.resource_sub_type);
        xml.push(Element::text("rasd:ResourceType", ETHERNET_RESOURCE_TYPE));
        Ok(xml)
    }

    fn build_connection(&self, item: &NetworkCardItem) -> Result<Element> {
        match (&item.connection, self.generation) {
            (NetworkConnection::Name(name), _) => {
                Ok(Element::text("rasd:Connection", name.as_str()))
            }
            (NetworkConnection::Detailed(details), CardGeneration::V2) => {
                // The vcloud prefix is declared on the document root.
                Ok(Element::text("rasd:Connection", details.value.as_str())
                    .with_opt_attr("vcloud:ipAddress", details.ip_address.as_ref())
                    .with_opt_attr(
                        "vcloud:primaryNetworkConnection",
                        details.primary_network_connection.as_ref(),
                    )
                    .with_opt_attr("vcloud:ipAddressingMode", details.ip_addressing_mode.as_ref()))
            }
            (NetworkConnection::Detailed(_), CardGeneration::V1) => {
                Err(ComputeError::invalid(format!(
                    "network card {} has connection attributes, which the first-generation list cannot carry",
                    item.instance_id
                )))
            }
        }
    }
}

impl DocumentBuilder for NetworkCardsXmlBuilder<'_> {
    fn document_type(&self) -> DocumentType {
        self.generation.document_type()
    }

    fn build(&self) -> Result<Element> {
        debug!(
            items = self.config.items.len(),
            generation = ?self.generation,
            "Building network card list"
        );

        let mut root = Element::qualified("vcloud", "RasdItemsList")
            .with_attr("xmlns:vcloud", VCLOUD_NAMESPACE)
            .with_attr("xmlns:rasd", RASD_NAMESPACE)
            .with_attr("type", RASD_ITEMS_LIST_TYPE);

        for item in &self.config.items {
            root.push(self.build_item(item)?);
        }

        Ok(root)
    }
}
