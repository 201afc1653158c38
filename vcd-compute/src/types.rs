//! Shared types: document kinds, namespaces, scalar values and the input
//! normalization helpers used by every configuration model.

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use crate::error::ComputeError;

/// Dynamic configuration node as supplied by callers.
///
/// A missing key and an explicit `null` both mean "absent".
pub type ConfigNode = serde_json::Value;

// =============================================================================
// NAMESPACES AND MEDIA TYPES
// =============================================================================

/// vCloud API 1.5 namespace.
pub const VCLOUD_NAMESPACE: &str = "http://www.vmware.com/vcloud/v1.5";

/// CIM resource allocation setting data namespace.
pub const RASD_NAMESPACE: &str =
    "http://schemas.dmtf.org/wbem/wscim/1/cim-schema/2/CIM_ResourceAllocationSettingData";

/// OVF envelope namespace.
pub const OVF_NAMESPACE: &str = "http://schemas.dmtf.org/ovf/envelope/1";

pub const EDGE_GATEWAY_SERVICE_CONFIGURATION_TYPE: &str =
    "application/vnd.vmware.admin.edgeGatewayServiceConfiguration+xml";
pub const RASD_ITEMS_LIST_TYPE: &str = "application/vnd.vmware.vcloud.rasdItemsList+xml";
pub const ORG_VDC_NETWORK_TYPE: &str = "application/vnd.vmware.vcloud.orgVdcNetwork+xml";
pub const COMPOSE_VAPP_PARAMS_TYPE: &str = "application/vnd.vmware.vcloud.composeVAppParams+xml";
pub const TASK_TYPE: &str = "application/vnd.vmware.vcloud.task+xml";

// =============================================================================
// DOCUMENT TYPES
// =============================================================================

/// Document kinds the compiler can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    /// Edge gateway firewall/NAT/load-balancer configuration.
    #[serde(rename = "edge-gateway")]
    EdgeGatewayServiceConfiguration,
    /// Network card RASD item list, plain connection names.
    #[serde(rename = "network-cards")]
    NetworkCards,
    /// Network card RASD item list with connection attributes.
    #[serde(rename = "network-cards-v2")]
    NetworkCardsV2,
    /// Org vDC network definition.
    #[serde(rename = "org-vdc-network")]
    OrgVdcNetwork,
    /// Compose vApp parameters.
    #[serde(rename = "compose-vapp")]
    ComposeVAppParams,
}

impl DocumentType {
    pub const ALL: [DocumentType; 5] = [
        DocumentType::EdgeGatewayServiceConfiguration,
        DocumentType::NetworkCards,
        DocumentType::NetworkCardsV2,
        DocumentType::OrgVdcNetwork,
        DocumentType::ComposeVAppParams,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::EdgeGatewayServiceConfiguration => "edge-gateway",
            DocumentType::NetworkCards => "network-cards",
            DocumentType::NetworkCardsV2 => "network-cards-v2",
            DocumentType::OrgVdcNetwork => "org-vdc-network",
            DocumentType::ComposeVAppParams => "compose-vapp",
        }
    }

    /// Media type sent as the request `Content-Type`.
    pub fn content_type(&self) -> &'static str {
        match self {
            DocumentType::EdgeGatewayServiceConfiguration => EDGE_GATEWAY_SERVICE_CONFIGURATION_TYPE,
            DocumentType::NetworkCards | DocumentType::NetworkCardsV2 => RASD_ITEMS_LIST_TYPE,
            DocumentType::OrgVdcNetwork => ORG_VDC_NETWORK_TYPE,
            DocumentType::ComposeVAppParams => COMPOSE_VAPP_PARAMS_TYPE,
        }
    }

    /// Qualified name of the document root element.
    pub fn root_element(&self) -> &'static str {
        match self {
            DocumentType::EdgeGatewayServiceConfiguration => "EdgeGatewayServiceConfiguration",
            DocumentType::NetworkCards | DocumentType::NetworkCardsV2 => "vcloud:RasdItemsList",
            DocumentType::OrgVdcNetwork => "OrgVdcNetwork",
            DocumentType::ComposeVAppParams => "ComposeVAppParams",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = ComputeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        DocumentType::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = DocumentType::ALL.iter().map(|t| t.as_str()).collect();
                ComputeError::invalid(format!(
                    "unknown document type '{}' (expected one of: {})",
                    s,
                    known.join(", ")
                ))
            })
    }
}

// =============================================================================
// SCALARS
// =============================================================================

/// A scalar configuration value rendered as element text.
///
/// Accepts strings, booleans and numbers; booleans render as `true`/`false`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Scalar(String);

impl Scalar {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-sensitive comparison against a schema keyword such as `DNAT`.
    pub fn is(&self, keyword: &str) -> bool {
        self.0 == keyword
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self(value.to_string())
    }
}

impl From<u16> for Scalar {
    fn from(value: u16) -> Self {
        Self(value.to_string())
    }
}

impl From<u32> for Scalar {
    fn from(value: u32) -> Self {
        Self(value.to_string())
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ScalarVisitor;

        impl<'de> Visitor<'de> for ScalarVisitor {
            type Value = Scalar;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string, boolean or number")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Scalar, E> {
                Ok(Scalar(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Scalar, E> {
                Ok(Scalar(v))
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Scalar, E> {
                Ok(Scalar(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Scalar, E> {
                Ok(Scalar(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Scalar, E> {
                Ok(Scalar(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Scalar, E> {
                Ok(Scalar(v.to_string()))
            }
        }

        deserializer.deserialize_any(ScalarVisitor)
    }
}

/// A link to another entity (`href` plus optional `name`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub href: Scalar,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Scalar>,
}

impl Reference {
    pub fn new(href: impl Into<Scalar>) -> Self {
        Self {
            href: href.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<Scalar>) -> Self {
        self.name = Some(name.into());
        self
    }
}

// =============================================================================
// SINGLE-OR-MANY NORMALIZATION
// =============================================================================

/// A repeatable block given either as one node or as a sequence of nodes.
struct OneOrMany<T>(Vec<T>);

impl<'de, T: Deserialize<'de>> Deserialize<'de> for OneOrMany<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OneOrManyVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for OneOrManyVisitor<T> {
            type Value = OneOrMany<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a node or a sequence of nodes")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(item) = seq.next_element()? {
                    items.push(item);
                }
                Ok(OneOrMany(items))
            }

            fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
                let item = T::deserialize(de::value::MapAccessDeserializer::new(map))?;
                Ok(OneOrMany(vec![item]))
            }
        }

        deserializer.deserialize_any(OneOrManyVisitor(PhantomData))
    }
}

/// `deserialize_with` helpers for repeatable blocks.
///
/// `required` fails when the key is missing, `optional` keeps absence
/// distinct from an empty list, `or_empty` treats absence as an empty list.
pub(crate) mod one_or_many {
    use super::OneOrMany;
    use serde::{Deserialize, Deserializer};

    pub fn required<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        OneOrMany::<T>::deserialize(deserializer).map(|many| many.0)
    }

    pub fn optional<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<OneOrMany<T>>::deserialize(deserializer).map(|many| many.map(|m| m.0))
    }

    pub fn or_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        optional(deserializer).map(Option::unwrap_or_default)
    }
}
