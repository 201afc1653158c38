//! Org vDC network definitions.
//!
//! A network is either attached to an edge gateway (`EdgeGateway href`) or
//! isolated, in which case it may carry its own DHCP service
//! (`ServiceConfig`). The two are mutually exclusive and modelled as
//! [`NetworkAttachment`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ComputeError, Result};
use crate::traits::DocumentBuilder;
use crate::types::{one_or_many, DocumentType, Scalar, ORG_VDC_NETWORK_TYPE, VCLOUD_NAMESPACE};
use crate::xml::Element;

pub const FENCE_MODE_ISOLATED: &str = "isolated";
pub const FENCE_MODE_NAT_ROUTED: &str = "natRouted";
pub const FENCE_MODE_BRIDGED: &str = "bridged";

/// An org vDC network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawOrgVdcNetwork", into = "RawOrgVdcNetwork")]
pub struct OrgVdcNetworkConfig {
    pub name: Scalar,
    pub description: Option<Scalar>,
    pub configuration: Option<NetworkConfiguration>,
    pub attachment: NetworkAttachment,
    pub is_shared: Option<Scalar>,
}

/// How the network reaches the outside world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkAttachment {
    /// Routed through an edge gateway.
    GatewayAttached { href: Scalar },
    /// Not connected to a gateway; optionally serves DHCP itself.
    Isolated { service_config: Option<ServiceConfig> },
}

impl Default for NetworkAttachment {
    fn default() -> Self {
        NetworkAttachment::Isolated {
            service_config: None,
        }
    }
}

impl NetworkAttachment {
    /// Fence mode used when the configuration does not name one.
    pub fn default_fence_mode(&self) -> &'static str {
        match self {
            NetworkAttachment::GatewayAttached { .. } => FENCE_MODE_NAT_ROUTED,
            NetworkAttachment::Isolated { .. } => FENCE_MODE_ISOLATED,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NetworkConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_scopes: Option<IpScopes>,
    #[serde(default, alias = "fence_mode", skip_serializing_if = "Option::is_none")]
    pub fence_mode: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub router_info: Option<RouterInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpScopes {
    #[serde(rename = "IpScope", default, deserialize_with = "one_or_many::or_empty")]
    pub ip_scope: Vec<IpScope>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IpScope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_inherited: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub netmask: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns1: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns2: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns_suffix: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_enabled: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_ranges: Option<IpRanges>,
}

/// `IpRanges` accepts `{"IpRange": [...]}`, a bare list of ranges, or a
/// single range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawIpRanges")]
pub struct IpRanges {
    #[serde(rename = "IpRange")]
    pub ip_range: Vec<IpRange>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawIpRanges {
    Bare(Vec<IpRange>),
    Single(IpRange),
    Wrapped(WrappedIpRanges),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct WrappedIpRanges {
    #[serde(rename = "IpRange", deserialize_with = "one_or_many::required")]
    ip_range: Vec<IpRange>,
}

impl From<RawIpRanges> for IpRanges {
    fn from(raw: RawIpRanges) -> Self {
        match raw {
            RawIpRanges::Bare(ip_range) => Self { ip_range },
            RawIpRanges::Single(range) => Self {
                ip_range: vec![range],
            },
            RawIpRanges::Wrapped(wrapped) => Self {
                ip_range: wrapped.ip_range,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct IpRange {
    pub start_address: Scalar,
    pub end_address: Scalar,
}

impl IpRange {
    pub fn new(start: impl Into<Scalar>, end: impl Into<Scalar>) -> Self {
        Self {
            start_address: start.into(),
            end_address: end.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RouterInfo {
    pub external_ip: Scalar,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_dhcp_service: Option<GatewayDhcpService>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GatewayDhcpService {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_enabled: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool: Option<DhcpPool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DhcpPool {
    pub is_enabled: Scalar,
    pub default_lease_time: Scalar,
    pub max_lease_time: Scalar,
    pub low_ip_address: Scalar,
    pub high_ip_address: Scalar,
}

/// `EdgeGateway` reference as it appears in the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct GatewayLink {
    href: Scalar,
}

/// Input shape, before the attachment is resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawOrgVdcNetwork {
    #[serde(rename = "name", alias = "Name")]
    name: Scalar,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    configuration: Option<NetworkConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    edge_gateway: Option<GatewayLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    service_config: Option<ServiceConfig>,
    #[serde(default, alias = "is_shared", skip_serializing_if = "Option::is_none")]
    is_shared: Option<Scalar>,
}

impl TryFrom<RawOrgVdcNetwork> for OrgVdcNetworkConfig {
    type Error = ComputeError;

    fn try_from(raw: RawOrgVdcNetwork) -> Result<Self> {
        let attachment = match (raw.edge_gateway, raw.service_config) {
            (Some(_), Some(_)) => {
                return Err(ComputeError::invalid(
                    "EdgeGateway and ServiceConfig are mutually exclusive",
                ))
            }
            (Some(gateway), None) => NetworkAttachment::GatewayAttached { href: gateway.href },
            (None, service_config) => NetworkAttachment::Isolated { service_config },
        };

        let config = Self {
            name: raw.name,
            description: raw.description,
            configuration: raw.configuration,
            attachment,
            is_shared: raw.is_shared,
        };
        config.validate()?;
        Ok(config)
    }
}

impl From<OrgVdcNetworkConfig> for RawOrgVdcNetwork {
    fn from(config: OrgVdcNetworkConfig) -> Self {
        let (edge_gateway, service_config) = match config.attachment {
            NetworkAttachment::GatewayAttached { href } => (Some(GatewayLink { href }), None),
            NetworkAttachment::Isolated { service_config } => (None, service_config),
        };
        Self {
            name: config.name,
            description: config.description,
            configuration: config.configuration,
            edge_gateway,
            service_config,
            is_shared: config.is_shared,
        }
    }
}

impl OrgVdcNetworkConfig {
    pub fn new(name: impl Into<Scalar>) -> Self {
        Self {
            name: name.into(),
            description: None,
            configuration: None,
            attachment: NetworkAttachment::default(),
            is_shared: None,
        }
    }

    /// Fence mode the document will carry: the configured one, or the
    /// attachment's default.
    pub fn fence_mode(&self) -> Scalar {
        self.configuration
            .as_ref()
            .and_then(|c| c.fence_mode.clone())
            .unwrap_or_else(|| Scalar::new(self.attachment.default_fence_mode()))
    }

    /// Check the attachment against the fence mode.
    pub fn validate(&self) -> Result<()> {
        let fence_mode = self.fence_mode();
        match &self.attachment {
            NetworkAttachment::GatewayAttached { .. } if fence_mode.is(FENCE_MODE_ISOLATED) => {
                Err(ComputeError::invalid(format!(
                    "network {} is attached to an edge gateway but fenced as isolated",
                    self.name
                )))
            }
            NetworkAttachment::Isolated {
                service_config: Some(_),
            } if !fence_mode.is(FENCE_MODE_ISOLATED) => Err(ComputeError::invalid(format!(
                "ServiceConfig requires fence mode isolated, network {} uses {}",
                self.name, fence_mode
            ))),
            _ => Ok(()),
        }
    }
}

/// Parameters of the create-network call: one IP scope, shared, not
/// inherited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrgVdcNetworkOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_id: Option<String>,
    pub gateway_ip: String,
    pub netmask: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns_suffix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fence_mode: Option<String>,
    #[serde(default)]
    pub ip_ranges: Vec<IpRange>,
}

impl CreateOrgVdcNetworkOptions {
    /// Expand into a full network definition.
    ///
    /// `gateway_href` is the resolved link for `gateway_id`; it is ignored
    /// when no gateway id is set.
    pub fn into_config(
        self,
        name: impl Into<Scalar>,
        gateway_href: Option<String>,
    ) -> Result<OrgVdcNetworkConfig> {
        let attachment = match (self.gateway_id.as_deref(), gateway_href) {
            (Some(_), Some(href)) => NetworkAttachment::GatewayAttached { href: href.into() },
            (Some(id), None) => {
                return Err(ComputeError::invalid(format!(
                    "edge gateway {} has no resolved href",
                    id
                )))
            }
            (None, _) => NetworkAttachment::default(),
        };

        let fence_mode = self
            .fence_mode
            .map(Scalar::from)
            .unwrap_or_else(|| Scalar::new(attachment.default_fence_mode()));

        let ip_scope = IpScope {
            is_inherited: Some(false.into()),
            gateway: Some(self.gateway_ip.into()),
            netmask: Some(self.netmask.into()),
            dns1: self.dns1.map(Scalar::from),
            dns2: self.dns2.map(Scalar::from),
            dns_suffix: self.dns_suffix.map(Scalar::from),
            is_enabled: None,
            ip_ranges: (!self.ip_ranges.is_empty()).then(|| IpRanges {
                ip_range: self.ip_ranges,
            }),
        };

        let config = OrgVdcNetworkConfig {
            name: name.into(),
            description: None,
            configuration: Some(NetworkConfiguration {
                ip_scopes: Some(IpScopes {
                    ip_scope: vec![ip_scope],
                }),
                fence_mode: Some(fence_mode),
                router_info: None,
            }),
            attachment,
            is_shared: Some(true.into()),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Builder for `OrgVdcNetwork` documents.
pub struct OrgVdcNetworkXmlBuilder<'a> {
    config: &'a OrgVdcNetworkConfig,
}

impl<'a> OrgVdcNetworkXmlBuilder<'a> {
    pub fn new(config: &'a OrgVdcNetworkConfig) -> Self {
        Self { config }
    }

    fn build_configuration(&self, configuration: &NetworkConfiguration) -> Element {
        let mut xml = Element::new("Configuration");

        if let Some(ip_scopes) = &configuration.ip_scopes {
            let mut scopes = Element::new("IpScopes");
            for scope in &ip_scopes.ip_scope {
                scopes.push(self.build_ip_scope(scope));
            }
            xml.push(scopes);
        }

        xml.push_text("FenceMode", &self.config.fence_mode());

        if let Some(router_info) = &configuration.router_info {
            let mut router = Element::new("RouterInfo");
            router.push_text("ExternalIp", &router_info.external_ip);
            xml.push(router);
        }

        xml
    }

    fn build_ip_scope(&self, scope: &IpScope) -> Element {
        let mut xml = Element::new("IpScope");
        xml.push_opt("IsInherited", scope.is_inherited.as_ref());
        xml.push_opt("Gateway", scope.gateway.as_ref());
        xml.push_opt("Netmask", scope.netmask.as_ref());
        xml.push_opt("Dns1", scope.dns1.as_ref());
        xml.push_opt("Dns2", scope.dns2.as_ref());
        xml.push_opt("DnsSuffix", scope.dns_suffix.as_ref());
        xml.push_opt("IsEnabled", scope.is_enabled.as_ref());

        if let Some(ip_ranges) = &scope.ip_ranges {
            let mut ranges = Element::new("IpRanges");
            for range in &ip_ranges.ip_range {
                let mut item = Element::new("IpRange");
                item.push_text("StartAddress", &range.start_address);
                item.push_text("EndAddress", &range.end_address);
                ranges.push(item);
            }
            xml.push(ranges);
        }

        xml
    }

    fn build_service_config(&self, service_config: &ServiceConfig) -> Element {
        let mut xml = Element::new("ServiceConfig");

        if let Some(dhcp) = &service_config.gateway_dhcp_service {
            let mut service = Element::new("GatewayDhcpService");
            service.push_opt("IsEnabled", dhcp.is_enabled.as_ref());
            if let Some(pool) = &dhcp.pool {
                let mut pool_xml = Element::new("Pool");
                pool_xml.push_text("IsEnabled", &pool.is_enabled);
                pool_xml.push_text("DefaultLeaseTime", &pool.default_lease_time);
                pool_xml.push_text("MaxLeaseTime", &pool.max_lease_time);
                pool_xml.push_text("LowIpAddress", &pool.low_ip_address);
                pool_xml.push_text("HighIpAddress", &pool.high_ip_address);
                service.push(pool_xml);
            }
            xml.push(service);
        }

        xml
    }
}

impl DocumentBuilder for OrgVdcNetworkXmlBuilder<'_> {
    fn document_type(&self) -> DocumentType {
        DocumentType::OrgVdcNetwork
    }

    fn build(&self) -> Result<Element> {
        // Typed callers can assemble an inconsistent config by hand.
        self.config.validate()?;

        debug!(
            name = %self.config.name,
            fence_mode = %self.config.fence_mode(),
            "Building org vDC network"
        );

        let mut root = Element::new("OrgVdcNetwork")
            .with_attr("xmlns", VCLOUD_NAMESPACE)
            .with_attr("name", self.config.name.as_str())
            .with_attr("type", ORG_VDC_NETWORK_TYPE);

        root.push_opt("Description", self.config.description.as_ref());

        if let Some(configuration) = &self.config.configuration {
            root.push(self.build_configuration(configuration));
        }

        match &self.config.attachment {
            NetworkAttachment::GatewayAttached { href } => {
                root.push(Element::new("EdgeGateway").with_attr("href", href.as_str()));
            }
            NetworkAttachment::Isolated {
                service_config: Some(service_config),
            } => root.push(self.build_service_config(service_config)),
            NetworkAttachment::Isolated {
                service_config: None,
            } => {}
        }

        root.push_opt("IsShared", self.config.is_shared.as_ref());

        Ok(root)
    }
}
