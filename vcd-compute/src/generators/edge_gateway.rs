//! Edge gateway service configuration documents.
//!
//! An `EdgeGatewayServiceConfiguration` bundles three independently
//! toggleable gateway services. Each section is emitted only when its key is
//! present, always in the order firewall, NAT, load balancer:
//!
//! ```text
//! EdgeGatewayServiceConfiguration
//! ├── FirewallService      (rules)
//! ├── NatService           (rules, each with an optional GatewayNatRule)
//! └── LoadBalancerService  (pools → service ports/members, virtual servers)
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ComputeError, Result};
use crate::traits::DocumentBuilder;
use crate::types::{one_or_many, DocumentType, Reference, Scalar, VCLOUD_NAMESPACE};
use crate::xml::Element;

/// NAT rule type whose gateway rule carries a `Protocol` element.
pub const RULE_TYPE_DNAT: &str = "DNAT";

/// Persistence method that carries a cookie name and mode.
pub const PERSISTENCE_COOKIE: &str = "COOKIE";

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Top-level edge gateway service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EdgeGatewayServiceConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firewall_service: Option<FirewallService>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nat_service: Option<NatService>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_balancer_service: Option<LoadBalancerService>,
}

// -----------------------------------------------------------------------------
// Firewall
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FirewallService {
    pub is_enabled: Scalar,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_action: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_default_action: Option<Scalar>,
    #[serde(default, deserialize_with = "one_or_many::or_empty")]
    pub firewall_rule: Vec<FirewallRule>,
}

/// A single firewall rule.
///
/// `id`, the two port ranges and the two IP fields are schema-mandatory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FirewallRule {
    pub id: Scalar,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_enabled: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_on_translate: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocols: Option<FirewallProtocols>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icmp_sub_type: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<Scalar>,
    pub destination_port_range: Scalar,
    pub destination_ip: Scalar,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_port: Option<Scalar>,
    pub source_port_range: Scalar,
    pub source_ip: Scalar,
    /// Only honoured by the service in backward compatibility mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_logging: Option<Scalar>,
}

/// Protocols matched by a firewall rule.
///
/// Only the schema's protocol elements are accepted; any other key is a
/// configuration error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FirewallProtocols {
    #[serde(default, alias = "Tcp", skip_serializing_if = "Option::is_none")]
    pub tcp: Option<Scalar>,
    #[serde(default, alias = "Udp", skip_serializing_if = "Option::is_none")]
    pub udp: Option<Scalar>,
    #[serde(default, alias = "Icmp", skip_serializing_if = "Option::is_none")]
    pub icmp: Option<Scalar>,
    #[serde(default, alias = "Any", skip_serializing_if = "Option::is_none")]
    pub any: Option<Scalar>,
    #[serde(default, alias = "Other", skip_serializing_if = "Option::is_none")]
    pub other: Option<Scalar>,
}

impl FirewallProtocols {
    /// Protocol elements in schema order, paired with their values.
    pub fn elements(&self) -> [(&'static str, Option<&Scalar>); 5] {
        [
            ("Tcp", self.tcp.as_ref()),
            ("Udp", self.udp.as_ref()),
            ("Icmp", self.icmp.as_ref()),
            ("Any", self.any.as_ref()),
            ("Other", self.other.as_ref()),
        ]
    }
}

// -----------------------------------------------------------------------------
// NAT
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NatService {
    pub is_enabled: Scalar,
    #[serde(default, deserialize_with = "one_or_many::or_empty")]
    pub nat_rule: Vec<NatRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NatRule {
    pub rule_type: Scalar,
    pub is_enabled: Scalar,
    pub id: Scalar,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_nat_rule: Option<GatewayNatRule>,
}

impl NatRule {
    pub fn is_dnat(&self) -> bool {
        self.rule_type.is(RULE_TYPE_DNAT)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GatewayNatRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<Reference>,
    pub original_ip: Scalar,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_port: Option<Scalar>,
    pub translated_ip: Scalar,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated_port: Option<Scalar>,
    /// Emitted only for DNAT rules, where it is required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<Scalar>,
}

// -----------------------------------------------------------------------------
// Load balancer
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoadBalancerService {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_enabled: Option<Scalar>,
    #[serde(default, deserialize_with = "one_or_many::or_empty")]
    pub pool: Vec<LoadBalancerPool>,
    #[serde(default, deserialize_with = "one_or_many::or_empty")]
    pub virtual_server: Vec<VirtualServer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoadBalancerPool {
    pub name: Scalar,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Scalar>,
    #[serde(default, deserialize_with = "one_or_many::or_empty")]
    pub service_port: Vec<PoolServicePort>,
    #[serde(default, deserialize_with = "one_or_many::or_empty")]
    pub member: Vec<PoolMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PoolServicePort {
    pub is_enabled: Scalar,
    pub protocol: Scalar,
    pub algorithm: Scalar,
    pub port: Scalar,
    pub health_check_port: Scalar,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check: Option<HealthCheck>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HealthCheck {
    pub mode: Scalar,
    pub uri: Scalar,
    pub health_threshold: Scalar,
    pub unhealth_threshold: Scalar,
    pub interval: Scalar,
    pub timeout: Scalar,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PoolMember {
    pub ip_address: Scalar,
    pub weight: Scalar,
    #[serde(default, deserialize_with = "one_or_many::or_empty")]
    pub service_port: Vec<MemberServicePort>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MemberServicePort {
    pub protocol: Scalar,
    pub port: Scalar,
    pub health_check_port: Scalar,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VirtualServer {
    pub is_enabled: Scalar,
    pub name: Scalar,
    pub description: Scalar,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<Reference>,
    pub ip_address: Scalar,
    #[serde(default, deserialize_with = "one_or_many::or_empty")]
    pub service_profile: Vec<ServiceProfile>,
    pub logging: Scalar,
    pub pool: Scalar,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceProfile {
    pub is_enabled: Scalar,
    pub protocol: Scalar,
    pub port: Scalar,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistence: Option<Persistence>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Persistence {
    pub method: Scalar,
    /// Required for, and emitted only with, cookie persistence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie_name: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie_mode: Option<Scalar>,
}

impl Persistence {
    pub fn is_cookie(&self) -> bool {
        self.method.is(PERSISTENCE_COOKIE)
    }
}

// =============================================================================
// BUILDER
// =============================================================================

/// Builder for `EdgeGatewayServiceConfiguration` documents.
pub struct EdgeGatewayXmlBuilder<'a> {
    config: &'a EdgeGatewayServiceConfiguration,
}

impl<'a> EdgeGatewayXmlBuilder<'a> {
    pub fn new(config: &'a EdgeGatewayServiceConfiguration) -> Self {
        Self { config }
    }

    fn build_firewall_service(&self, firewall: &FirewallService) -> Element {
        let mut xml = Element::new("FirewallService");
        xml.push_text("IsEnabled", &firewall.is_enabled);
        xml.push_opt("DefaultAction", firewall.default_action.as_ref());
        xml.push_opt("LogDefaultAction", firewall.log_default_action.as_ref());

        for rule in &firewall.firewall_rule {
            xml.push(self.build_firewall_rule(rule));
        }

        xml
    }

    fn build_firewall_rule(&self, rule: &FirewallRule) -> Element {
        let mut xml = Element::new("FirewallRule");
        xml.push_text("Id", &rule.id);
        xml.push_opt("IsEnabled", rule.is_enabled.as_ref());
        xml.push_opt("MatchOnTranslate", rule.match_on_translate.as_ref());
        xml.push_opt("Description", rule.description.as_ref());
        xml.push_opt("Policy", rule.policy.as_ref());

        if let Some(protocols) = &rule.protocols {
            let mut block = Element::new("Protocols");
            for (name, value) in protocols.elements() {
                block.push_opt(name, value);
            }
            xml.push(block);
        }

        xml.push_opt("IcmpSubType", rule.icmp_sub_type.as_ref());
        xml.push_opt("Port", rule.port.as_ref());
        xml.push_text("DestinationPortRange", &rule.destination_port_range);
        xml.push_text("DestinationIp", &rule.destination_ip);
        xml.push_opt("SourcePort", rule.source_port.as_ref());
        xml.push_text("SourcePortRange", &rule.source_port_range);
        xml.push_text("SourceIp", &rule.source_ip);
        xml.push_opt("Direction", rule.direction.as_ref());
        xml.push_opt("EnableLogging", rule.enable_logging.as_ref());
        xml
    }

    fn build_nat_service(&self, nat: &NatService) -> Result<Element> {
        let mut xml = Element::new("NatService");
        xml.push_text("IsEnabled", &nat.is_enabled);

        for rule in &nat.nat_rule {
            let mut rule_xml = Element::new("NatRule");
            rule_xml.push_text("RuleType", &rule.rule_type);
            rule_xml.push_text("IsEnabled", &rule.is_enabled);
            rule_xml.push_text("Id", &rule.id);

            if let Some(gateway_rule) = &rule.gateway_nat_rule {
                rule_xml.push(self.build_gateway_nat_rule(rule, gateway_rule)?);
            }

            xml.push(rule_xml);
        }

        Ok(xml)
    }

    fn build_gateway_nat_rule(&self, nat_rule: &NatRule, rule: &GatewayNatRule) -> Result<Element> {
        let mut xml = Element::new("GatewayNatRule");

        if let Some(interface) = &rule.interface {
            xml.push(
                Element::new("Interface")
                    .with_opt_attr("name", interface.name.as_ref())
                    .with_attr("href", interface.href.as_str()),
            );
        }

        xml.push_text("OriginalIp", &rule.original_ip);
        xml.push_opt("OriginalPort", rule.original_port.as_ref());
        xml.push_text("TranslatedIp", &rule.translated_ip);
        xml.push_opt("TranslatedPort", rule.translated_port.as_ref());

        if nat_rule.is_dnat() {
            let protocol = rule.protocol.as_ref().ok_or_else(|| {
                ComputeError::invalid(format!(
                    "DNAT rule {} requires GatewayNatRule.Protocol",
                    nat_rule.id
                ))
            })?;
            xml.push_text("Protocol", protocol);
        }

        Ok(xml)
    }

    fn build_load_balancer_service(&self, lb: &LoadBalancerService) -> Result<Element> {
        let mut xml = Element::new("LoadBalancerService");
        xml.push_opt("IsEnabled", lb.is_enabled.as_ref());

        for pool in &lb.pool {
            xml.push(self.build_pool(pool));
        }

        for server in &lb.virtual_server {
            xml.push(self.build_virtual_server(server)?);
        }

        Ok(xml)
    }

    fn build_pool(&self, pool: &LoadBalancerPool) -> Element {
        let mut xml = Element::new("Pool");
        xml.push_text("Name", &pool.name);
        xml.push_opt("Description", pool.description.as_ref());

        for port in &pool.service_port {
            let mut port_xml = Element::new("ServicePort");
            port_xml.push_text("IsEnabled", &port.is_enabled);
            port_xml.push_text("Protocol", &port.protocol);
            port_xml.push_text("Algorithm", &port.algorithm);
            port_xml.push_text("Port", &port.port);
            port_xml.push_text("HealthCheckPort", &port.health_check_port);

            if let Some(check) = &port.health_check {
                let mut check_xml = Element::new("HealthCheck");
                check_xml.push_text("Mode", &check.mode);
                check_xml.push_text("Uri", &check.uri);
                check_xml.push_text("HealthThreshold", &check.health_threshold);
                check_xml.push_text("UnhealthThreshold", &check.unhealth_threshold);
                check_xml.push_text("Interval", &check.interval);
                check_xml.push_text("Timeout", &check.timeout);
                port_xml.push(check_xml);
            }

            xml.push(port_xml);
        }

        for member in &pool.member {
            let mut member_xml = Element::new("Member");
            member_xml.push_text("IpAddress", &member.ip_address);
            member_xml.push_text("Weight", &member.weight);

            for port in &member.service_port {
                let mut port_xml = Element::new("ServicePort");
                port_xml.push_text("Protocol", &port.protocol);
                port_xml.push_text("Port", &port.port);
                port_xml.push_text("HealthCheckPort", &port.health_check_port);
                member_xml.push(port_xml);
            }

            xml.push(member_xml);
        }

        xml
    }

    fn build_virtual_server(&self, server: &VirtualServer) -> Result<Element> {
        let mut xml = Element::new("VirtualServer");
        xml.push_text("IsEnabled", &server.is_enabled);
        xml.push_text("Name", &server.name);
        xml.push_text("Description", &server.description);

        if let Some(interface) = &server.interface {
            xml.push(
                Element::new("Interface")
                    .with_attr("href", interface.href.as_str())
                    .with_opt_attr("name", interface.name.as_ref()),
            );
        }

        xml.push_text("IpAddress", &server.ip_address);

        for profile in &server.service_profile {
            let mut profile_xml = Element::new("ServiceProfile");
            profile_xml.push_text("IsEnabled", &profile.is_enabled);
            profile_xml.push_text("Protocol", &profile.protocol);
            profile_xml.push_text("Port", &profile.port);

            if let Some(persistence) = &profile.persistence {
                let mut persistence_xml = Element::new("Persistence");
                persistence_xml.push_text("Method", &persistence.method);
                if persistence.is_cookie() {
                    let (name, mode) = persistence
                        .cookie_name
                        .as_ref()
                        .zip(persistence.cookie_mode.as_ref())
                        .ok_or_else(|| {
                            ComputeError::invalid(format!(
                                "cookie persistence on virtual server {} requires CookieName and CookieMode",
                                server.name
                            ))
                        })?;
                    persistence_xml.push_text("CookieName", name);
                    persistence_xml.push_text("CookieMode", mode);
                }
                profile_xml.push(persistence_xml);
            }

            xml.push(profile_xml);
        }

        xml.push_text("Logging", &server.logging);
        xml.push_text("Pool", &server.pool);
        Ok(xml)
    }
}

impl DocumentBuilder for EdgeGatewayXmlBuilder<'_> {
    fn document_type(&self) -> DocumentType {
        DocumentType::EdgeGatewayServiceConfiguration
    }

    fn build(&self) -> Result<Element> {
        let mut root = Element::new("EdgeGatewayServiceConfiguration")
            .with_attr("xmlns", VCLOUD_NAMESPACE);

        if let Some(firewall) = &self.config.firewall_service {
            debug!(rules = firewall.firewall_rule.len(), "Adding firewall service");
            root.push(self.build_firewall_service(firewall));
        }

        if let Some(nat) = &self.config.nat_service {
            debug!(rules = nat.nat_rule.len(), "Adding NAT service");
            root.push(self.build_nat_service(nat)?);
        }

        if let Some(lb) = &self.config.load_balancer_service {
            debug!(
                pools = lb.pool.len(),
                virtual_servers = lb.virtual_server.len(),
                "Adding load balancer service"
            );
            root.push(self.build_load_balancer_service(lb)?);
        }

        Ok(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::RenderOptions;
    use serde_json::json;

    fn rule(id: &str) -> FirewallRule {
        FirewallRule {
            id: id.into(),
            destination_port_range: "Any".into(),
            destination_ip: "10.0.0.10".into(),
            source_port_range: "Any".into(),
            source_ip: "Any".into(),
            ..Default::default()
        }
    }

    fn nat_rule(rule_type: &str) -> NatRule {
        NatRule {
            rule_type: rule_type.into(),
            is_enabled: true.into(),
            id: "65537".into(),
            gateway_nat_rule: Some(GatewayNatRule {
                interface: Some(Reference::new("https://vcd/api/admin/network/1").with_name("ext")),
                original_ip: "192.0.2.10".into(),
                original_port: Some("80".into()),
                translated_ip: "10.0.0.10".into(),
                translated_port: Some("8080".into()),
                protocol: Some("tcp".into()),
            }),
        }
    }

    #[test]
    fn test_empty_configuration_has_only_root() {
        let config = EdgeGatewayServiceConfiguration::default();
        let root = EdgeGatewayXmlBuilder::new(&config).build().unwrap();

        assert_eq!(root.name(), "EdgeGatewayServiceConfiguration");
        assert_eq!(root.attr("xmlns"), Some(VCLOUD_NAMESPACE));
        assert!(root.children().is_empty());
    }

    #[test]
    fn test_minimal_firewall_rule_emits_mandatory_fields_only() {
        let config = EdgeGatewayServiceConfiguration {
            firewall_service: Some(FirewallService {
                is_enabled: true.into(),
                default_action: None,
                log_default_action: None,
                firewall_rule: vec![rule("1")],
            }),
            ..Default::default()
        };

        let root = EdgeGatewayXmlBuilder::new(&config).build().unwrap();
        let firewall = root.child("FirewallService").unwrap();
        assert_eq!(firewall.child_names(), vec!["IsEnabled", "FirewallRule"]);

        let rule = firewall.child("FirewallRule").unwrap();
        assert_eq!(
            rule.child_names(),
            vec!["Id", "DestinationPortRange", "DestinationIp", "SourcePortRange", "SourceIp"]
        );
    }

    #[test]
    fn test_protocols_follow_schema_order() {
        let mut r = rule("1");
        r.protocols = Some(FirewallProtocols {
            udp: Some(true.into()),
            tcp: Some(true.into()),
            ..Default::default()
        });
        let config = EdgeGatewayServiceConfiguration {
            firewall_service: Some(FirewallService {
                is_enabled: true.into(),
                default_action: Some("drop".into()),
                log_default_action: Some(false.into()),
                firewall_rule: vec![r],
            }),
            ..Default::default()
        };

        let root = EdgeGatewayXmlBuilder::new(&config).build().unwrap();
        let protocols = root
            .child("FirewallService")
            .and_then(|f| f.child("FirewallRule"))
            .and_then(|r| r.child("Protocols"))
            .unwrap();

        assert_eq!(protocols.child_names(), vec!["Tcp", "Udp"]);
        assert_eq!(protocols.child("Tcp").unwrap().text_value(), Some("true"));
    }

    #[test]
    fn test_unknown_protocol_is_rejected() {
        let result = serde_json::from_value::<FirewallProtocols>(json!({"tcp": true, "ftp": true}));
        let message = result.unwrap_err().to_string();
        assert!(message.contains("ftp"));
    }

    #[test]
    fn test_capitalized_protocol_keys_are_accepted() {
        let protocols: FirewallProtocols =
            serde_json::from_value(json!({"Icmp": true, "any": false})).unwrap();
        assert_eq!(protocols.icmp.as_ref().map(Scalar::as_str), Some("true"));
        assert_eq!(protocols.any.as_ref().map(Scalar::as_str), Some("false"));
    }

    #[test]
    fn test_dnat_rule_carries_protocol() {
        let config = EdgeGatewayServiceConfiguration {
            nat_service: Some(NatService {
                is_enabled: true.into(),
                nat_rule: vec![nat_rule("DNAT"), nat_rule("SNAT")],
            }),
            ..Default::default()
        };

        let root = EdgeGatewayXmlBuilder::new(&config).build().unwrap();
        let rules: Vec<&Element> = root
            .child("NatService")
            .unwrap()
            .children_named("NatRule")
            .collect();

        let dnat = rules[0].child("GatewayNatRule").unwrap();
        assert_eq!(
            dnat.child_names(),
            vec!["Interface", "OriginalIp", "OriginalPort", "TranslatedIp", "TranslatedPort", "Protocol"]
        );
        let interface = dnat.child("Interface").unwrap();
        assert_eq!(interface.attributes()[0].0, "name");
        assert_eq!(interface.attributes()[1].0, "href");
        assert!(interface.children().is_empty());

        let snat = rules[1].child("GatewayNatRule").unwrap();
        assert!(snat.child("Protocol").is_none());
    }

    #[test]
    fn test_dnat_rule_without_protocol_is_rejected() {
        let mut rule = nat_rule("DNAT");
        if let Some(gateway_rule) = rule.gateway_nat_rule.as_mut() {
            gateway_rule.protocol = None;
        }
        let config = EdgeGatewayServiceConfiguration {
            nat_service: Some(NatService {
                is_enabled: true.into(),
                nat_rule: vec![rule],
            }),
            ..Default::default()
        };

        let err = EdgeGatewayXmlBuilder::new(&config).build().unwrap_err();
        assert!(err.is_invalid_configuration());
    }

    #[test]
    fn test_cookie_persistence_only_for_cookie_method() {
        let profile = |method: &str| ServiceProfile {
            is_enabled: true.into(),
            protocol: "HTTP".into(),
            port: 80u16.into(),
            persistence: Some(Persistence {
                method: method.into(),
                cookie_name: Some("JSESSIONID".into()),
                cookie_mode: Some("INSERT".into()),
            }),
        };
        let server = VirtualServer {
            is_enabled: true.into(),
            name: "web".into(),
            description: "".into(),
            interface: Some(Reference::new("https://vcd/api/admin/network/1").with_name("ext")),
            ip_address: "192.0.2.20".into(),
            service_profile: vec![profile("COOKIE"), profile("SSL_SESSION_ID")],
            logging: false.into(),
            pool: "web-pool".into(),
        };
        let config = EdgeGatewayServiceConfiguration {
            load_balancer_service: Some(LoadBalancerService {
                is_enabled: None,
                pool: Vec::new(),
                virtual_server: vec![server],
            }),
            ..Default::default()
        };

        let root = EdgeGatewayXmlBuilder::new(&config).build().unwrap();
        let server = root
            .child("LoadBalancerService")
            .and_then(|lb| lb.child("VirtualServer"))
            .unwrap();
        assert_eq!(
            server.child_names(),
            vec![
                "IsEnabled",
                "Name",
                "Description",
                "Interface",
                "IpAddress",
                "ServiceProfile",
                "ServiceProfile",
                "Logging",
                "Pool"
            ]
        );

        let profiles: Vec<&Element> = server.children_named("ServiceProfile").collect();
        let cookie = profiles[0].child("Persistence").unwrap();
        assert_eq!(cookie.child_names(), vec!["Method", "CookieName", "CookieMode"]);
        let ssl = profiles[1].child("Persistence").unwrap();
        assert_eq!(ssl.child_names(), vec!["Method"]);
    }

    #[test]
    fn test_pool_nesting() {
        let config: EdgeGatewayServiceConfiguration = serde_json::from_value(json!({
            "LoadBalancerService": {
                "IsEnabled": true,
                "Pool": {
                    "Name": "web-pool",
                    "ServicePort": {
                        "IsEnabled": true,
                        "Protocol": "HTTP",
                        "Algorithm": "ROUND_ROBIN",
                        "Port": 80,
                        "HealthCheckPort": "",
                        "HealthCheck": {
                            "Mode": "HTTP",
                            "Uri": "/health",
                            "HealthThreshold": 2,
                            "UnhealthThreshold": 3,
                            "Interval": 5,
                            "Timeout": 15
                        }
                    },
                    "Member": [
                        {
                            "IpAddress": "10.0.0.11",
                            "Weight": 1,
                            "ServicePort": {"Protocol": "HTTP", "Port": 80, "HealthCheckPort": ""}
                        },
                        {"IpAddress": "10.0.0.12", "Weight": 1}
                    ]
                }
            }
        }))
        .unwrap();

        let root = EdgeGatewayXmlBuilder::new(&config).build().unwrap();
        let pool = root
            .child("LoadBalancerService")
            .and_then(|lb| lb.child("Pool"))
            .unwrap();

        assert_eq!(pool.child_names(), vec!["Name", "ServicePort", "Member", "Member"]);
        let check = pool.child("ServicePort").and_then(|p| p.child("HealthCheck")).unwrap();
        assert_eq!(
            check.child_names(),
            vec!["Mode", "Uri", "HealthThreshold", "UnhealthThreshold", "Interval", "Timeout"]
        );

        let members: Vec<&Element> = pool.children_named("Member").collect();
        assert_eq!(members[0].child_names(), vec!["IpAddress", "Weight", "ServicePort"]);
        assert_eq!(members[1].child_names(), vec!["IpAddress", "Weight"]);
    }

    #[test]
    fn test_load_balancer_without_pools() {
        let config: EdgeGatewayServiceConfiguration = serde_json::from_value(json!({
            "LoadBalancerService": {"IsEnabled": true}
        }))
        .unwrap();

        let root = EdgeGatewayXmlBuilder::new(&config).build().unwrap();
        let lb = root.child("LoadBalancerService").unwrap();
        assert_eq!(lb.child_names(), vec!["IsEnabled"]);

        let err = serde_json::from_value::<EdgeGatewayServiceConfiguration>(json!({
            "LoadBalancerService": {"Pool": {"Description": "unnamed"}}
        }))
        .unwrap_err();
        assert!(err.to_string().contains("Name"));
    }

    #[test]
    fn test_sections_render_in_fixed_order() {
        let config: EdgeGatewayServiceConfiguration = serde_json::from_value(json!({
            "LoadBalancerService": {},
            "NatService": {"IsEnabled": false},
            "FirewallService": {"IsEnabled": true}
        }))
        .unwrap();

        let xml = EdgeGatewayXmlBuilder::new(&config)
            .to_xml_with(&RenderOptions::compact())
            .unwrap();

        let firewall = xml.find("<FirewallService>").unwrap();
        let nat = xml.find("<NatService>").unwrap();
        let lb = xml.find("<LoadBalancerService").unwrap();
        assert!(firewall < nat && nat < lb);
    }
}
