//! Document builders, one per vCloud document type.

pub mod compose_vapp;
pub mod edge_gateway;
pub mod network_cards;
pub mod org_vdc_network;

pub use compose_vapp::{ComposeVAppConfig, ComposeVAppXmlBuilder, SourcedItem};
pub use edge_gateway::{
    EdgeGatewayServiceConfiguration, EdgeGatewayXmlBuilder, FirewallProtocols, FirewallRule,
    FirewallService, GatewayNatRule, HealthCheck, LoadBalancerPool, LoadBalancerService,
    MemberServicePort, NatRule, NatService, Persistence, PoolMember, PoolServicePort,
    ServiceProfile, VirtualServer,
};
pub use network_cards::{
    CardGeneration, ConnectionDetails, NetworkCardItem, NetworkCardsConfig, NetworkCardsXmlBuilder,
    NetworkConnection,
};
pub use org_vdc_network::{
    CreateOrgVdcNetworkOptions, IpRange, IpScope, NetworkAttachment, NetworkConfiguration,
    OrgVdcNetworkConfig, OrgVdcNetworkXmlBuilder, ServiceConfig,
};
