//! Request layer: pairs each compiled document with the vCloud call that
//! consumes it.
//!
//! [`ComputeClient`] builds the body, fills in method, path and content type,
//! sends it through a [`Transport`] and checks the status the call is
//! documented to return. Response bodies are returned raw.

use std::fmt;
use tracing::{debug, info, instrument, warn};

use crate::error::{ComputeError, Result};
use crate::generators::{
    CardGeneration, ComposeVAppConfig, ComposeVAppXmlBuilder, CreateOrgVdcNetworkOptions,
    EdgeGatewayServiceConfiguration, EdgeGatewayXmlBuilder, NetworkCardsConfig,
    NetworkCardsXmlBuilder, OrgVdcNetworkConfig, OrgVdcNetworkXmlBuilder,
};
use crate::traits::{DocumentBuilder, Transport};

/// HTTP method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Put,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Put => "PUT",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    /// Path relative to the API endpoint, e.g. `admin/vdc/{id}/networks`.
    pub path: String,
    pub content_type: String,
    pub body: String,
    /// Status the call returns on success.
    pub expects: u16,
}

/// A raw response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Response {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Client for the compute document calls.
pub struct ComputeClient<T: Transport> {
    endpoint: String,
    transport: T,
}

impl<T: Transport> ComputeClient<T> {
    /// Create a client. `endpoint` is the API root, e.g.
    /// `https://vcd.example.com/api/`; a trailing slash is added if missing.
    pub fn new(endpoint: impl Into<String>, transport: T) -> Self {
        let mut endpoint = endpoint.into();
        if !endpoint.ends_with('/') {
            endpoint.push('/');
        }
        Self { endpoint, transport }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Absolute link to an edge gateway in the admin API
    /// (`{endpoint}admin/edgeGateway/{id}`).
    pub fn edge_gateway_href(&self, gateway_id: &str) -> String {
        format!("{}admin/edgeGateway/{}", self.endpoint, gateway_id)
    }

    /// Replace all network cards of a VM (first-generation list).
    #[instrument(skip(self, config), fields(vm_id = %vm_id))]
    pub async fn put_network_cards(&self, vm_id: &str, config: &NetworkCardsConfig) -> Result<Response> {
        self.put_cards(vm_id, config, CardGeneration::V1).await
    }

    /// Replace all network cards of a VM, with connection attributes.
    #[instrument(skip(self, config), fields(vm_id = %vm_id))]
    pub async fn put_network_cards_v2(
        &self,
        vm_id: &str,
        config: &NetworkCardsConfig,
    ) -> Result<Response> {
        self.put_cards(vm_id, config, CardGeneration::V2).await
    }

    async fn put_cards(
        &self,
        vm_id: &str,
        config: &NetworkCardsConfig,
        generation: CardGeneration,
    ) -> Result<Response> {
        require_id("VM", vm_id)?;
        let request = self.request(
            Method::Put,
            format!("vApp/{}/virtualHardwareSection/networkCards", vm_id),
            &NetworkCardsXmlBuilder::new(config, generation),
            202,
        )?;
        self.execute(request).await
    }

    /// Create an org vDC network from a full definition.
    #[instrument(skip(self, config), fields(vdc_id = %vdc_id, network = %config.name))]
    pub async fn post_org_vdc_network(
        &self,
        vdc_id: &str,
        config: &OrgVdcNetworkConfig,
    ) -> Result<Response> {
        require_id("vDC", vdc_id)?;
        let request = self.request(
            Method::Post,
            format!("admin/vdc/{}/networks", vdc_id),
            &OrgVdcNetworkXmlBuilder::new(config),
            201,
        )?;
        self.execute(request).await
    }

    /// Create an org vDC network with a single IP scope.
    #[instrument(skip(self, options), fields(vdc_id = %vdc_id, network = %name))]
    pub async fn post_create_org_vdc_network(
        &self,
        vdc_id: &str,
        name: &str,
        options: CreateOrgVdcNetworkOptions,
    ) -> Result<Response> {
        require_id("vDC", vdc_id)?;
        if let Some(gateway_id) = options.gateway_id.as_deref() {
            require_id("edge gateway", gateway_id)?;
        }
        let gateway_href = options
            .gateway_id
            .as_deref()
            .map(|id| self.edge_gateway_href(id));
        let config = options.into_config(name, gateway_href)?;
        self.post_org_vdc_network(vdc_id, &config).await
    }

    /// Compose a new vApp in a vDC.
    #[instrument(skip(self, config), fields(vdc_id = %vdc_id, vapp = %config.name))]
    pub async fn post_compose_vapp(&self, vdc_id: &str, config: &ComposeVAppConfig) -> Result<Response> {
        require_id("vDC", vdc_id)?;
        let request = self.request(
            Method::Post,
            format!("vdc/{}/action/composeVApp", vdc_id),
            &ComposeVAppXmlBuilder::new(config),
            201,
        )?;
        self.execute(request).await
    }

    /// Replace the services of an edge gateway.
    #[instrument(skip(self, config), fields(gateway_id = %gateway_id))]
    pub async fn post_configure_edge_gateway_services(
        &self,
        gateway_id: &str,
        config: &EdgeGatewayServiceConfiguration,
    ) -> Result<Response> {
        require_id("edge gateway", gateway_id)?;
        let request = self.request(
            Method::Post,
            format!("admin/edgeGateway/{}/action/configureServices", gateway_id),
            &EdgeGatewayXmlBuilder::new(config),
            202,
        )?;
        self.execute(request).await
    }

    fn request(
        &self,
        method: Method,
        path: String,
        builder: &dyn DocumentBuilder,
        expects: u16,
    ) -> Result<Request> {
        let document_type = builder.document_type();
        Ok(Request {
            method,
            path,
            content_type: document_type.content_type().to_string(),
            body: builder.to_xml()?,
            expects,
        })
    }

    async fn execute(&self, request: Request) -> Result<Response> {
        let expected = request.expects;
        info!(method = %request.method, path = %request.path, "Sending request");
        debug!(bytes = request.body.len(), content_type = %request.content_type, "Request body");

        let response = self.transport.send(request).await?;

        if response.status != expected {
            warn!(expected, actual = response.status, "Unexpected response status");
            return Err(ComputeError::UnexpectedStatus {
                expected,
                actual: response.status,
                body: response.body,
            });
        }

        debug!(status = response.status, "Request accepted");
        Ok(response)
    }
}

fn require_id(kind: &str, id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(ComputeError::invalid(format!("{} id must not be empty", kind)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_ignores_case() {
        let response = Response::new(201, "").with_header("Content-Type", "application/xml");

        assert_eq!(response.header("content-type"), Some("application/xml"));
        assert_eq!(response.header("Location"), None);
    }

    #[test]
    fn test_method_names() {
        assert_eq!(Method::Put.to_string(), "PUT");
        assert_eq!(Method::Post.as_str(), "POST");
    }

    #[test]
    fn test_edge_gateway_href_uses_admin_path() {
        let client = ComputeClient::new("https://vcd.example.com/api", crate::mock::MockTransport::new());

        assert_eq!(
            client.edge_gateway_href("gw-3"),
            "https://vcd.example.com/api/admin/edgeGateway/gw-3"
        );
    }

    #[test]
    fn test_require_id() {
        assert!(require_id("vDC", "").unwrap_err().is_invalid_configuration());
        assert!(require_id("vDC", "  ").is_err());
        assert!(require_id("vDC", "vdc-1").is_ok());
    }
}
