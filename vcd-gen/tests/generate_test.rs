//! Integration tests for the generator front end.
//!
//! These tests write configuration files to a temporary directory and run
//! them through the same path as the binary.

use std::fs;
use tempfile::TempDir;
use vcd_compute::{DocumentType, RenderOptions};
use vcd_gen::{generate, load_node, write_document, Args, Config, LogFormat};

const EDGE_GATEWAY_YAML: &str = r#"
FirewallService:
  IsEnabled: true
  DefaultAction: drop
  LogDefaultAction: false
  FirewallRule:
    Id: 1
    IsEnabled: true
    Description: web
    Policy: allow
    Protocols:
      Tcp: true
    DestinationPortRange: "443"
    DestinationIp: 10.0.0.10
    SourcePortRange: Any
    SourceIp: external
LoadBalancerService:
  IsEnabled: true
  VirtualServer:
    IsEnabled: true
    Name: vs-web
    Description: ""
    IpAddress: 203.0.113.20
    ServiceProfile:
      IsEnabled: true
      Protocol: HTTP
      Port: 80
      Persistence:
        Method: COOKIE
        CookieName: JSESSIONID
        CookieMode: INSERT
    Logging: false
    Pool: web-pool
"#;

#[test]
fn test_generate_edge_gateway_from_yaml() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("gateway.yaml");
    fs::write(&input, EDGE_GATEWAY_YAML).unwrap();

    let xml = generate(
        &input,
        DocumentType::EdgeGatewayServiceConfiguration,
        &RenderOptions::default(),
    )
    .unwrap();

    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(xml.contains("<DestinationPortRange>443</DestinationPortRange>"));
    assert!(xml.contains("<CookieName>JSESSIONID</CookieName>"));
    assert!(xml.contains("<Description></Description>"));
    assert!(!xml.contains("NatService"));
}

#[test]
fn test_generate_from_json_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("vapp.json");
    fs::write(&input, r#"{"name": "web", "powerOn": true}"#).unwrap();

    let xml = generate(&input, DocumentType::ComposeVAppParams, &RenderOptions::compact()).unwrap();

    assert!(xml.starts_with("<ComposeVAppParams "));
    assert!(xml.contains(r#"powerOn="true""#));
}

#[test]
fn test_invalid_configuration_names_the_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("cards.yaml");
    fs::write(&input, "Item: eth0\n").unwrap();

    let err = generate(&input, DocumentType::NetworkCards, &RenderOptions::default()).unwrap_err();

    let message = format!("{:#}", err);
    assert!(message.contains("network-cards"));
    assert!(message.contains("Invalid configuration"));
}

#[test]
fn test_missing_input_file() {
    let dir = TempDir::new().unwrap();

    let err = load_node(&dir.path().join("absent.yaml")).unwrap_err();

    assert!(err.to_string().contains("Failed to read configuration file"));
}

#[test]
fn test_write_document_to_file() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.xml");

    write_document(Some(&output), "<ComposeVAppParams/>").unwrap();

    assert_eq!(fs::read_to_string(&output).unwrap(), "<ComposeVAppParams/>");
}

#[test]
fn test_settings_file_with_cli_overrides() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vcd-gen.yaml");
    fs::write(
        &path,
        r#"
logging:
  level: debug
  format: json
output:
  indent: 4
default_document: org-vdc-network
"#,
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.logging.format, LogFormat::Json);
    assert_eq!(config.output.indent, 4);
    assert!(config.output.declaration);
    assert_eq!(config.document_type().unwrap(), DocumentType::OrgVdcNetwork);

    let args = Args {
        config: Some(path),
        no_declaration: true,
        document_type: Some("network-cards-v2".to_string()),
        ..Default::default()
    };
    let config = Config::resolve(&args).unwrap();

    assert_eq!(config.logging.level, "debug");
    assert!(!config.render_options().declaration);
    assert_eq!(config.render_options().indent, 4);
    assert_eq!(config.document_type().unwrap(), DocumentType::NetworkCardsV2);
}

#[test]
fn test_missing_settings_file_is_an_error() {
    let dir = TempDir::new().unwrap();

    assert!(Config::load(dir.path().join("none.yaml")).is_err());
}
