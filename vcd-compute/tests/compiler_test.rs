//! Integration tests for document compilation.
//!
//! These tests drive `compile` with dynamic configuration nodes, the way
//! callers outside the crate use it.

use quick_xml::events::Event;
use quick_xml::Reader;
use serde_json::{json, Value};
use vcd_compute::{compile, compile_with, DocumentType, RenderOptions};

fn firewall_config(rule: Value) -> Value {
    json!({
        "FirewallService": {
            "IsEnabled": true,
            "DefaultAction": "drop",
            "LogDefaultAction": false,
            "FirewallRule": [rule]
        }
    })
}

fn card(instance: &str, mac: &str, network: &str) -> Value {
    json!({
        "rasd:Address": mac,
        "rasd:AddressOnParent": instance,
        "rasd:AutomaticAllocation": "true",
        "rasd:Connection": network,
        "rasd:Description": "PCNet32 ethernet adapter",
        "rasd:ElementName": format!("Network adapter {}", instance),
        "rasd:InstanceID": instance,
        "rasd:ResourceSubType": "PCNet32",
        "rasd:ResourceType": "10"
    })
}

/// Names and text of the elements directly below each `vcloud:Item`.
fn read_items(xml: &str) -> Vec<Vec<(String, String)>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut items = Vec::new();
    let mut current: Option<Vec<(String, String)>> = None;
    let mut field: Option<String> = None;

    loop {
        match reader.read_event().expect("well-formed XML") {
            Event::Start(e) => {
                let name = String::from_utf8(e.name().as_ref().to_vec()).unwrap();
                if name == "vcloud:Item" {
                    current = Some(Vec::new());
                } else if current.is_some() {
                    field = Some(name);
                }
            }
            Event::Text(t) => {
                if let (Some(item), Some(name)) = (current.as_mut(), field.take()) {
                    item.push((name, t.unescape().unwrap().into_owned()));
                }
            }
            Event::End(e) => {
                if e.name().as_ref() == b"vcloud:Item" {
                    items.extend(current.take());
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    items
}

#[test]
fn test_compile_is_deterministic() {
    let config = json!({
        "NatService": {
            "IsEnabled": true,
            "NatRule": [{
                "RuleType": "DNAT",
                "IsEnabled": true,
                "Id": 65537,
                "GatewayNatRule": {
                    "Interface": {"name": "uplink", "href": "https://vcd/api/admin/network/ext-1"},
                    "OriginalIp": "203.0.113.10",
                    "OriginalPort": 443,
                    "TranslatedIp": "10.0.0.10",
                    "TranslatedPort": 8443,
                    "Protocol": "tcp"
                }
            }]
        }
    });

    let first = compile(&config, DocumentType::EdgeGatewayServiceConfiguration).unwrap();
    let second = compile(&config, DocumentType::EdgeGatewayServiceConfiguration).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_firewall_rule_order_ignores_input_order() {
    let rule: Value = serde_json::from_str(
        r#"{
            "SourceIp": "Any",
            "EnableLogging": false,
            "Protocols": {"Udp": true, "Tcp": true},
            "DestinationIp": "10.0.0.5",
            "Id": 1,
            "SourcePortRange": "Any",
            "Policy": "allow",
            "DestinationPortRange": "22",
            "Description": "ssh",
            "IsEnabled": true
        }"#,
    )
    .unwrap();

    let xml = compile_with(
        &firewall_config(rule),
        DocumentType::EdgeGatewayServiceConfiguration,
        &RenderOptions::compact(),
    )
    .unwrap();

    let expected = concat!(
        "<FirewallRule>",
        "<Id>1</Id>",
        "<IsEnabled>true</IsEnabled>",
        "<Description>ssh</Description>",
        "<Policy>allow</Policy>",
        "<Protocols><Tcp>true</Tcp><Udp>true</Udp></Protocols>",
        "<DestinationPortRange>22</DestinationPortRange>",
        "<DestinationIp>10.0.0.5</DestinationIp>",
        "<SourcePortRange>Any</SourcePortRange>",
        "<SourceIp>Any</SourceIp>",
        "<EnableLogging>false</EnableLogging>",
        "</FirewallRule>"
    );
    assert!(xml.contains(expected), "unexpected rule layout: {}", xml);
}

#[test]
fn test_absent_optional_fields_emit_nothing() {
    let rule = json!({
        "Id": 2,
        "DestinationPortRange": "Any",
        "DestinationIp": "Any",
        "SourcePortRange": "Any",
        "SourceIp": "Any",
        "Description": null
    });

    let xml = compile(&firewall_config(rule), DocumentType::EdgeGatewayServiceConfiguration).unwrap();

    for absent in ["<Description", "<Policy", "<Protocols", "<Port>", "<Direction"] {
        assert!(!xml.contains(absent), "{} should not be emitted", absent);
    }
}

#[test]
fn test_missing_mandatory_rule_field_is_rejected() {
    let rule = json!({"Id": 3, "DestinationIp": "Any", "SourcePortRange": "Any", "SourceIp": "Any"});

    let err = compile(&firewall_config(rule), DocumentType::EdgeGatewayServiceConfiguration)
        .unwrap_err();

    assert!(err.is_invalid_configuration());
    assert!(err.to_string().contains("DestinationPortRange"));
}

#[test]
fn test_unknown_protocol_is_rejected() {
    let rule = json!({
        "Id": 4,
        "Protocols": {"Sctp": true},
        "DestinationPortRange": "Any",
        "DestinationIp": "Any",
        "SourcePortRange": "Any",
        "SourceIp": "Any"
    });

    let err = compile(&firewall_config(rule), DocumentType::EdgeGatewayServiceConfiguration)
        .unwrap_err();

    assert!(err.is_invalid_configuration());
}

#[test]
fn test_network_cards_round_trip() {
    let cards = vec![
        card("1", "00:50:56:01:01:01", "NetworkTest3"),
        card("2", "00:50:56:01:01:02", "NetworkTest4"),
    ];
    let config = json!({"Item": cards});

    let xml = compile(&config, DocumentType::NetworkCards).unwrap();
    let items = read_items(&xml);

    assert_eq!(items.len(), 2);
    let fields = [
        "rasd:Address",
        "rasd:AddressOnParent",
        "rasd:AutomaticAllocation",
        "rasd:Connection",
        "rasd:Description",
        "rasd:ElementName",
        "rasd:InstanceID",
        "rasd:ResourceSubType",
    ];
    for (item, input) in items.iter().zip(&cards) {
        for (index, field) in fields.iter().enumerate() {
            assert_eq!(item[index].0, *field);
            assert_eq!(item[index].1, input[*field].as_str().unwrap());
        }
        assert_eq!(item[8], ("rasd:ResourceType".to_string(), "10".to_string()));
    }
}

#[test]
fn test_network_cards_scalar_item_is_rejected() {
    let err = compile(&json!({"Item": "eth0"}), DocumentType::NetworkCards).unwrap_err();
    assert!(err.is_invalid_configuration());
}

#[test]
fn test_special_characters_are_escaped() {
    let xml = compile(
        &json!({"name": "R&D <lab>", "Description": "\"quoted\" & 'single'"}),
        DocumentType::ComposeVAppParams,
    )
    .unwrap();

    assert!(xml.contains("R&amp;D &lt;lab&gt;"));
    assert!(!xml.contains("R&D"));

    let mut reader = Reader::from_str(&xml);
    loop {
        match reader.read_event().expect("escaped output parses") {
            Event::Eof => break,
            _ => continue,
        }
    }
}

#[test]
fn test_org_network_either_or() {
    let err = compile(
        &json!({
            "name": "both",
            "EdgeGateway": {"href": "https://vcd/api/admin/edgeGateway/gw-1"},
            "ServiceConfig": {"GatewayDhcpService": {"IsEnabled": true}}
        }),
        DocumentType::OrgVdcNetwork,
    )
    .unwrap_err();
    assert!(err.is_invalid_configuration());

    let xml = compile(
        &json!({
            "name": "routed",
            "Configuration": {"IpScopes": {"IpScope": {"Gateway": "10.0.0.1"}}},
            "EdgeGateway": {"href": "https://vcd/api/admin/edgeGateway/gw-1"}
        }),
        DocumentType::OrgVdcNetwork,
    )
    .unwrap();
    assert!(xml.contains("<FenceMode>natRouted</FenceMode>"));
    assert!(xml.contains(r#"<EdgeGateway href="https://vcd/api/admin/edgeGateway/gw-1"/>"#));
    assert!(!xml.contains("ServiceConfig"));
}

#[test]
fn test_v2_cards_declare_vcloud_prefix_once() {
    let mut item = card("1", "00:50:56:01:01:01", "");
    item["rasd:Connection"] = json!({
        "value": "NetworkTest3",
        "ipAddressingMode": "DHCP",
        "primaryNetworkConnection": true
    });

    let xml = compile(&json!({"Item": [item]}), DocumentType::NetworkCardsV2).unwrap();

    assert_eq!(xml.matches("xmlns:vcloud=").count(), 1);
    assert!(xml.contains(
        r#"<rasd:Connection vcloud:primaryNetworkConnection="true" vcloud:ipAddressingMode="DHCP">NetworkTest3</rasd:Connection>"#
    ));
}
