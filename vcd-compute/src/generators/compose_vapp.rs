//! Compose vApp parameters.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::traits::DocumentBuilder;
use crate::types::{one_or_many, DocumentType, Reference, Scalar, OVF_NAMESPACE, VCLOUD_NAMESPACE};
use crate::xml::Element;

/// Parameters for composing a new vApp in a vDC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ComposeVAppConfig {
    #[serde(rename = "name", alias = "Name")]
    pub name: Scalar,
    /// Deploy the vApp after composing it.
    #[serde(default, rename = "deploy", alias = "Deploy", skip_serializing_if = "Option::is_none")]
    pub deploy: Option<Scalar>,
    /// Power the vApp on after deploying it.
    #[serde(default, rename = "powerOn", alias = "PowerOn", skip_serializing_if = "Option::is_none")]
    pub power_on: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Scalar>,
    #[serde(default, deserialize_with = "one_or_many::or_empty", skip_serializing_if = "Vec::is_empty")]
    pub sourced_item: Vec<SourcedItem>,
    #[serde(default, rename = "AllEULAsAccepted", skip_serializing_if = "Option::is_none")]
    pub all_eulas_accepted: Option<Scalar>,
}

impl ComposeVAppConfig {
    pub fn new(name: impl Into<Scalar>) -> Self {
        Self {
            name: name.into(),
            deploy: None,
            power_on: None,
            description: None,
            sourced_item: Vec::new(),
            all_eulas_accepted: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<Scalar>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a template or VM to pull into the new vApp.
    pub fn with_source(mut self, source: Reference) -> Self {
        self.sourced_item.push(SourcedItem { source });
        self
    }
}

/// An existing vApp template or VM to include.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SourcedItem {
    pub source: Reference,
}

/// Builder for `ComposeVAppParams` documents.
pub struct ComposeVAppXmlBuilder<'a> {
    config: &'a ComposeVAppConfig,
}

impl<'a> ComposeVAppXmlBuilder<'a> {
    pub fn new(config: &'a ComposeVAppConfig) -> Self {
        Self { config }
    }
}

impl DocumentBuilder for ComposeVAppXmlBuilder<'_> {
    fn document_type(&self) -> DocumentType {
        DocumentType::ComposeVAppParams
    }

    fn build(&self) -> Result<Element> {
        debug!(
            name = %self.config.name,
            sources = self.config.sourced_item.len(),
            "Building compose vApp params"
        );

        let mut root = Element::new("ComposeVAppParams")
            .with_attr("xmlns", VCLOUD_NAMESPACE)
            .with_attr("xmlns:ovf", OVF_NAMESPACE)
            .with_attr("name", self.config.name.as_str())
            .with_opt_attr("deploy", self.config.deploy.as_ref())
            .with_opt_attr("powerOn", self.config.power_on.as_ref());

        root.push_opt("Description", self.config.description.as_ref());

        for item in &self.config.sourced_item {
            let source = Element::new("Source")
                .with_attr("href", item.source.href.as_str())
                .with_opt_attr("name", item.source.name.as_ref());
            root.push(Element::new("SourcedItem").with_child(source));
        }

        root.push_opt("AllEULAsAccepted", self.config.all_eulas_accepted.as_ref());

        Ok(root)
    }
}
