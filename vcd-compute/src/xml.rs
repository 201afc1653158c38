//! Document tree primitives and XML rendering.
//!
//! Builders assemble an [`Element`] tree in schema order and hand it to
//! [`render`], which serializes it with `quick-xml`. Text and attribute values
//! are escaped by the writer, so builders never deal with markup syntax.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

use crate::error::{ComputeError, Result};
use crate::types::Scalar;

/// Content of an element: nothing, a single text value, or child elements.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Content {
    #[default]
    Empty,
    Text(String),
    Children(Vec<Element>),
}

/// A named element in a document tree.
///
/// The name is stored fully qualified (`rasd:Address`); the namespace prefix
/// must be declared on an ancestor, normally the document root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    content: Content,
}

impl Element {
    /// Create an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            content: Content::Empty,
        }
    }

    /// Create an empty element whose name carries a namespace prefix.
    pub fn qualified(prefix: &str, local: &str) -> Self {
        Self::new(format!("{}:{}", prefix, local))
    }

    /// Create an element holding a single text value.
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            content: Content::Text(value.into()),
            ..Self::new(name)
        }
    }

    /// Add an attribute (builder style). Attributes keep insertion order.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Add an attribute only when a value is present.
    pub fn with_opt_attr(mut self, name: impl Into<String>, value: Option<&Scalar>) -> Self {
        if let Some(value) = value {
            self.set_attr(name, value.as_str());
        }
        self
    }

    /// Set an attribute, replacing an existing one with the same name.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Append a child element.
    ///
    /// An element never carries text and children together: appending to a
    /// text element replaces the text.
    pub fn push(&mut self, child: Element) {
        match &mut self.content {
            Content::Children(children) => children.push(child),
            content => *content = Content::Children(vec![child]),
        }
    }

    /// Append a text child.
    pub fn push_text(&mut self, name: &str, value: &Scalar) {
        self.push(Element::text(name, value.as_str()));
    }

    /// Append a text child when the value is present.
    pub fn push_opt(&mut self, name: &str, value: Option<&Scalar>) {
        if let Some(value) = value {
            self.push_text(name, value);
        }
    }

    /// Append a child element (builder style).
    pub fn with_child(mut self, child: Element) -> Self {
        self.push(child);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Look up an attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    /// Text value, if this is a text element.
    pub fn text_value(&self) -> Option<&str> {
        match &self.content {
            Content::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Child elements (empty for text and empty elements).
    pub fn children(&self) -> &[Element] {
        match &self.content {
            Content::Children(children) => children,
            _ => &[],
        }
    }

    /// First child with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children().iter().find(|c| c.name == name)
    }

    /// All children with the given name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children().iter().filter(move |c| c.name == name)
    }

    /// Names of the direct children, in document order.
    pub fn child_names(&self) -> Vec<&str> {
        self.children().iter().map(|c| c.name.as_str()).collect()
    }
}

/// Output options for [`render`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Spaces per nesting level; `0` renders on a single line.
    pub indent: usize,
    /// Emit the `<?xml ...?>` declaration.
    pub declaration: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            declaration: true,
        }
    }
}

impl RenderOptions {
    /// Single-line output without a declaration.
    pub fn compact() -> Self {
        Self {
            indent: 0,
            declaration: false,
        }
    }
}

/// Serialize a document tree to XML text.
pub fn render(root: &Element, options: &RenderOptions) -> Result<String> {
    let mut writer = if options.indent > 0 {
        Writer::new_with_indent(Vec::new(), b' ', options.indent)
    } else {
        Writer::new(Vec::new())
    };

    if options.declaration {
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_error)?;
    }

    write_element(&mut writer, root)?;

    let mut xml = String::from_utf8(writer.into_inner())
        .map_err(|e| ComputeError::Xml(format!("Generated document is not UTF-8: {}", e)))?;
    if options.indent > 0 {
        xml.push('\n');
    }
    Ok(xml)
}

fn write_element<W: Write>(writer: &mut Writer<W>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (name, value) in &element.attributes {
        start.push_attribute((name.as_str(), value.as_str()));
    }

    match &element.content {
        Content::Empty => {
            writer.write_event(Event::Empty(start)).map_err(xml_error)?;
        }
        Content::Text(text) => {
            writer.write_event(Event::Start(start)).map_err(xml_error)?;
            writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(xml_error)?;
            writer
                .write_event(Event::End(BytesEnd::new(element.name.as_str())))
                .map_err(xml_error)?;
        }
        Content::Children(children) => {
            writer.write_event(Event::Start(start)).map_err(xml_error)?;
            for child in children {
                write_element(writer, child)?;
            }
            writer
                .write_event(Event::End(BytesEnd::new(element.name.as_str())))
                .map_err(xml_error)?;
        }
    }

    Ok(())
}

fn xml_error(err: quick_xml::Error) -> ComputeError {
    ComputeError::Xml(err.to_string())
}
