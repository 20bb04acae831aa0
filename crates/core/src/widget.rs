//! Widget model - the rendered markup tree of a tactic state.
//!
//! The renderer's only contract is tag, attributes and children plus a
//! handful of class-name conventions, so the model stays deliberately
//! loose: leaves are plain strings, elements carry an arbitrary attribute
//! map, and tagless components just wrap children.

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Attribute key holding CSS class names.
pub const CLASS_NAME: &str = "className";

/// A node of the widget tree.
///
/// On the wire a node is a bare string, an object with a `t` key
/// (element), or any other object (component).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WidgetNode {
    /// Raw text
    Text(String),

    /// Tagged markup element
    Element(WidgetElement),

    /// Tagless wrapper around children
    Component(WidgetComponent),
}

impl WidgetNode {
    /// Create a text leaf.
    pub fn text(text: impl Into<String>) -> Self {
        WidgetNode::Text(text.into())
    }

    /// Get the element, if this node is one.
    pub fn as_element(&self) -> Option<&WidgetElement> {
        match self {
            WidgetNode::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Get the text, if this node is a leaf.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            WidgetNode::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Children of this node (empty for text leaves).
    pub fn children(&self) -> &[WidgetNode] {
        match self {
            WidgetNode::Text(_) => &[],
            WidgetNode::Element(element) => &element.children,
            WidgetNode::Component(component) => &component.children,
        }
    }
}

impl<'de> Deserialize<'de> for WidgetNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(WidgetNodeVisitor)
    }
}

/// Decides the node kind from the shape seen, so children are read once.
struct WidgetNodeVisitor;

impl<'de> Visitor<'de> for WidgetNodeVisitor {
    type Value = WidgetNode;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a widget text leaf or node object")
    }

    fn visit_str<E: de::Error>(self, text: &str) -> Result<WidgetNode, E> {
        Ok(WidgetNode::Text(text.to_string()))
    }

    fn visit_string<E: de::Error>(self, text: String) -> Result<WidgetNode, E> {
        Ok(WidgetNode::Text(text))
    }

    fn visit_map<A>(self, mut map: A) -> Result<WidgetNode, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut tag: Option<String> = None;
        let mut attributes: Option<BTreeMap<String, AttributeValue>> = None;
        let mut children: Option<Vec<WidgetNode>> = None;

        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "t" => tag = Some(map.next_value()?),
                "a" => attributes = map.next_value()?,
                "c" => children = Some(map.next_value()?),
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }

        let children = children.unwrap_or_default();
        Ok(match tag {
            Some(tag) => WidgetNode::Element(WidgetElement {
                tag,
                attributes: attributes.unwrap_or_default(),
                children,
            }),
            None => WidgetNode::Component(WidgetComponent { children }),
        })
    }
}

impl From<WidgetElement> for WidgetNode {
    fn from(element: WidgetElement) -> Self {
        WidgetNode::Element(element)
    }
}

impl From<&str> for WidgetNode {
    fn from(text: &str) -> Self {
        WidgetNode::text(text)
    }
}

/// A tagged markup element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetElement {
    /// Tag name, e.g. `li` or `span`
    #[serde(rename = "t")]
    pub tag: String,

    /// Attributes
    #[serde(rename = "a", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, AttributeValue>,

    /// Children in document order
    #[serde(rename = "c", default)]
    pub children: Vec<WidgetNode>,
}

impl WidgetElement {
    /// Create an element without attributes or children.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: AttributeValue) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Set the class name attribute.
    pub fn with_class(self, class: impl Into<String>) -> Self {
        self.with_attribute(CLASS_NAME, AttributeValue::Text(class.into()))
    }

    /// Add a child.
    pub fn with_child(mut self, child: impl Into<WidgetNode>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Add a text child.
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_child(WidgetNode::text(text))
    }

    /// Whether the tag matches.
    pub fn is(&self, tag: &str) -> bool {
        self.tag == tag
    }

    /// The class name attribute, if present.
    pub fn class_name(&self) -> Option<&AttributeValue> {
        self.attributes.get(CLASS_NAME)
    }

    /// The text of the only child, when the children are exactly one leaf.
    pub fn sole_text(&self) -> Option<&str> {
        match self.children.as_slice() {
            [WidgetNode::Text(text)] => Some(text),
            _ => None,
        }
    }

    /// Direct children that are elements.
    pub fn child_elements(&self) -> impl Iterator<Item = &WidgetElement> {
        self.children.iter().filter_map(WidgetNode::as_element)
    }
}

/// A tagless component node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WidgetComponent {
    /// Children in document order
    #[serde(rename = "c", default)]
    pub children: Vec<WidgetNode>,
}

/// An attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Single string
    Text(String),

    /// List of strings
    List(Vec<String>),

    /// Anything else the renderer sends, kept verbatim
    Other(serde_json::Value),
}

impl AttributeValue {
    /// JSON serialization of the value.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Whether the serialized value contains `needle`.
    ///
    /// Matches both the string and the list shape of class names.
    pub fn contains(&self, needle: &str) -> bool {
        self.to_json().contains(needle)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<Vec<&str>> for AttributeValue {
    fn from(values: Vec<&str>) -> Self {
        AttributeValue::List(values.into_iter().map(String::from).collect())
    }
}
