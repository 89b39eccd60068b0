use alloc::string::String;
use alloc::vec::Vec;

/// One attribute of a begin tag. A bare attribute without `=value` has no value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Attribute {
    pub name: String,
    pub value: Option<String>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: Option<&str>) -> Self {
        Attribute {
            name: name.into(),
            value: value.map(String::from),
        }
    }
}

/// A single parse event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// An opening tag. `offset` is the character position of its `<`.
    Begin {
        name: String,
        offset: usize,
        attributes: Vec<Attribute>,
    },
    /// Text between tags, named after the innermost open element.
    Value { name: String, text: String },
    /// A closing tag, explicit or synthesized for a self-closing tag.
    End { name: String },
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Node::Begin { name, .. } | Node::Value { name, .. } | Node::End { name } => name,
        }
    }

    /// Case-sensitive attribute lookup on a begin node.
    /// Returns `Some(None)` for a bare attribute.
    /// ```
    /// # use stack_xml::{Node, Attribute};
    /// let node = Node::Begin {
    ///     name: "a".into(),
    ///     offset: 0,
    ///     attributes: vec![Attribute::new("b", Some("1")), Attribute::new("c", None)],
    /// };
    /// assert_eq!(node.attribute("b"), Some(Some("1")));
    /// assert_eq!(node.attribute("c"), Some(None));
    /// assert_eq!(node.attribute("d"), None);
    /// ```
    pub fn attribute(&self, name: &str) -> Option<Option<&str>> {
        let Node::Begin { attributes, .. } = self else {
            return None;
        };
        attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_deref())
    }
}

/// An element whose begin tag has been parsed but whose end has not.
#[derive(Debug, Clone)]
pub(crate) struct OpenElement {
    pub name: String,
    pub offset: usize,
    pub attributes: Vec<Attribute>,
}

impl OpenElement {
    pub fn begin_node(&self) -> Node {
        Node::Begin {
            name: self.name.clone(),
            offset: self.offset,
            attributes: self.attributes.clone(),
        }
    }

    pub fn value_node(&self, text: String) -> Node {
        Node::Value {
            name: self.name.clone(),
            text,
        }
    }

    pub fn into_end_node(self) -> Node {
        Node::End { name: self.name }
    }
}
