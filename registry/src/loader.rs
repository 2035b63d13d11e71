//! Registry document loading and element helpers.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use xmltree::{Element, XMLNode};

use crate::error::{RegistryError, Result};

/// Parsed registry document.
///
/// Wraps the XML tree and exposes the three collections the generator reads:
/// `commands/command`, `extensions/extension` and top-level `feature` blocks.
///
/// # Examples
///
/// ```
/// use vkmock_registry::Registry;
///
/// let registry = Registry::parse_str(r#"
/// <registry>
///   <commands>
///     <command><proto><type>void</type> <name>Foo</name></proto></command>
///   </commands>
/// </registry>"#).unwrap();
///
/// assert_eq!(registry.commands().count(), 1);
/// assert_eq!(registry.extensions().count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct Registry {
    root: Element,
}

impl Registry {
    /// Loads a registry from a file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](RegistryError::IoError) if the file cannot be
    /// opened, [`XmlError`](RegistryError::XmlError) if it is malformed, or
    /// [`MissingElement`](RegistryError::MissingElement) if it has no
    /// `<commands>` collection.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::parse(BufReader::new(file))
    }

    /// Parses a registry from any reader.
    pub fn parse<R: Read>(reader: R) -> Result<Self> {
        Self::from_root(Element::parse(reader)?)
    }

    /// Parses a registry from an in-memory string.
    pub fn parse_str(raw: &str) -> Result<Self> {
        Self::parse(raw.as_bytes())
    }

    fn from_root(root: Element) -> Result<Self> {
        if root.get_child("commands").is_none() {
            return Err(RegistryError::MissingElement("commands"));
        }
        Ok(Self { root })
    }

    /// Command entries in document order.
    pub fn commands(&self) -> impl Iterator<Item = &Element> {
        child_elements(&self.root, "commands").flat_map(|commands| child_elements(commands, "command"))
    }

    /// Extension entries in document order. Empty when the registry has no
    /// `<extensions>` collection.
    pub fn extensions(&self) -> impl Iterator<Item = &Element> {
        child_elements(&self.root, "extensions")
            .flat_map(|extensions| child_elements(extensions, "extension"))
    }

    /// Core API `feature` blocks in document order.
    pub fn features(&self) -> impl Iterator<Item = &Element> {
        child_elements(&self.root, "feature")
    }
}

/// Direct child elements of `parent` named `name`.
pub(crate) fn child_elements<'a>(
    parent: &'a Element,
    name: &'a str,
) -> impl Iterator<Item = &'a Element> + 'a {
    parent.children.iter().filter_map(move |child| match child {
        XMLNode::Element(el) if el.name == name => Some(el),
        _ => None,
    })
}

/// Attribute lookup.
pub(crate) fn attr<'a>(element: &'a Element, name: &str) -> Option<&'a str> {
    element.attributes.get(name).map(String::as_str)
}

/// Returns `true` when an `api="a,b"` attribute is absent or lists `api`.
pub(crate) fn supports_api(element: &Element, api: &str) -> bool {
    match attr(element, "api") {
        None => true,
        Some(list) => list.split(',').map(str::trim).any(|candidate| candidate == api),
    }
}

/// Concatenated text of an element and all its descendants.
pub(crate) fn element_text(element: &Element) -> String {
    let mut out = String::new();
    collect_text(element, &mut out);
    out
}

fn collect_text(element: &Element, out: &mut String) {
    for child in &element.children {
        match child {
            XMLNode::Text(text) | XMLNode::CData(text) => join_piece(out, text),
            XMLNode::Element(el) => collect_text(el, out),
            _ => {}
        }
    }
}

/// Appends a declaration fragment, keeping adjacent identifiers apart.
///
/// Whitespace-only text between elements may or may not survive XML parsing,
/// so two word characters meeting at a fragment boundary get a space.
pub(crate) fn join_piece(out: &mut String, piece: &str) {
    let needs_space = matches!(
        (out.chars().last(), piece.chars().next()),
        (Some(a), Some(b)) if is_word_char(a) && is_word_char(b)
    );
    if needs_space {
        out.push(' ');
    }
    out.push_str(piece);
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
