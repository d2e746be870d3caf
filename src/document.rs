//! Parsed hypertext documents and the handful of lookups the mapper needs on them.
//!
//! Documents are parsed once with tree-sitter and never re-serialised. Callers locate nodes here
//! and then plan insertions at their byte offsets (see [`crate::edit_plan`]), so everything they
//! do not touch is written back byte for byte.

use std::collections::HashMap;

use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, Parser, Query, QueryCursor, Tree};

use crate::error::MapperError;
use crate::formats::html::HtmlFormat;
use crate::formats::Format;

/// An HTML document with an index of element ids.
pub struct HtmlDocument {
    source: String,
    tree: Tree,
    ids: HashMap<String, (usize, usize)>,
    format: HtmlFormat,
}

impl HtmlDocument {
    /// Parses `source` as HTML.
    ///
    /// Malformed markup is tolerated the way browsers tolerate it; the grammar recovers and the
    /// damaged region is simply not matched by lookups.
    ///
    /// # Errors
    ///
    /// Returns [`MapperError::HtmlParse`] if the grammar or its query cannot be loaded.
    pub fn parse(source: impl Into<String>) -> Result<Self, MapperError> {
        let source = source.into();
        let format = HtmlFormat;
        let language = format.language();

        let mut parser = Parser::new();
        parser
            .set_language(&language)
            .map_err(|e| MapperError::HtmlParse {
                detail: e.to_string(),
            })?;
        let tree = parser
            .parse(&source, None)
            .ok_or_else(|| MapperError::HtmlParse {
                detail: "parser produced no tree".to_string(),
            })?;

        let query =
            Query::new(&language, format.attribute_query()).map_err(|e| MapperError::HtmlParse {
                detail: e.to_string(),
            })?;
        let ids = index_ids(&query, &tree, &source);

        Ok(Self {
            source,
            tree,
            ids,
            format,
        })
    }

    #[must_use]
    /// The text the document was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    /// The document node.
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    #[must_use]
    /// First element in document order whose `id` attribute equals `id`.
    pub fn element_by_id(&self, id: &str) -> Option<Node<'_>> {
        let &(start, end) = self.ids.get(id)?;
        let mut node = self.root().descendant_for_byte_range(start, end)?;
        while !is_element(node) {
            node = node.parent()?;
        }
        Some(node)
    }

    #[must_use]
    /// Lowercase tag name of an element node.
    pub fn tag_name(&self, element: Node<'_>) -> Option<String> {
        match element.kind() {
            "script_element" => return Some("script".to_string()),
            "style_element" => return Some("style".to_string()),
            _ => {}
        }
        let tag = opening_tag(element)?;
        let mut cursor = tag.walk();
        let name = tag
            .named_children(&mut cursor)
            .find(|child| child.kind() == "tag_name")?;
        Some(self.raw_text(name).to_ascii_lowercase())
    }

    #[must_use]
    /// Value of the attribute `name` on `element`, with character references decoded.
    ///
    /// Attribute names compare case-insensitively. A bare attribute has an empty value.
    pub fn attribute(&self, element: Node<'_>, name: &str) -> Option<String> {
        let tag = opening_tag(element)?;
        let mut cursor = tag.walk();
        let attribute = tag
            .named_children(&mut cursor)
            .filter(|child| child.kind() == "attribute")
            .find(|attribute| {
                first_named_child(*attribute)
                    .is_some_and(|n| self.raw_text(n).eq_ignore_ascii_case(name))
            })?;
        Some(attribute_value(attribute, &self.source))
    }

    #[must_use]
    /// `root` and its descendants, in document order, whose class list contains `class`.
    pub fn elements_with_class<'a>(&'a self, root: Node<'a>, class: &str) -> Vec<Node<'a>> {
        descendants(root)
            .into_iter()
            .filter(|node| is_element(*node))
            .filter(|node| {
                self.attribute(*node, "class")
                    .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == class))
            })
            .collect()
    }

    #[must_use]
    /// First element named `tag` among `root` and its descendants.
    pub fn first_element_by_tag<'a>(&'a self, root: Node<'a>, tag: &str) -> Option<Node<'a>> {
        descendants(root)
            .into_iter()
            .filter(|node| is_element(*node))
            .find(|node| self.tag_name(*node).is_some_and(|t| t == tag))
    }

    #[must_use]
    /// First element named `tag` among `root` and its descendants that carries `attribute`.
    pub fn first_element_with_attribute<'a>(
        &'a self,
        root: Node<'a>,
        tag: &str,
        attribute: &str,
    ) -> Option<Node<'a>> {
        descendants(root)
            .into_iter()
            .filter(|node| is_element(*node))
            .filter(|node| self.tag_name(*node).is_some_and(|t| t == tag))
            .find(|node| self.attribute(*node, attribute).is_some())
    }

    #[must_use]
    /// Plain-text rendering of a node.
    ///
    /// Text and character references are concatenated; block-level elements are separated from
    /// their neighbours, and source whitespace between inline nodes is kept; scripts, styles and
    /// comments are dropped. Whitespace runs collapse to a single space and the result is trimmed.
    pub fn text(&self, node: Node<'_>) -> String {
        let mut raw = String::new();
        self.collect_text(node, &mut raw);
        collapse_whitespace(&raw)
    }

    fn collect_text(&self, node: Node<'_>, out: &mut String) {
        match node.kind() {
            "text" | "entity" => out.push_str(&decode_entities(self.raw_text(node))),
            "comment" | "doctype" | "script_element" | "style_element" => {}
            "start_tag" | "end_tag" | "self_closing_tag" => {
                let block = node.parent().and_then(|element| self.tag_name(element));
                if block.is_some_and(|tag| self.format.is_block(&tag)) {
                    out.push(' ');
                }
            }
            _ => {
                let mut cursor = node.walk();
                let mut previous_end = node.start_byte();
                for child in node.children(&mut cursor) {
                    self.push_gap(previous_end, child.start_byte(), out);
                    self.collect_text(child, out);
                    previous_end = child.end_byte();
                }
                self.push_gap(previous_end, node.end_byte(), out);
            }
        }
    }

    /// Whitespace between tokens is grammar extras, so it only shows up as a gap between nodes.
    fn push_gap(&self, start: usize, end: usize, out: &mut String) {
        let gap = self.source.as_bytes().get(start..end).unwrap_or_default();
        if gap.iter().any(u8::is_ascii_whitespace) {
            out.push(' ');
        }
    }

    #[must_use]
    /// Byte offset just before an element's closing tag, or its end if it has none.
    pub fn content_end(&self, element: Node<'_>) -> usize {
        let mut cursor = element.walk();
        let end_tag = element
            .children(&mut cursor)
            .find(|child| child.kind() == "end_tag");
        end_tag.map_or(element.end_byte(), |tag| tag.start_byte())
    }

    fn raw_text(&self, node: Node<'_>) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or_default()
    }
}

fn index_ids(query: &Query, tree: &Tree, source: &str) -> HashMap<String, (usize, usize)> {
    let mut ids = HashMap::new();
    let (Some(name_index), Some(attribute_index)) = (
        query.capture_index_for_name("name"),
        query.capture_index_for_name("attribute"),
    ) else {
        return ids;
    };

    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(query, tree.root_node(), source.as_bytes());
    while let Some(m) = matches.next() {
        let name = m.captures.iter().find(|c| c.index == name_index);
        let attribute = m.captures.iter().find(|c| c.index == attribute_index);
        let (Some(name), Some(attribute)) = (name, attribute) else {
            continue;
        };
        let is_id = name
            .node
            .utf8_text(source.as_bytes())
            .is_ok_and(|n| n.eq_ignore_ascii_case("id"));
        if !is_id {
            continue;
        }
        let Some(element) = attribute.node.parent().and_then(|tag| tag.parent()) else {
            continue;
        };
        ids.entry(attribute_value(attribute.node, source))
            .or_insert((element.start_byte(), element.end_byte()));
    }
    ids
}

fn is_element(node: Node<'_>) -> bool {
    matches!(node.kind(), "element" | "script_element" | "style_element")
}

fn first_named_child(node: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = node.walk();
    let first = node.named_children(&mut cursor).next();
    first
}

fn opening_tag(element: Node<'_>) -> Option<Node<'_>> {
    first_named_child(element).filter(|tag| matches!(tag.kind(), "start_tag" | "self_closing_tag"))
}

fn attribute_value(attribute: Node<'_>, source: &str) -> String {
    let mut cursor = attribute.walk();
    for child in attribute.named_children(&mut cursor) {
        let value = match child.kind() {
            "attribute_value" => Some(child),
            "quoted_attribute_value" => first_named_child(child),
            _ => continue,
        };
        return value
            .and_then(|v| v.utf8_text(source.as_bytes()).ok())
            .map(decode_entities)
            .unwrap_or_default();
    }
    String::new()
}

/// Pre-order list of `root` and all its descendants.
fn descendants(root: Node<'_>) -> Vec<Node<'_>> {
    let mut nodes = Vec::new();
    let mut cursor = root.walk();
    let mut visit = true;
    loop {
        if visit {
            nodes.push(cursor.node());
            if cursor.goto_first_child() {
                continue;
            }
        }
        if cursor.node().id() == root.id() {
            break;
        }
        if cursor.goto_next_sibling() {
            visit = true;
            continue;
        }
        if !cursor.goto_parent() {
            break;
        }
        visit = false;
    }
    nodes
}

/// Replaces character references, numeric or any HTML5 named one, with their characters.
///
/// Unknown named references are left as written.
#[must_use]
pub fn decode_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

/// Trims `text` and collapses every run of whitespace to one space.
///
/// No-break spaces count as whitespace, so `A&nbsp;B` and `A B` render alike.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    text.split(|c: char| c.is_ascii_whitespace() || c == '\u{a0}')
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "tests/document.rs"]
mod tests;
