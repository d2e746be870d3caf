//! HTML format implementation using tree-sitter-html.
//!
//! This module provides the tree-sitter query for finding attributes in HTML documents and the
//! set of block-level tags used when rendering an element's plain text.

use crate::formats::Format;

/// Tags whose content is separated from surrounding text when rendered as plain text.
const BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "body",
    "br",
    "dd",
    "div",
    "dl",
    "dt",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "tbody",
    "td",
    "tfoot",
    "th",
    "thead",
    "tr",
    "ul",
];

/// Tree-sitter queries for HTML documents.
pub struct HtmlFormat;

impl Format for HtmlFormat {
    fn language(&self) -> tree_sitter::Language {
        tree_sitter_html::LANGUAGE.into()
    }

    fn attribute_query(&self) -> &'static str {
        "(attribute (attribute_name) @name) @attribute"
    }

    fn is_block(&self, tag: &str) -> bool {
        BLOCK_TAGS.contains(&tag)
    }
}
