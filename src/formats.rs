//! Format trait and implementations for the hypertext documents the mapper reads.
//!
//! This module defines the `Format` trait which abstracts over a tree-sitter grammar and the
//! queries needed to locate anchors in documents written in it. Only HTML is needed today; the
//! coverage report and the specification are both rendered as HTML.

pub mod html;

/// Grammar and queries for one document language.
pub trait Format {
    /// Tree-sitter language used to parse the document.
    fn language(&self) -> tree_sitter::Language;
    /// Query capturing every attribute node as `@attribute` and its name as `@name`.
    fn attribute_query(&self) -> &str;
    /// Whether an element with this (lowercase) tag name separates the text around it.
    fn is_block(&self, tag: &str) -> bool;
}
