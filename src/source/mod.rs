//! Page-source parsing module
//!
//! Converts a platform accessibility-tree XML dump into:
//! - SourceNode: a lightweight indexed tree of tag + attributes
//! - Document: an arena with parent links, queryable by path and XPath
//! - Bounds: per-platform pixel-rectangle decoding
//!
//! Both parses degrade to `None` on malformed input; everything here is
//! request-scoped and pure over the XML string.

pub mod document;
pub mod node;
pub mod parser;
pub mod xpath;

pub use document::{DocNode, Document, NodeId};
pub use node::{Bounds, SourceNode};
pub use parser::{count_attribute_occurrences, parse_document, parse_source, parse_tree, ParsedSource};
pub use xpath::UniquenessResult;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_source_export() {
        let parsed = parse_source("<hierarchy/>");
        assert!(parsed.tree.is_some());
        assert!(parsed.document.is_some());
    }

    #[test]
    fn test_bounds_export() {
        let b = Bounds::new(0, 0, 10, 10);
        assert!(b.in_viewport(10, 10));
    }
}
