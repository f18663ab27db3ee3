use crate::source::document::Document;
use crate::source::node::SourceNode;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;
use std::collections::HashMap;

/// Both views of one page-source capture. Each parse is attempted
/// independently: callers may use either in isolation, and a failure in one
/// must not take the other down with it.
#[derive(Debug, Clone, Default)]
pub struct ParsedSource {
    pub tree: Option<SourceNode>,
    pub document: Option<Document>,
}

/// Parse a page-source capture into both the lightweight tree and the
/// XPath-queryable document.
pub fn parse_source(xml: &str) -> ParsedSource {
    ParsedSource {
        tree: parse_tree(xml),
        document: parse_document(xml),
    }
}

/// Parse the dump into a lightweight indexed tree. Returns `None` (logged)
/// on malformed input; never panics.
pub fn parse_tree(xml: &str) -> Option<SourceNode> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<SourceNode> = Vec::new();
    let mut root: Option<SourceNode> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                if stack.is_empty() && root.is_some() {
                    continue;
                }
                let node = open_node(e, stack.last())?;
                stack.push(node);
            }
            Ok(Event::Empty(ref e)) => {
                if stack.is_empty() && root.is_some() {
                    continue;
                }
                let node = open_node(e, stack.last())?;
                match stack.last_mut() {
                    Some(parent) => parent.add_child(node),
                    None if root.is_none() => root = Some(node),
                    None => {}
                }
            }
            Ok(Event::End(_)) => {
                let completed = match stack.pop() {
                    Some(n) => n,
                    None => {
                        log::warn!("Page source parse failed: unexpected closing tag");
                        return None;
                    }
                };
                match stack.last_mut() {
                    Some(parent) => parent.add_child(completed),
                    None if root.is_none() => root = Some(completed),
                    None => {}
                }
            }
            Ok(Event::Eof) => {
                if !stack.is_empty() {
                    log::warn!(
                        "Page source parse failed: {} unclosed element(s)",
                        stack.len()
                    );
                    return None;
                }
                break;
            }
            // Text, CDATA, comments and declarations carry no element data
            Ok(_) => {}
            Err(e) => {
                log::warn!(
                    "Page source parse failed at byte {}: {}",
                    reader.error_position(),
                    e
                );
                return None;
            }
        }
    }

    if root.is_none() {
        log::warn!("Page source parse failed: no root element");
    }
    root
}

/// Parse the dump into the arena document used for XPath uniqueness queries
/// and ancestor walks. Returns `None` (logged) on malformed input.
pub fn parse_document(xml: &str) -> Option<Document> {
    let mut reader = Reader::from_str(xml);
    let mut doc = Document::new();
    let mut stack: Vec<usize> = Vec::new();
    let mut saw_root = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                if stack.is_empty() && saw_root {
                    continue;
                }
                let (tag, attrs) = read_element(e)?;
                let id = doc.push_node(tag, attrs, stack.last().copied());
                stack.push(id);
                saw_root = true;
            }
            Ok(Event::Empty(ref e)) => {
                if stack.is_empty() && saw_root {
                    continue;
                }
                let (tag, attrs) = read_element(e)?;
                doc.push_node(tag, attrs, stack.last().copied());
                saw_root = true;
            }
            Ok(Event::End(_)) => {
                if stack.pop().is_none() {
                    log::warn!("Page source parse failed: unexpected closing tag");
                    return None;
                }
            }
            Ok(Event::Eof) => {
                if !stack.is_empty() {
                    log::warn!(
                        "Page source parse failed: {} unclosed element(s)",
                        stack.len()
                    );
                    return None;
                }
                break;
            }
            Ok(_) => {}
            Err(e) => {
                log::warn!(
                    "Page source parse failed at byte {}: {}",
                    reader.error_position(),
                    e
                );
                return None;
            }
        }
    }

    if doc.is_empty() {
        log::warn!("Page source parse failed: no root element");
        return None;
    }
    Some(doc)
}

/// Count raw-text occurrences of `attr="value"` in the XML string. A cheap
/// uniqueness pre-check for when no parsed document is available; attribute
/// value containment can false-positive, so the document-backed check is
/// authoritative whenever it exists.
pub fn count_attribute_occurrences(xml: &str, attr: &str, value: &str) -> usize {
    let pattern = format!(r#"{}="{}""#, regex::escape(attr), regex::escape(value));
    match Regex::new(&pattern) {
        Ok(re) => re.find_iter(xml).count(),
        Err(e) => {
            log::warn!("Attribute occurrence pattern failed for '{}': {}", attr, e);
            0
        }
    }
}

fn open_node(e: &BytesStart<'_>, parent: Option<&SourceNode>) -> Option<SourceNode> {
    let (tag, attrs) = read_element(e)?;
    let path = match parent {
        Some(p) => format!("{}.{}", p.path, p.children.len()),
        None => "0".to_string(),
    };
    let mut node = SourceNode::new(tag).with_path(path);
    node.attributes = attrs;
    Some(node)
}

fn read_element(e: &BytesStart<'_>) -> Option<(String, HashMap<String, String>)> {
    let tag = match std::str::from_utf8(e.name().as_ref()) {
        Ok(t) => t.to_string(),
        Err(err) => {
            log::warn!("Page source parse failed: invalid element name: {}", err);
            return None;
        }
    };
    let mut attrs = HashMap::new();
    for attr in e.attributes() {
        let attr = match attr {
            Ok(a) => a,
            Err(err) => {
                log::warn!("Page source parse failed: bad attribute on <{}>: {}", tag, err);
                return None;
            }
        };
        let key = match std::str::from_utf8(attr.key.as_ref()) {
            Ok(k) => k.to_string(),
            Err(_) => continue,
        };
        let value = match attr.unescape_value() {
            Ok(v) => escape_newlines(&v),
            Err(_) => continue,
        };
        attrs.insert(key, value);
    }
    Some((tag, attrs))
}

/// Newlines inside attribute values are stored as a literal backslash-n so
/// downstream pattern matching keeps single-line attribute semantics.
fn escape_newlines(value: &str) -> String {
    if value.contains('\n') || value.contains('\r') {
        value.replace("\r\n", "\n").replace(['\n', '\r'], "\\n")
    } else {
        value.to_string()
    }
}
