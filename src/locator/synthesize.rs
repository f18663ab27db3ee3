use crate::locator::{Platform, Strategy};
use crate::source::document::{Document, NodeId};
use crate::source::xpath::{self, xpath_literal, UniquenessResult};
use crate::source::{count_attribute_occurrences, SourceNode};
use indexmap::IndexMap;

/// How many ancestor levels the hierarchical XPath fallback may climb
const MAX_ANCESTOR_DEPTH: usize = 3;

/// Text values at or above this length are too brittle for text selectors
const MAX_TEXT_LOCATOR_LEN: usize = 100;

/// One proposed `(strategy, value)` pair before deduplication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub strategy: Strategy,
    pub value: String,
}

impl Candidate {
    fn new(strategy: Strategy, value: impl Into<String>) -> Self {
        Self {
            strategy,
            value: value.into(),
        }
    }
}

/// Per-capture locator synthesizer.
///
/// Holds the parsed document (when available), the raw XML for the
/// regex-based uniqueness fallback, and the UiAutomator scope boundary.
/// Stateless across elements; safe to reuse for every node of one capture.
pub struct LocatorSynthesizer<'a> {
    platform: Platform,
    document: Option<&'a Document>,
    raw_xml: &'a str,
    /// Root-child index of the app-content subtree UiAutomator can address,
    /// `None` when every element is in scope
    uiautomator_scope: Option<usize>,
}

impl<'a> LocatorSynthesizer<'a> {
    pub fn new(
        platform: Platform,
        document: Option<&'a Document>,
        raw_xml: &'a str,
        root: Option<&SourceNode>,
    ) -> Self {
        // UiAutomator's selector engine only addresses elements under the
        // last child of the synthetic /hierarchy root (the app content, not
        // chrome like the status bar).
        let uiautomator_scope = match (platform, root) {
            (Platform::Android, Some(r)) if r.tag_name == "hierarchy" && !r.children.is_empty() => {
                Some(r.children.len() - 1)
            }
            _ => None,
        };
        Self {
            platform,
            document,
            raw_xml,
            uiautomator_scope,
        }
    }

    /// Produce the deduplicated, priority-ordered locator map for one node.
    /// `target` is the node's counterpart in the parsed document, used for
    /// positional disambiguation.
    pub fn synthesize(
        &self,
        node: &SourceNode,
        target: Option<NodeId>,
    ) -> IndexMap<Strategy, String> {
        let mut candidates = match self.platform {
            Platform::Android => self.android_simple(node, target),
            Platform::Ios => self.ios_simple(node, target),
        };
        match self.platform {
            Platform::Android => candidates.extend(self.android_complex(node, target)),
            Platform::Ios => candidates.extend(self.ios_complex(node, target)),
        }
        dedup_candidates(candidates)
    }

    fn in_uiautomator_scope(&self, node: &SourceNode) -> bool {
        match self.uiautomator_scope {
            Some(idx) => node.root_child_index() == Some(idx),
            None => true,
        }
    }

    /// Uniqueness of a single-attribute match across the whole capture.
    /// Document-backed when possible; otherwise the raw-text occurrence
    /// counter decides, with no positional information.
    fn attr_uniqueness(
        &self,
        attr: &str,
        value: &str,
        target: Option<NodeId>,
    ) -> UniquenessResult {
        match (self.document, target) {
            (Some(doc), Some(t)) => {
                let expr = format!("//*[@{}={}]", attr, xpath_literal(value));
                xpath::check_uniqueness(doc, &expr, t, self.platform)
            }
            _ => {
                let total = count_attribute_occurrences(self.raw_xml, attr, value);
                UniquenessResult {
                    unique: total == 1,
                    index: None,
                    total: Some(total),
                }
            }
        }
    }

    // --- Android ---

    fn android_simple(&self, node: &SourceNode, target: Option<NodeId>) -> Vec<Candidate> {
        let mut out = Vec::new();
        let in_scope = self.in_uiautomator_scope(node);

        if let Some(rid) = node.non_empty_attr("resource-id") {
            let res = self.attr_uniqueness("resource-id", rid, target);
            if res.unique {
                out.push(Candidate::new(Strategy::Id, rid));
            }
            if in_scope {
                let selector = format!("new UiSelector().resourceId({})", quoted(rid));
                if res.unique {
                    out.push(Candidate::new(Strategy::UiAutomator, selector));
                } else if let Some(index) = res.index {
                    // UiSelector.instance() is 0-based
                    out.push(Candidate::new(
                        Strategy::UiAutomator,
                        format!("{}.instance({})", selector, index - 1),
                    ));
                }
            }
        }

        // Accessibility id ignores the UiAutomator scope boundary but has no
        // indexing support, so only a globally unique value is usable.
        if let Some(desc) = node.non_empty_attr("content-desc") {
            if self.attr_uniqueness("content-desc", desc, target).unique {
                out.push(Candidate::new(Strategy::AccessibilityId, desc));
            }
        }

        if let Some(text) = node.non_empty_attr("text") {
            if text.chars().count() < MAX_TEXT_LOCATOR_LEN {
                let res = self.attr_uniqueness("text", text, target);
                if res.unique {
                    out.push(Candidate::new(Strategy::Text, text));
                }
                if in_scope {
                    let selector = format!("new UiSelector().text({})", quoted(text));
                    if res.unique {
                        out.push(Candidate::new(Strategy::UiAutomator, selector));
                    } else if let Some(index) = res.index {
                        out.push(Candidate::new(
                            Strategy::UiAutomator,
                            format!("{}.instance({})", selector, index - 1),
                        ));
                    }
                }
            }
        }

        out
    }

    fn android_complex(&self, node: &SourceNode, target: Option<NodeId>) -> Vec<Candidate> {
        let mut out = Vec::new();
        let in_scope = self.in_uiautomator_scope(node);

        let rid = node.non_empty_attr("resource-id");
        // Long text is as unusable in a compound selector as in a simple one
        let text = node
            .non_empty_attr("text")
            .filter(|t| t.chars().count() < MAX_TEXT_LOCATOR_LEN);
        let desc = node.non_empty_attr("content-desc");

        if in_scope {
            let mut selector = String::from("new UiSelector()");
            let mut attr_tests: Vec<(&str, &str)> = Vec::new();
            if let Some(v) = rid {
                selector.push_str(&format!(".resourceId({})", quoted(v)));
                attr_tests.push(("resource-id", v));
            }
            if let Some(v) = text {
                selector.push_str(&format!(".text({})", quoted(v)));
                attr_tests.push(("text", v));
            }
            if let Some(v) = desc {
                selector.push_str(&format!(".description({})", quoted(v)));
                attr_tests.push(("content-desc", v));
            }
            selector.push_str(&format!(".className({})", quoted(&node.tag_name)));

            if !attr_tests.is_empty() {
                let preds: Vec<String> = attr_tests
                    .iter()
                    .map(|(a, v)| format!("@{}={}", a, xpath_literal(v)))
                    .collect();
                let expr = format!("//{}[{}]", node.tag_name, preds.join(" and "));
                let res = self.xpath_uniqueness(&expr, target);
                if res.unique {
                    out.push(Candidate::new(Strategy::UiAutomator, selector));
                } else if let Some(index) = res.index {
                    out.push(Candidate::new(
                        Strategy::UiAutomator,
                        format!("{}.instance({})", selector, index - 1),
                    ));
                }
            }
        }

        let attrs: Vec<(&str, &str)> = [("resource-id", rid), ("text", text), ("content-desc", desc)]
            .into_iter()
            .filter_map(|(a, v)| v.map(|v| (a, v)))
            .collect();
        if let Some(candidate) = self.add_xpath_locator(&node.tag_name, &attrs, target) {
            out.push(candidate);
        }

        if in_scope {
            let bare = format!("//{}", node.tag_name);
            if self.xpath_uniqueness(&bare, target).unique {
                out.push(Candidate::new(Strategy::ClassName, node.tag_name.clone()));
            }
        }

        out
    }

    // --- iOS ---

    fn ios_simple(&self, node: &SourceNode, target: Option<NodeId>) -> Vec<Candidate> {
        let mut out = Vec::new();

        let name = node.non_empty_attr("name");
        if let Some(name) = name {
            if self.attr_uniqueness("name", name, target).unique {
                out.push(Candidate::new(Strategy::AccessibilityId, name));
            }
        }

        if let Some(label) = node.non_empty_attr("label") {
            if Some(label) != name && self.attr_uniqueness("label", label, target).unique {
                out.push(Candidate::new(
                    Strategy::PredicateString,
                    format!("label == \"{}\"", escaped(label)),
                ));
            }
        }

        if let Some(value) = node.non_empty_attr("value") {
            if self.attr_uniqueness("value", value, target).unique {
                out.push(Candidate::new(
                    Strategy::PredicateString,
                    format!("value == \"{}\"", escaped(value)),
                ));
            }
        }

        out
    }

    fn ios_complex(&self, node: &SourceNode, target: Option<NodeId>) -> Vec<Candidate> {
        let mut out = Vec::new();

        let name = node.non_empty_attr("name");
        let label = node.non_empty_attr("label");
        let value = node.non_empty_attr("value");

        // AND-ed predicate over every present attribute plus state flags
        let mut parts = Vec::new();
        let mut attr_tests: Vec<(&str, &str)> = Vec::new();
        if let Some(v) = name {
            parts.push(format!("name == \"{}\"", escaped(v)));
            attr_tests.push(("name", v));
        }
        if let Some(v) = label {
            parts.push(format!("label == \"{}\"", escaped(v)));
            attr_tests.push(("label", v));
        }
        if let Some(v) = value {
            parts.push(format!("value == \"{}\"", escaped(v)));
            attr_tests.push(("value", v));
        }
        if node.bool_attr("visible") {
            parts.push("visible == 1".to_string());
            attr_tests.push(("visible", "true"));
        }
        if node.bool_attr("enabled") {
            parts.push("enabled == 1".to_string());
            attr_tests.push(("enabled", "true"));
        }
        if !attr_tests.is_empty() {
            let preds: Vec<String> = attr_tests
                .iter()
                .map(|(a, v)| format!("@{}={}", a, xpath_literal(v)))
                .collect();
            let expr = format!("//*[{}]", preds.join(" and "));
            if self.xpath_uniqueness(&expr, target).unique {
                out.push(Candidate::new(Strategy::PredicateString, parts.join(" AND ")));
            }
        }

        // Class chain only applies to XCUIElementType* tags
        if node.tag_name.starts_with("XCUI") {
            let chain_attr = label.map(|v| ("label", v)).or(name.map(|v| ("name", v)));
            if let Some((attr, v)) = chain_attr {
                let chain = format!("**/{}[`{} == \"{}\"`]", node.tag_name, attr, escaped(v));
                let expr = format!("//{}[@{}={}]", node.tag_name, attr, xpath_literal(v));
                let res = self.xpath_uniqueness(&expr, target);
                if res.unique {
                    out.push(Candidate::new(Strategy::ClassChain, chain));
                } else if let Some(index) = res.index {
                    // Class-chain indexing is 1-based
                    out.push(Candidate::new(
                        Strategy::ClassChain,
                        format!("{}[{}]", chain, index),
                    ));
                }
            }
        }

        let attrs: Vec<(&str, &str)> = [("name", name), ("label", label), ("value", value)]
            .into_iter()
            .filter_map(|(a, v)| v.map(|v| (a, v)))
            .collect();
        if let Some(candidate) = self.add_xpath_locator(&node.tag_name, &attrs, target) {
            out.push(candidate);
        }

        if node.tag_name.starts_with("XCUI") {
            let bare = format!("//{}", node.tag_name);
            if self.xpath_uniqueness(&bare, target).unique {
                out.push(Candidate::new(
                    Strategy::ClassChain,
                    format!("**/{}", node.tag_name),
                ));
            }
        }

        out
    }

    // --- XPath uniqueness + fallback chain ---

    fn xpath_uniqueness(&self, expr: &str, target: Option<NodeId>) -> UniquenessResult {
        match (self.document, target) {
            (Some(doc), Some(t)) => xpath::check_uniqueness(doc, expr, t, self.platform),
            _ => UniquenessResult::default(),
        }
    }

    /// Build the attribute XPath for a node and disambiguate it: verbatim
    /// when unique, `(xpath)[n]` when the target is among several matches,
    /// hierarchical ancestor path as the next fallback, and the original
    /// non-unique expression as a last resort.
    fn add_xpath_locator(
        &self,
        tag_name: &str,
        attrs: &[(&str, &str)],
        target: Option<NodeId>,
    ) -> Option<Candidate> {
        let expr = if attrs.is_empty() {
            format!("//{}", tag_name)
        } else {
            let preds: Vec<String> = attrs
                .iter()
                .map(|(a, v)| format!("@{}={}", a, xpath_literal(v)))
                .collect();
            format!("//{}[{}]", tag_name, preds.join(" and "))
        };

        let (doc, target) = match (self.document, target) {
            (Some(doc), Some(t)) => (doc, t),
            // No parsed document: the expression cannot be verified, emit it
            // as a may-match-several fallback.
            _ => return Some(Candidate::new(Strategy::Xpath, expr)),
        };

        let res = xpath::check_uniqueness(doc, &expr, target, self.platform);
        if res.unique {
            return Some(Candidate::new(Strategy::Xpath, expr));
        }
        if let Some(index) = res.index {
            return Some(Candidate::new(
                Strategy::Xpath,
                format!("({})[{}]", expr, index),
            ));
        }
        if let Some(hierarchical) = self.hierarchical_xpath(doc, target) {
            return Some(Candidate::new(Strategy::Xpath, hierarchical));
        }

        log::debug!("Emitting non-unique XPath as last resort: {}", expr);
        Some(Candidate::new(Strategy::Xpath, expr))
    }

    /// Climb the ancestor chain (bounded) looking for an ancestor that a
    /// single attribute identifies uniquely, then append `tag[k]` steps back
    /// down to the target.
    fn hierarchical_xpath(&self, doc: &Document, target: NodeId) -> Option<String> {
        let anchor_attrs: &[&str] = match self.platform {
            Platform::Android => &["resource-id", "content-desc", "text"],
            Platform::Ios => &["name", "label", "value"],
        };

        let mut steps: Vec<String> = Vec::new();
        let mut current = target;

        for _ in 0..MAX_ANCESTOR_DEPTH {
            let parent = doc.parent(current)?;
            let (pos, total) = doc.sibling_position(current);
            let tag = doc.tag_name(current);
            steps.insert(
                0,
                if total > 1 {
                    format!("{}[{}]", tag, pos)
                } else {
                    tag.to_string()
                },
            );

            for attr in anchor_attrs {
                let value = match doc.attr(parent, attr) {
                    Some(v) if !v.is_empty() && v != "null" => v,
                    _ => continue,
                };
                let anchor = format!(
                    "//{}[@{}={}]",
                    doc.tag_name(parent),
                    attr,
                    xpath_literal(value)
                );
                let anchored = match xpath::evaluate(doc, &anchor) {
                    Ok(matches) if matches.len() == 1 => {
                        format!("{}/{}", anchor, steps.join("/"))
                    }
                    _ => continue,
                };
                match xpath::evaluate(doc, &anchored) {
                    Ok(matches) if matches.len() == 1 && matches[0] == target => {
                        return Some(anchored)
                    }
                    _ => continue,
                }
            }

            current = parent;
        }

        None
    }
}

/// Drop later candidates with an identical value (first occurrence wins,
/// regardless of strategy), then keep the first value per strategy. The
/// resulting insertion order is the suggestion priority; the first entry is
/// the best locator.
fn dedup_candidates(candidates: Vec<Candidate>) -> IndexMap<Strategy, String> {
    let mut seen_values: Vec<String> = Vec::new();
    let mut map: IndexMap<Strategy, String> = IndexMap::new();
    for candidate in candidates {
        if seen_values.iter().any(|v| v == &candidate.value) {
            continue;
        }
        seen_values.push(candidate.value.clone());
        map.entry(candidate.strategy).or_insert(candidate.value);
    }
    map
}

/// Backslash-escape quotes and newlines for UiSelector/predicate values
fn escaped(value: &str) -> String {
    value.replace('"', "\\\"").replace('\n', "\\n")
}

fn quoted(value: &str) -> String {
    format!("\"{}\"", escaped(value))
}
