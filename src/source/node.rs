use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One element from a platform accessibility-tree dump.
///
/// `path` addresses the node by dot-separated child indices from the root
/// (e.g. "0.2.1"). It is stable for a single parse and reflects document
/// order, but is not a persistent identity across captures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceNode {
    /// Platform class/type string (e.g. "android.widget.Button",
    /// "XCUIElementTypeButton")
    pub tag_name: String,

    /// Raw attribute map from the dump
    #[serde(default)]
    pub attributes: HashMap<String, String>,

    /// Child elements in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SourceNode>,

    /// Dot-separated child-index path from the root
    pub path: String,
}

impl SourceNode {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attributes: HashMap::new(),
            children: Vec::new(),
            path: "0".to_string(),
        }
    }

    /// Builder method: set an attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Builder method: set the path
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn add_child(&mut self, child: SourceNode) {
        self.children.push(child);
    }

    /// Attribute value, trimmed view; `None` when absent
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(|s| s.as_str())
    }

    /// Attribute value that is present and neither empty nor the literal
    /// string "null" (some Android dumps serialize missing text that way)
    pub fn non_empty_attr(&self, key: &str) -> Option<&str> {
        match self.attr(key) {
            Some(v) if !v.is_empty() && v != "null" => Some(v),
            _ => None,
        }
    }

    /// True when the attribute equals the string "true"
    pub fn bool_attr(&self, key: &str) -> bool {
        self.attr(key) == Some("true")
    }

    /// First segment of the node path, as a child index of the root
    pub fn root_child_index(&self) -> Option<usize> {
        self.path.split('.').nth(1).and_then(|s| s.parse().ok())
    }

    /// Total element count of this subtree, including self
    pub fn count_nodes(&self) -> usize {
        1 + self.children.iter().map(SourceNode::count_nodes).sum::<usize>()
    }
}

/// Pixel rectangle describing an element's on-screen position and size
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct Bounds {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Bounds {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Decode the Android bounds encoding "[x1,y1][x2,y2]"
    pub fn from_android(bounds: &str) -> Option<Bounds> {
        let inner = bounds.strip_prefix('[')?.strip_suffix(']')?;
        let (first, second) = inner.split_once("][")?;
        let (x1, y1) = parse_pair(first)?;
        let (x2, y2) = parse_pair(second)?;
        Some(Bounds {
            x: x1,
            y: y1,
            width: (x2 - x1).max(0),
            height: (y2 - y1).max(0),
        })
    }

    /// Decode the iOS encoding: discrete x/y/width/height attributes
    pub fn from_ios(attributes: &HashMap<String, String>) -> Option<Bounds> {
        let get = |key: &str| attributes.get(key).and_then(|v| v.parse::<f64>().ok());
        Some(Bounds {
            x: get("x")? as i64,
            y: get("y")? as i64,
            width: (get("width")? as i64).max(0),
            height: (get("height")? as i64).max(0),
        })
    }

    /// Decode per platform; Android reads the `bounds` attribute
    pub fn from_node(node: &SourceNode, platform: crate::locator::Platform) -> Option<Bounds> {
        match platform {
            crate::locator::Platform::Android => node.attr("bounds").and_then(Bounds::from_android),
            crate::locator::Platform::Ios => Bounds::from_ios(&node.attributes),
        }
    }

    /// A zero-area rectangle is degenerate and never "in viewport"
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Strict containment in `[0, width] x [0, height]`, not mere overlap
    pub fn in_viewport(&self, viewport_width: i64, viewport_height: i64) -> bool {
        !self.is_degenerate()
            && self.x >= 0
            && self.y >= 0
            && self.x + self.width <= viewport_width
            && self.y + self.height <= viewport_height
    }
}

fn parse_pair(s: &str) -> Option<(i64, i64)> {
    let (a, b) = s.split_once(',')?;
    Some((a.trim().parse().ok()?, b.trim().parse().ok()?))
}
