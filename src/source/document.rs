use crate::locator::Platform;
use std::collections::HashMap;

/// Index of a node inside a [`Document`] arena
pub type NodeId = usize;

/// One element inside the queryable document
#[derive(Debug, Clone)]
pub struct DocNode {
    pub tag_name: String,
    pub attributes: HashMap<String, String>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// Arena-backed view of a parsed page source, used for XPath uniqueness
/// queries and ancestor walks. Nodes are stored in document (pre-)order.
#[derive(Debug, Clone, Default)]
pub struct Document {
    nodes: Vec<DocNode>,
    root: Option<NodeId>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_node(
        &mut self,
        tag_name: String,
        attributes: HashMap<String, String>,
        parent: Option<NodeId>,
    ) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(DocNode {
            tag_name,
            attributes,
            parent,
            children: Vec::new(),
        });
        match parent {
            Some(p) => self.nodes[p].children.push(id),
            None if self.root.is_none() => self.root = Some(id),
            None => {}
        }
        id
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&DocNode> {
        self.nodes.get(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    pub fn tag_name(&self, id: NodeId) -> &str {
        &self.nodes[id].tag_name
    }

    pub fn attr(&self, id: NodeId, key: &str) -> Option<&str> {
        self.nodes[id].attributes.get(key).map(|s| s.as_str())
    }

    /// All node ids in document order
    pub fn all_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        0..self.nodes.len()
    }

    /// Strict descendants of `id` in document order
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[id].children.iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            out.push(n);
            for &c in self.nodes[n].children.iter().rev() {
                stack.push(c);
            }
        }
        out
    }

    /// Resolve a dot-separated child-index path ("0.2.1") back to a node,
    /// walking element children at each segment. The first segment selects
    /// the root (always index 0).
    pub fn node_by_path(&self, path: &str) -> Option<NodeId> {
        let mut segments = path.split('.');
        let first: usize = segments.next()?.parse().ok()?;
        if first != 0 {
            return None;
        }
        let mut current = self.root?;
        for seg in segments {
            let idx: usize = seg.parse().ok()?;
            current = *self.nodes[current].children.get(idx)?;
        }
        Some(current)
    }

    /// 1-based position of `id` among same-tag siblings, with the total
    /// number of same-tag siblings
    pub fn sibling_position(&self, id: NodeId) -> (usize, usize) {
        let tag = &self.nodes[id].tag_name;
        match self.nodes[id].parent {
            Some(p) => {
                let same: Vec<NodeId> = self.nodes[p]
                    .children
                    .iter()
                    .copied()
                    .filter(|&c| &self.nodes[c].tag_name == tag)
                    .collect();
                let pos = same.iter().position(|&c| c == id).map(|i| i + 1).unwrap_or(1);
                (pos, same.len())
            }
            None => (1, 1),
        }
    }

    /// Element identity check: arena id equality, with a geometry fallback
    /// comparing bounds (Android) or x/y/width/height (iOS) for callers that
    /// hold nodes from different lookups of the same capture.
    pub fn same_node(&self, a: NodeId, b: NodeId, platform: Platform) -> bool {
        if a == b {
            return true;
        }
        let (na, nb) = match (self.nodes.get(a), self.nodes.get(b)) {
            (Some(na), Some(nb)) => (na, nb),
            _ => return false,
        };
        if na.tag_name != nb.tag_name {
            return false;
        }
        match platform {
            Platform::Android => match (na.attributes.get("bounds"), nb.attributes.get("bounds")) {
                (Some(ba), Some(bb)) => ba == bb,
                _ => false,
            },
            Platform::Ios => ["x", "y", "width", "height"].iter().all(|k| {
                match (na.attributes.get(*k), nb.attributes.get(*k)) {
                    (Some(va), Some(vb)) => va == vb,
                    _ => false,
                }
            }),
        }
    }
}
