use std::fmt;

use crate::data::resource::GroupVersionResource;

/// Index of a node inside its [`Catalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Variant of a catalog node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Root,
    Group,
    Resource,
    Field,
}

impl NodeKind {
    /// Whether selecting the node drills down into it.
    pub fn is_previewable(self) -> bool {
        matches!(self, NodeKind::Group | NodeKind::Resource)
    }

    /// Whether the node's label takes part in search.
    pub fn is_searchable(self) -> bool {
        matches!(self, NodeKind::Resource | NodeKind::Field)
    }

    /// Whether the node has documentation to explain.
    pub fn is_explainable(self) -> bool {
        matches!(self, NodeKind::Resource | NodeKind::Field)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeKind::Root => "root",
            NodeKind::Group => "group",
            NodeKind::Resource => "resource",
            NodeKind::Field => "field",
        };
        f.write_str(s)
    }
}

/// UI-facing hierarchy node.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogNode {
    pub label: String,
    pub kind: NodeKind,
    /// Dotted field path; empty for Root and Group.
    pub path: String,
    /// Owning resource; `None` for Root and Group.
    pub resource: Option<GroupVersionResource>,
    /// Node currently serves as a display root.
    pub in_preview: bool,
    pub expanded: bool,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl CatalogNode {
    pub fn new(label: impl Into<String>, kind: NodeKind) -> Self {
        CatalogNode {
            label: label.into(),
            kind,
            path: String::new(),
            resource: None,
            in_preview: false,
            expanded: true,
            children: Vec::new(),
            parent: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_resource(mut self, resource: GroupVersionResource) -> Self {
        self.resource = Some(resource);
        self
    }

    pub fn with_expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Lookup-only back link; the parent owns this node, not the reverse.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

/// Arena that owns a whole hierarchy. Node 0 is always the root.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    nodes: Vec<CatalogNode>,
}

/// One line of a flattened catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row {
    pub id: NodeId,
    pub depth: usize,
}

impl Catalog {
    pub const ROOT: NodeId = NodeId(0);

    pub fn new(root: CatalogNode) -> Self {
        let mut root = root;
        root.parent = None;
        root.children.clear();
        Catalog { nodes: vec![root] }
    }

    pub fn root(&self) -> NodeId {
        Self::ROOT
    }

    /// Append `node` as the last child of `parent`.
    pub fn push_child(&mut self, parent: NodeId, mut node: CatalogNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn node(&self, id: NodeId) -> &CatalogNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut CatalogNode {
        &mut self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &CatalogNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.node(id).parent, |p| self.node(*p).parent)
    }

    /// Whether `id` is `ancestor` or lies below it.
    pub fn is_within(&self, id: NodeId, ancestor: NodeId) -> bool {
        id == ancestor || self.ancestors(id).any(|a| a == ancestor)
    }

    /// Nodes shown when `from` is the display root: `from` itself, then the
    /// children of every expanded node, depth first.
    pub fn visible_rows(&self, from: NodeId) -> Vec<Row> {
        let mut rows = Vec::new();
        let mut stack = vec![Row { id: from, depth: 0 }];
        while let Some(row) = stack.pop() {
            rows.push(row);
            let node = self.node(row.id);
            if node.expanded {
                for child in node.children.iter().rev() {
                    stack.push(Row {
                        id: *child,
                        depth: row.depth + 1,
                    });
                }
            }
        }
        rows
    }

    /// Structural outline below `from`: `(depth, kind, label, path)` for every
    /// node regardless of expansion.
    pub fn outline(&self, from: NodeId) -> Vec<(usize, NodeKind, &str, &str)> {
        let mut out = Vec::new();
        self.outline_into(from, 0, &mut out);
        out
    }

    fn outline_into<'a>(
        &'a self,
        id: NodeId,
        depth: usize,
        out: &mut Vec<(usize, NodeKind, &'a str, &'a str)>,
    ) {
        let node = self.node(id);
        out.push((depth, node.kind, node.label.as_str(), node.path.as_str()));
        for child in &node.children {
            self.outline_into(*child, depth + 1, out);
        }
    }

    /// First child of `parent` whose label equals `label`.
    pub fn find_child(&self, parent: NodeId, label: &str) -> Option<NodeId> {
        self.node(parent)
            .children
            .iter()
            .copied()
            .find(|c| self.node(*c).label == label)
    }
}
