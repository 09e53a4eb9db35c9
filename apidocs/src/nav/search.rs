use crate::data::catalog::{Catalog, CatalogNode, NodeId, NodeKind};

/// Label of the placeholder shown when nothing matches.
pub const NO_MATCHES_LABEL: &str = "(no matches)";

/// Outcome of filtering a catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchResult {
    /// Matching nodes and their ancestors, all expanded.
    Filtered(Catalog),
    NoMatches,
}

impl SearchResult {
    /// The view to display; a single placeholder leaf for [`SearchResult::NoMatches`].
    pub fn into_catalog(self) -> Catalog {
        match self {
            SearchResult::Filtered(catalog) => catalog,
            SearchResult::NoMatches => Catalog::new(CatalogNode::new(NO_MATCHES_LABEL, NodeKind::Root)),
        }
    }
}

/// Build a pruned copy of `source` holding nodes whose label contains `query`
/// (case-insensitive) and their ancestors.
///
/// Only Resource and Field labels are matched. The source is not modified.
pub fn filter(source: &Catalog, query: &str) -> SearchResult {
    let needle = query.to_lowercase();
    let mut kept = vec![false; source.len()];
    if !mark(source, source.root(), &needle, &mut kept) {
        return SearchResult::NoMatches;
    }

    let mut out = Catalog::new(copy_node(source.node(source.root())));
    copy_children(source, source.root(), &mut out, Catalog::ROOT, &kept);
    SearchResult::Filtered(out)
}

fn mark(source: &Catalog, id: NodeId, needle: &str, kept: &mut [bool]) -> bool {
    let node = source.node(id);
    let mut retained =
        node.kind.is_searchable() && node.label.to_lowercase().contains(needle);
    for child in node.children() {
        if mark(source, *child, needle, kept) {
            retained = true;
        }
    }
    kept[id.index()] = retained;
    retained
}

fn copy_children(source: &Catalog, from: NodeId, out: &mut Catalog, to: NodeId, kept: &[bool]) {
    for child in source.node(from).children() {
        if !kept[child.index()] {
            continue;
        }
        let id = out.push_child(to, copy_node(source.node(*child)));
        copy_children(source, *child, out, id, kept);
    }
}

fn copy_node(node: &CatalogNode) -> CatalogNode {
    let mut copy = CatalogNode::new(node.label.clone(), node.kind)
        .with_path(node.path.clone())
        .with_expanded(true);
    copy.resource = node.resource.clone();
    copy
}
