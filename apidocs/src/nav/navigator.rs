use crate::{
    data::{
        catalog::{Catalog, NodeId, NodeKind, Row},
        resource::GroupVersionResource,
    },
    nav::search,
};

/// One displayable hierarchy with its drill-down stack and cursor.
#[derive(Debug, Clone)]
pub struct TreeView {
    catalog: Catalog,
    stack: Vec<NodeId>,
    selected: NodeId,
}

impl TreeView {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            stack: vec![Catalog::ROOT],
            selected: Catalog::ROOT,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Breadcrumb from the root to the display root. Never empty.
    pub fn stack(&self) -> &[NodeId] {
        &self.stack
    }

    pub fn display_root(&self) -> NodeId {
        self.stack.last().copied().unwrap_or(Catalog::ROOT)
    }

    pub fn selected(&self) -> NodeId {
        self.selected
    }

    pub fn rows(&self) -> Vec<Row> {
        self.catalog.visible_rows(self.display_root())
    }

    fn push(&mut self, id: NodeId) {
        let node = self.catalog.node_mut(id);
        node.in_preview = true;
        node.expanded = true;
        self.stack.push(id);
        self.selected = id;
    }

    fn pop(&mut self) -> Option<NodeId> {
        if self.stack.len() <= 1 {
            return None;
        }
        let id = self.stack.pop()?;
        let node = self.catalog.node_mut(id);
        node.in_preview = false;
        node.expanded = node.kind != NodeKind::Resource;
        self.selected = id;
        self.ensure_visible();
        Some(id)
    }

    fn unwind(&mut self) {
        while self.pop().is_some() {}
        self.selected = Catalog::ROOT;
    }

    fn ensure_visible(&mut self) {
        if !self.rows().iter().any(|r| r.id == self.selected) {
            self.selected = self.display_root();
        }
    }
}

#[derive(Debug, Clone)]
struct Filter {
    query: String,
    view: TreeView,
}

/// Drill-down and search state over a built catalog.
///
/// The full hierarchy keeps its own stack while a search is active; the
/// filtered view is disposable and is dropped when the search is cleared.
#[derive(Debug, Clone)]
pub struct Navigator {
    full: TreeView,
    filter: Option<Filter>,
}

impl Navigator {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            full: TreeView::new(catalog),
            filter: None,
        }
    }

    /// The view currently shown.
    pub fn view(&self) -> &TreeView {
        match &self.filter {
            Some(f) => &f.view,
            None => &self.full,
        }
    }

    fn view_mut(&mut self) -> &mut TreeView {
        match &mut self.filter {
            Some(f) => &mut f.view,
            None => &mut self.full,
        }
    }

    /// The unfiltered hierarchy.
    pub fn full_catalog(&self) -> &Catalog {
        &self.full.catalog
    }

    pub fn catalog(&self) -> &Catalog {
        &self.view().catalog
    }

    pub fn stack(&self) -> &[NodeId] {
        self.view().stack()
    }

    pub fn display_root(&self) -> NodeId {
        self.view().display_root()
    }

    pub fn selected(&self) -> NodeId {
        self.view().selected
    }

    pub fn rows(&self) -> Vec<Row> {
        self.view().rows()
    }

    pub fn query(&self) -> Option<&str> {
        self.filter.as_ref().map(|f| f.query.as_str())
    }

    pub fn is_filtered(&self) -> bool {
        self.filter.is_some()
    }

    /// Labels of the stack, root first.
    pub fn breadcrumb(&self) -> Vec<&str> {
        let view = self.view();
        view.stack
            .iter()
            .map(|id| view.catalog.node(*id).label.as_str())
            .collect()
    }

    /// Move the cursor to `id` if it is currently visible.
    pub fn set_selected(&mut self, id: NodeId) -> bool {
        let view = self.view_mut();
        if view.rows().iter().any(|r| r.id == id) {
            view.selected = id;
            true
        } else {
            false
        }
    }

    /// Activate the selected node.
    ///
    /// A Group or Resource not yet in preview becomes the display root. Any
    /// other node toggles its expansion; the Root toggles all its children.
    pub fn select(&mut self) {
        let view = self.view_mut();
        let id = view.selected;
        let node = view.catalog.node(id);
        match node.kind {
            NodeKind::Root => {
                let children = node.children().to_vec();
                for child in children {
                    let child = view.catalog.node_mut(child);
                    child.expanded = !child.expanded;
                }
            }
            NodeKind::Group | NodeKind::Resource if !node.in_preview => {
                debug!("preview {}", node.label);
                view.push(id);
            }
            _ => {
                let node = view.catalog.node_mut(id);
                node.expanded = !node.expanded;
            }
        }
    }

    /// Leave the current display root, or the search when the stack is at the
    /// root. Returns false when there was nothing to step back from.
    pub fn step_back(&mut self) -> bool {
        if self.view_mut().pop().is_some() {
            return true;
        }
        if self.filter.take().is_some() {
            debug!("search cleared by step back");
            self.full.selected = Catalog::ROOT;
            return true;
        }
        false
    }

    /// Collapse or expand the selected Field or Group node. On the Root every
    /// child is set instead.
    pub fn set_expanded(&mut self, expanded: bool) {
        let view = self.view_mut();
        let id = view.selected;
        match view.catalog.node(id).kind {
            NodeKind::Root => {
                let children = view.catalog.node(id).children().to_vec();
                for child in children {
                    view.catalog.node_mut(child).expanded = expanded;
                }
            }
            NodeKind::Group | NodeKind::Field => {
                view.catalog.node_mut(id).expanded = expanded;
            }
            NodeKind::Resource => {}
        }
    }

    /// Move the cursor by `delta` visible rows, clamped to the ends.
    pub fn move_cursor(&mut self, delta: isize) {
        let view = self.view_mut();
        let rows = view.rows();
        let pos = rows
            .iter()
            .position(|r| r.id == view.selected)
            .unwrap_or(0);
        let next = pos.saturating_add_signed(delta).min(rows.len().saturating_sub(1));
        if let Some(row) = rows.get(next) {
            view.selected = row.id;
        }
    }

    pub fn select_first(&mut self) {
        let view = self.view_mut();
        view.selected = view.display_root();
    }

    pub fn select_last(&mut self) {
        let view = self.view_mut();
        if let Some(row) = view.rows().last() {
            view.selected = row.id;
        }
    }

    /// Move the cursor to the closest ancestor with children, staying inside
    /// the display root.
    pub fn jump_to_parent(&mut self) -> bool {
        let view = self.view_mut();
        let root = view.display_root();
        if view.selected == root {
            return false;
        }
        let target = view
            .catalog
            .ancestors(view.selected)
            .take_while(|a| view.catalog.is_within(*a, root))
            .find(|a| view.catalog.node(*a).has_children());
        match target {
            Some(id) => {
                view.selected = id;
                true
            }
            None => false,
        }
    }

    /// Replace the view with the nodes matching `query`. An empty query
    /// clears the search.
    pub fn search(&mut self, query: &str) {
        if query.is_empty() {
            self.clear_search();
            return;
        }
        self.full.unwind();
        let result = search::filter(&self.full.catalog, query);
        if result == search::SearchResult::NoMatches {
            debug!("search {query:?}: no matches");
        }
        self.filter = Some(Filter {
            query: query.to_string(),
            view: TreeView::new(result.into_catalog()),
        });
    }

    pub fn clear_search(&mut self) -> bool {
        self.filter.take().is_some()
    }

    /// Resource and path to document for the selected node.
    pub fn explain_target(&self) -> Option<(&GroupVersionResource, &str)> {
        let node = self.catalog().node(self.selected());
        if !node.kind.is_explainable() {
            return None;
        }
        node.resource.as_ref().map(|r| (r, node.path.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::catalog::CatalogNode;

    struct Ids {
        v1: NodeId,
        pods: NodeId,
        meta: NodeId,
        name: NodeId,
    }

    fn fixture() -> (Catalog, Ids) {
        let gvr = GroupVersionResource {
            group: String::new(),
            version: "v1".into(),
            resource: "pods".into(),
        };
        let mut c = Catalog::new(CatalogNode::new("API Resources", NodeKind::Root));
        let v1 = c.push_child(c.root(), CatalogNode::new("v1", NodeKind::Group));
        let pods = c.push_child(
            v1,
            CatalogNode::new("Pod (pods)", NodeKind::Resource)
                .with_path("pods")
                .with_resource(gvr.clone())
                .with_expanded(false),
        );
        let meta = c.push_child(
            pods,
            CatalogNode::new("metadata", NodeKind::Field)
                .with_path("pods.metadata")
                .with_resource(gvr.clone())
                .with_expanded(false),
        );
        let name = c.push_child(
            meta,
            CatalogNode::new("name", NodeKind::Field)
                .with_path("pods.metadata.name")
                .with_resource(gvr.clone()),
        );
        let spec = c.push_child(
            pods,
            CatalogNode::new("spec", NodeKind::Field)
                .with_path("pods.spec")
                .with_resource(gvr.clone())
                .with_expanded(false),
        );
        c.push_child(
            spec,
            CatalogNode::new("replicas", NodeKind::Field)
                .with_path("pods.spec.replicas")
                .with_resource(gvr),
        );
        (c, Ids { v1, pods, meta, name })
    }

    #[test]
    fn test_preview_push_then_toggle() {
        let (c, ids) = fixture();
        let mut nav = Navigator::new(c);
        assert!(nav.set_selected(ids.pods));

        nav.select();
        assert_eq!(nav.stack(), [Catalog::ROOT, ids.pods]);
        assert!(nav.catalog().node(ids.pods).in_preview);
        assert!(nav.catalog().node(ids.pods).expanded);
        assert_eq!(nav.display_root(), ids.pods);

        nav.select();
        assert_eq!(nav.stack().len(), 2);
        assert!(!nav.catalog().node(ids.pods).expanded);
    }

    #[test]
    fn test_step_back_restores_defaults() {
        let (c, ids) = fixture();
        let mut nav = Navigator::new(c);
        nav.set_selected(ids.v1);
        nav.select();
        nav.set_selected(ids.pods);
        nav.select();
        assert_eq!(nav.breadcrumb(), ["API Resources", "v1", "Pod (pods)"]);

        assert!(nav.step_back());
        assert_eq!(nav.display_root(), ids.v1);
        assert_eq!(nav.selected(), ids.pods);
        let pods = nav.catalog().node(ids.pods);
        assert!(!pods.in_preview && !pods.expanded);

        assert!(nav.step_back());
        let v1 = nav.catalog().node(ids.v1);
        assert!(!v1.in_preview && v1.expanded);
        assert_eq!(nav.selected(), ids.v1);
    }

    #[test]
    fn test_step_back_at_root_is_noop() {
        let (c, _) = fixture();
        let mut nav = Navigator::new(c.clone());
        assert!(!nav.step_back());
        assert_eq!(nav.stack(), [Catalog::ROOT]);
        assert_eq!(nav.catalog(), &c);
    }

    #[test]
    fn test_field_select_toggles_only() {
        let (c, ids) = fixture();
        let mut nav = Navigator::new(c);
        nav.set_selected(ids.pods);
        nav.select();
        nav.set_selected(ids.meta);
        nav.select();
        assert_eq!(nav.stack().len(), 2);
        assert!(nav.catalog().node(ids.meta).expanded);
        assert!(nav.rows().iter().any(|r| r.id == ids.name));
    }

    #[test]
    fn test_root_select_toggles_children() {
        let (c, ids) = fixture();
        let mut nav = Navigator::new(c);
        nav.select();
        assert!(!nav.catalog().node(ids.v1).expanded);
        assert_eq!(nav.rows().len(), 2);
        nav.select();
        assert!(nav.catalog().node(ids.v1).expanded);
    }

    #[test]
    fn test_set_expanded_ignores_resources() {
        let (c, ids) = fixture();
        let mut nav = Navigator::new(c);
        nav.set_selected(ids.pods);
        nav.set_expanded(true);
        assert!(!nav.catalog().node(ids.pods).expanded);
        nav.set_selected(ids.v1);
        nav.set_expanded(false);
        assert!(!nav.catalog().node(ids.v1).expanded);
    }

    #[test]
    fn test_cursor_and_parent_jump() {
        let (c, ids) = fixture();
        let mut nav = Navigator::new(c);
        nav.move_cursor(-3);
        assert_eq!(nav.selected(), Catalog::ROOT);
        nav.move_cursor(10);
        assert_eq!(nav.selected(), ids.pods);

        nav.select();
        nav.set_selected(ids.meta);
        nav.select();
        nav.set_selected(ids.name);
        assert!(nav.jump_to_parent());
        assert_eq!(nav.selected(), ids.meta);
        assert!(nav.jump_to_parent());
        assert_eq!(nav.selected(), ids.pods);
        assert!(!nav.jump_to_parent());
    }

    #[test]
    fn test_search_round_trip() {
        let (c, _) = fixture();
        let mut nav = Navigator::new(c.clone());
        nav.search("name");
        assert_eq!(nav.query(), Some("name"));
        let labels: Vec<_> = nav.catalog().outline(Catalog::ROOT).iter().map(|o| o.2).collect();
        assert_eq!(labels, ["API Resources", "v1", "Pod (pods)", "metadata", "name"]);

        nav.search("");
        assert!(!nav.is_filtered());
        assert_eq!(nav.catalog(), &c);
    }

    #[test]
    fn test_search_unwinds_and_step_back_restores_root() {
        let (c, ids) = fixture();
        let mut nav = Navigator::new(c);
        nav.set_selected(ids.pods);
        nav.select();
        nav.search("replicas");
        assert_eq!(nav.stack().len(), 1);

        // drill inside the filtered view, then back out of it
        nav.move_cursor(2);
        nav.select();
        assert_eq!(nav.stack().len(), 2);
        assert!(nav.step_back());
        assert!(nav.is_filtered());
        assert!(nav.step_back());
        assert!(!nav.is_filtered());
        assert_eq!(nav.stack(), [Catalog::ROOT]);
        assert_eq!(nav.selected(), Catalog::ROOT);
        assert!(!nav.full_catalog().node(ids.pods).in_preview);
    }

    #[test]
    fn test_explain_target() {
        let (c, ids) = fixture();
        let mut nav = Navigator::new(c);
        assert!(nav.explain_target().is_none());
        nav.set_selected(ids.pods);
        let (gvr, path) = nav.explain_target().unwrap();
        assert_eq!(gvr.resource, "pods");
        assert_eq!(path, "pods");
    }
}
