use crate::{
    data::{
        catalog::{Catalog, CatalogNode, NodeId, NodeKind},
        field_tree::{FieldTree, FieldTreeNode},
        resource::{ApiResource, GroupVersion, GroupVersionResource, ResourceGroup},
        schema::{SchemaNode, SchemaSource},
        visitor::SchemaPathVisitor,
    },
    error::BuildError,
};

/// Label of the catalog root.
pub const ROOT_LABEL: &str = "API Resources";

/// Group versions pinned to the top of the catalog, in this order.
pub const DEFAULT_PRIORITY_GROUPS: &[&str] = &["v1", "apps/v1"];

type ProgressFn<'a> = Box<dyn FnMut(&GroupVersionResource, usize, usize) + 'a>;

/// Result of a catalog build.
#[derive(Debug)]
pub struct BuildReport {
    pub catalog: Catalog,
    /// Number of resource nodes in the catalog.
    pub resources: usize,
    /// Groups and resources left out, with the reason.
    pub skipped: Vec<BuildError>,
}

/// Assembles the root → group → resource → field hierarchy.
pub struct CatalogBuilder<'a, S: SchemaSource + ?Sized> {
    source: &'a S,
    priority: Vec<String>,
    progress: Option<ProgressFn<'a>>,
}

impl<'a, S: SchemaSource + ?Sized> CatalogBuilder<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            priority: DEFAULT_PRIORITY_GROUPS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            progress: None,
        }
    }

    /// Replace the pinned group versions.
    pub fn priority_groups<I, T>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.priority = groups.into_iter().map(Into::into).collect();
        self
    }

    /// Called after every resource with `(resource, done, total)`.
    pub fn on_progress<F>(mut self, f: F) -> Self
    where
        F: FnMut(&GroupVersionResource, usize, usize) + 'a,
    {
        self.progress = Some(Box::new(f));
        self
    }

    /// Build the catalog from a discovery snapshot.
    ///
    /// A group whose version cannot be parsed and a resource whose schema
    /// cannot be resolved or walked are skipped; both are logged and listed in
    /// [`BuildReport::skipped`].
    pub fn build(mut self, mut groups: Vec<ResourceGroup>) -> BuildReport {
        sort_groups(&mut groups, &self.priority);

        let total = groups.iter().map(|g| g.resources.len()).sum();
        let mut done = 0;
        let mut catalog = Catalog::new(CatalogNode::new(ROOT_LABEL, NodeKind::Root));
        let mut skipped = Vec::new();
        let mut resources = 0;

        for group in &mut groups {
            if group.resources.is_empty() {
                continue;
            }
            let gv = match GroupVersion::parse(&group.group_version) {
                Ok(gv) => gv,
                Err(e) => {
                    warn!("skip group: {e}");
                    done += group.resources.len();
                    skipped.push(e);
                    continue;
                }
            };

            group.resources.sort_by(|a, b| a.name.cmp(&b.name));

            let mut group_id = None;
            for res in &group.resources {
                let gvr = gv.with_resource(&res.name);
                match self.field_tree(&gvr) {
                    Ok(tree) => {
                        let parent = *group_id.get_or_insert_with(|| {
                            catalog.push_child(
                                Catalog::ROOT,
                                CatalogNode::new(group.group_version.clone(), NodeKind::Group),
                            )
                        });
                        attach_resource(&mut catalog, parent, res, &gvr, &tree);
                        resources += 1;
                    }
                    Err(e) => {
                        warn!("skip resource: {e}");
                        skipped.push(e);
                    }
                }
                done += 1;
                if let Some(progress) = self.progress.as_mut() {
                    progress(&gvr, done, total);
                }
            }
        }

        info!(
            "catalog built: {} groups, {} resources, {} skipped",
            catalog.node(Catalog::ROOT).children().len(),
            resources,
            skipped.len()
        );

        BuildReport {
            catalog,
            resources,
            skipped,
        }
    }

    /// Every field path of one resource, prefixed by its lowercase name and
    /// sorted. The first entry is the bare prefix.
    pub fn field_paths(&self, gvr: &GroupVersionResource) -> Result<Vec<String>, BuildError> {
        let kind = self
            .source
            .resolve_kind(gvr)
            .ok_or_else(|| BuildError::KindNotFound(gvr.clone()))?;
        if self.source.lookup_schema(&kind).is_none() {
            return Err(BuildError::SchemaNotFound {
                gvr: gvr.clone(),
                kind,
            });
        }

        let prefix = gvr.resource.to_lowercase();
        let paths = SchemaPathVisitor::new(self.source)
            .visit(&SchemaNode::reference(kind), &prefix)
            .map_err(|source| BuildError::Traversal {
                gvr: gvr.clone(),
                source,
            })?;
        debug!("{gvr}: {} field paths", paths.len());

        let mut out = Vec::with_capacity(paths.len() + 1);
        out.push(prefix);
        out.extend(paths);
        Ok(out)
    }

    /// Field paths of one resource as a tree whose only top level node is the
    /// lowercase resource name.
    pub fn field_tree(&self, gvr: &GroupVersionResource) -> Result<FieldTree, BuildError> {
        let paths = self.field_paths(gvr)?;
        Ok(paths.iter().map(String::as_str).collect())
    }
}

/// Order groups by pinned position, then by group version.
pub fn sort_groups(groups: &mut [ResourceGroup], priority: &[String]) {
    let rank = |g: &ResourceGroup| {
        priority
            .iter()
            .position(|p| *p == g.group_version)
            .unwrap_or(usize::MAX)
    };
    groups.sort_by(|a, b| {
        rank(a)
            .cmp(&rank(b))
            .then_with(|| a.group_version.cmp(&b.group_version))
    });
}

fn attach_resource(
    catalog: &mut Catalog,
    group: NodeId,
    res: &ApiResource,
    gvr: &GroupVersionResource,
    tree: &FieldTree,
) {
    let prefix = gvr.resource.to_lowercase();
    let Some(top) = tree.get(&prefix) else {
        return;
    };
    let id = catalog.push_child(
        group,
        CatalogNode::new(format!("{} ({})", res.kind, res.name), NodeKind::Resource)
            .with_path(top.path.clone())
            .with_resource(gvr.clone())
            .with_expanded(top.is_leaf()),
    );
    attach_fields(catalog, id, top, gvr);
}

fn attach_fields(
    catalog: &mut Catalog,
    parent: NodeId,
    node: &FieldTreeNode,
    gvr: &GroupVersionResource,
) {
    for (name, child) in node.children() {
        let id = catalog.push_child(
            parent,
            CatalogNode::new(name, NodeKind::Field)
                .with_path(child.path.clone())
                .with_resource(gvr.clone())
                .with_expanded(child.is_leaf()),
        );
        attach_fields(catalog, id, child, gvr);
    }
}
