use std::collections::{BTreeSet, HashSet};

use crate::{
    data::schema::{SchemaNode, SchemaSource},
    error::TraversalError,
};

/// Enumerates every dotted field path reachable from a schema root.
///
/// Arrays and maps are transparent: their element schema contributes fields
/// to the containing field's path. A reference that is already being expanded
/// on the current branch is not followed again, which bounds the walk on
/// cyclic graphs. The in-progress set lives in the visitor, so each call to
/// [`SchemaPathVisitor::visit`] starts clean.
pub struct SchemaPathVisitor<'a, S: SchemaSource + ?Sized> {
    source: &'a S,
    paths: BTreeSet<String>,
    in_progress: HashSet<String>,
}

impl<'a, S: SchemaSource + ?Sized> SchemaPathVisitor<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            paths: BTreeSet::new(),
            in_progress: HashSet::new(),
        }
    }

    /// Walk `root` and return all paths below `prefix`, sorted.
    ///
    /// The first unresolvable reference aborts the walk; no partial result is
    /// returned.
    pub fn visit(
        mut self,
        root: &SchemaNode,
        prefix: &str,
    ) -> Result<Vec<String>, TraversalError> {
        self.walk(root, prefix)?;
        Ok(self.paths.into_iter().collect())
    }

    fn walk(&mut self, node: &SchemaNode, current: &str) -> Result<(), TraversalError> {
        match node {
            SchemaNode::Kind(kind) => {
                for field in &kind.fields {
                    let child = format!("{current}.{}", field.name);
                    self.paths.insert(child.clone());
                    self.walk(&field.schema, &child)?;
                }
            }
            SchemaNode::Array(c) | SchemaNode::Map(c) => self.walk(&c.sub_schema, current)?,
            SchemaNode::Reference(r) => {
                if self.in_progress.contains(&r.reference) {
                    return Ok(());
                }
                let source = self.source;
                let resolved = source.lookup_schema(&r.reference).ok_or_else(|| {
                    TraversalError::UnresolvedReference {
                        path: current.to_string(),
                        reference: r.reference.clone(),
                    }
                })?;
                self.in_progress.insert(r.reference.clone());
                let res = self.walk(resolved, current);
                self.in_progress.remove(&r.reference);
                res?;
            }
            SchemaNode::Primitive(_) => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::SchemaSet;

    fn visit(set: &SchemaSet, root: &SchemaNode, prefix: &str) -> Vec<String> {
        SchemaPathVisitor::new(set).visit(root, prefix).unwrap()
    }

    #[test]
    fn test_kind_fields_sorted() {
        let set = SchemaSet::new();
        let root = SchemaNode::kind([
            ("spec", SchemaNode::primitive("string")),
            ("apiVersion", SchemaNode::primitive("string")),
            ("metadata", SchemaNode::primitive("string")),
        ]);
        assert_eq!(
            visit(&set, &root, "pods"),
            ["pods.apiVersion", "pods.metadata", "pods.spec"]
        );
    }

    #[test]
    fn test_array_and_map_are_transparent() {
        let set = SchemaSet::new();
        let container = SchemaNode::kind([("image", SchemaNode::primitive("string"))]);
        let root = SchemaNode::kind([
            ("containers", SchemaNode::array(container.clone())),
            ("overhead", SchemaNode::map(container)),
            ("labels", SchemaNode::map(SchemaNode::primitive("string"))),
        ]);
        assert_eq!(
            visit(&set, &root, "spec"),
            [
                "spec.containers",
                "spec.containers.image",
                "spec.labels",
                "spec.overhead",
                "spec.overhead.image",
            ]
        );
    }

    #[test]
    fn test_shared_reference_on_sibling_branches() {
        let mut set = SchemaSet::new();
        set.insert(
            "ObjectReference",
            SchemaNode::kind([("name", SchemaNode::primitive("string"))]),
        );
        let root = SchemaNode::kind([
            ("left", SchemaNode::reference("ObjectReference")),
            ("right", SchemaNode::reference("ObjectReference")),
        ]);
        assert_eq!(
            visit(&set, &root, "r"),
            ["r.left", "r.left.name", "r.right", "r.right.name"]
        );
    }

    #[test]
    fn test_self_reference_terminates() {
        let mut set = SchemaSet::new();
        set.insert(
            "Props",
            SchemaNode::kind([
                ("type", SchemaNode::primitive("string")),
                ("properties", SchemaNode::map(SchemaNode::reference("Props"))),
            ]),
        );
        let root = SchemaNode::reference("Props");
        let first = visit(&set, &root, "crd");
        assert_eq!(first, ["crd.properties", "crd.type"]);
        assert_eq!(visit(&set, &root, "crd"), first);
    }

    #[test]
    fn test_unresolved_reference_aborts() {
        let set = SchemaSet::new();
        let root = SchemaNode::kind([
            ("ok", SchemaNode::primitive("string")),
            ("status", SchemaNode::reference("Missing")),
        ]);
        let err = SchemaPathVisitor::new(&set).visit(&root, "pods").unwrap_err();
        assert_eq!(
            err,
            TraversalError::UnresolvedReference {
                path: "pods.status".into(),
                reference: "Missing".into(),
            }
        );
    }
}
