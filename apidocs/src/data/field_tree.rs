use std::collections::BTreeMap;

/// One segment of a dotted field path.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldTreeNode {
    /// Last path segment; empty for the synthetic root.
    pub name: String,
    /// Full dotted path of the node; empty for the synthetic root.
    pub path: String,
    /// Children keyed by segment, iterated alphabetically.
    pub children: BTreeMap<String, FieldTreeNode>,
}

impl FieldTreeNode {
    fn new(name: &str, path: String) -> Self {
        FieldTreeNode {
            name: name.to_string(),
            path,
            children: BTreeMap::new(),
        }
    }

    /// Children in ascending order of segment name.
    pub fn children(&self) -> impl Iterator<Item = (&str, &FieldTreeNode)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Prefix tree over dotted field paths, e.g. `sts.metadata.name`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldTree {
    root: FieldTreeNode,
}

impl FieldTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure the node chain for `path` exists.
    ///
    /// A node's `path` is fixed when the node is created and never rewritten
    /// by later insertions.
    pub fn insert(&mut self, path: &str) {
        if path.is_empty() {
            return;
        }
        let mut current = &mut self.root;
        let mut prefix_len = 0;
        for (i, part) in path.split('.').enumerate() {
            if i > 0 {
                prefix_len += 1;
            }
            prefix_len += part.len();
            current = current
                .children
                .entry(part.to_string())
                .or_insert_with(|| FieldTreeNode::new(part, path[..prefix_len].to_string()));
        }
    }

    pub fn root(&self) -> &FieldTreeNode {
        &self.root
    }

    /// Find a node by its full dotted path.
    pub fn get(&self, path: &str) -> Option<&FieldTreeNode> {
        if path.is_empty() {
            return Some(&self.root);
        }
        path.split('.')
            .try_fold(&self.root, |node, part| node.children.get(part))
    }
}

impl<'a> FromIterator<&'a str> for FieldTree {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut tree = FieldTree::new();
        for path in iter {
            tree.insert(path);
        }
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tree_is_empty() {
        let tree = FieldTree::new();
        assert!(tree.root().is_leaf());
        assert_eq!(tree.root().name, "");
        assert_eq!(tree.root().path, "");
    }

    #[test]
    fn test_single_level() {
        let mut tree = FieldTree::new();
        tree.insert("name");
        let child = tree.get("name").unwrap();
        assert_eq!(child.name, "name");
        assert_eq!(child.path, "name");
    }

    #[test]
    fn test_multi_level() {
        let mut tree = FieldTree::new();
        tree.insert("metadata.name");
        let metadata = tree.get("metadata").unwrap();
        assert_eq!(metadata.path, "metadata");
        assert_eq!(metadata.children.len(), 1);
        assert_eq!(tree.get("metadata.name").unwrap().path, "metadata.name");
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut once = FieldTree::new();
        once.insert("a.b.c");
        let mut twice = once.clone();
        twice.insert("a.b.c");
        twice.insert("a.b");
        assert_eq!(once, twice);
        assert_eq!(twice.get("a.b").unwrap().path, "a.b");
    }

    #[test]
    fn test_prefix_inserted_first_keeps_path() {
        let mut tree = FieldTree::new();
        tree.insert("a.b");
        tree.insert("a.b.c");
        assert_eq!(tree.get("a.b").unwrap().path, "a.b");
        assert_eq!(tree.get("a.b.c").unwrap().path, "a.b.c");
    }

    #[test]
    fn test_children_alphabetical_for_any_order() {
        let forward: FieldTree = ["x.c", "x.a", "x.b"].into_iter().collect();
        let backward: FieldTree = ["x.b", "x.a", "x.c"].into_iter().collect();
        assert_eq!(forward, backward);
        let names: Vec<_> = forward.get("x").unwrap().children().map(|(k, _)| k).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn test_empty_path_is_ignored() {
        let mut tree = FieldTree::new();
        tree.insert("");
        assert!(tree.root().is_leaf());
    }
}
