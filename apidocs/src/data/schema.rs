use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::data::resource::{GroupVersionResource, ResourceGroup};

/// Type graph node of a resource schema.
///
/// References point into a [`SchemaSource`] by identifier and may form cycles;
/// every other variant owns its sub-schemas.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// Structured object with named fields.
    Kind(KindSchema),
    /// List of a single element schema.
    Array(ContainerSchema),
    /// String-keyed map of a single value schema.
    Map(ContainerSchema),
    /// Named pointer to another schema.
    Reference(ReferenceSchema),
    /// Leaf value.
    Primitive(PrimitiveSchema),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct KindSchema {
    pub description: Option<String>,
    /// Fields in declaration order.
    pub fields: Vec<Field>,
    pub required: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub schema: SchemaNode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContainerSchema {
    pub description: Option<String>,
    pub sub_schema: Box<SchemaNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceSchema {
    pub description: Option<String>,
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveSchema {
    pub description: Option<String>,
    pub type_name: String,
    pub format: Option<String>,
}

impl SchemaNode {
    pub fn kind(fields: impl IntoIterator<Item = (&'static str, SchemaNode)>) -> Self {
        SchemaNode::Kind(KindSchema {
            description: None,
            fields: fields
                .into_iter()
                .map(|(name, schema)| Field {
                    name: name.to_string(),
                    schema,
                })
                .collect(),
            required: Vec::new(),
        })
    }

    pub fn array(items: SchemaNode) -> Self {
        SchemaNode::Array(ContainerSchema {
            description: None,
            sub_schema: Box::new(items),
        })
    }

    pub fn map(values: SchemaNode) -> Self {
        SchemaNode::Map(ContainerSchema {
            description: None,
            sub_schema: Box::new(values),
        })
    }

    pub fn reference(reference: impl Into<String>) -> Self {
        SchemaNode::Reference(ReferenceSchema {
            description: None,
            reference: reference.into(),
        })
    }

    pub fn primitive(type_name: impl Into<String>) -> Self {
        SchemaNode::Primitive(PrimitiveSchema {
            description: None,
            type_name: type_name.into(),
            format: None,
        })
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            SchemaNode::Kind(k) => k.description.as_deref(),
            SchemaNode::Array(c) | SchemaNode::Map(c) => c.description.as_deref(),
            SchemaNode::Reference(r) => r.description.as_deref(),
            SchemaNode::Primitive(p) => p.description.as_deref(),
        }
    }

    /// Set the description, builder style.
    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        let text = Some(text.into());
        match &mut self {
            SchemaNode::Kind(k) => k.description = text,
            SchemaNode::Array(c) | SchemaNode::Map(c) => c.description = text,
            SchemaNode::Reference(r) => r.description = text,
            SchemaNode::Primitive(p) => p.description = text,
        }
        self
    }
}

/// Schema resolution collaborator.
pub trait SchemaSource {
    /// Map a resource to the identifier of its kind's schema.
    fn resolve_kind(&self, gvr: &GroupVersionResource) -> Option<String>;

    /// Look up a schema by identifier. Also used to follow references.
    fn lookup_schema(&self, id: &str) -> Option<&SchemaNode>;
}

/// Group/version/kind triple as carried by `x-kubernetes-group-version-kind`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupVersionKind {
    #[serde(default)]
    pub group: String,
    pub version: String,
    pub kind: String,
}

/// Named schema definitions plus an index from kind to definition name.
#[derive(Debug, Clone, Default)]
pub struct SchemaSet {
    definitions: HashMap<String, SchemaNode>,
    kinds: HashMap<GroupVersionKind, String>,
}

impl SchemaSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, schema: SchemaNode) {
        self.definitions.insert(name.into(), schema);
    }

    /// Register `name` as the definition of `gvk`.
    pub fn register_kind(&mut self, gvk: GroupVersionKind, name: impl Into<String>) {
        self.kinds.insert(gvk, name.into());
    }

    pub fn get(&self, name: &str) -> Option<&SchemaNode> {
        self.definitions.get(name)
    }

    pub fn definition_for(&self, gvk: &GroupVersionKind) -> Option<&str> {
        self.kinds.get(gvk).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Definitions alone can follow references but have no REST mapper.
impl SchemaSource for SchemaSet {
    fn resolve_kind(&self, _gvr: &GroupVersionResource) -> Option<String> {
        None
    }

    fn lookup_schema(&self, id: &str) -> Option<&SchemaNode> {
        self.get(id)
    }
}

/// Schema definitions joined with a REST mapper built from discovery.
#[derive(Debug, Clone, Default)]
pub struct ClusterSchema {
    definitions: SchemaSet,
    mapper: HashMap<GroupVersionResource, GroupVersionKind>,
}

impl ClusterSchema {
    /// Build the mapper from the discovery snapshot. Malformed group versions
    /// are ignored here; the catalog builder reports them.
    pub fn new(definitions: SchemaSet, groups: &[ResourceGroup]) -> Self {
        let mut mapper = HashMap::new();
        for group in groups {
            let Ok(gv) = crate::data::resource::GroupVersion::parse(&group.group_version) else {
                continue;
            };
            for res in &group.resources {
                mapper.insert(
                    gv.with_resource(&res.name),
                    GroupVersionKind {
                        group: gv.group.clone(),
                        version: gv.version.clone(),
                        kind: res.kind.clone(),
                    },
                );
            }
        }
        ClusterSchema {
            definitions,
            mapper,
        }
    }

    pub fn definitions(&self) -> &SchemaSet {
        &self.definitions
    }

    pub fn kind_for(&self, gvr: &GroupVersionResource) -> Option<&GroupVersionKind> {
        self.mapper.get(gvr)
    }
}

impl SchemaSource for ClusterSchema {
    fn resolve_kind(&self, gvr: &GroupVersionResource) -> Option<String> {
        let gvk = self.mapper.get(gvr)?;
        self.definitions.definition_for(gvk).map(str::to_string)
    }

    fn lookup_schema(&self, id: &str) -> Option<&SchemaNode> {
        self.definitions.get(id)
    }
}
