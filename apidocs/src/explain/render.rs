use std::sync::Arc;

use crate::{
    data::{
        resource::GroupVersionResource,
        schema::{ClusterSchema, KindSchema, SchemaNode, SchemaSource},
    },
    error::RenderError,
};

/// Documentation renderer.
pub trait Explain {
    /// Render the documentation of `fields` relative to the resource root.
    /// An empty slice describes the resource itself.
    fn render(&self, resource: &GroupVersionResource, fields: &[&str]) -> Result<String, RenderError>;
}

/// Render a full dotted path such as `pods.spec.containers`.
///
/// The first segment names the resource and is not passed on to the renderer.
pub fn explain_path<E: Explain + ?Sized>(
    explainer: &E,
    resource: &GroupVersionResource,
    path: &str,
) -> Result<String, RenderError> {
    if path.is_empty() {
        return Err(RenderError::EmptyPath);
    }
    let fields: Vec<&str> = path.split('.').skip(1).collect();
    explainer.render(resource, &fields)
}

// Bound on reference chains when looking for the object behind a field.
const MAX_DEREF: usize = 32;

/// Renders `kubectl explain` style plaintext from the cluster's schema
/// definitions.
#[derive(Debug, Clone)]
pub struct SchemaExplainer {
    schema: Arc<ClusterSchema>,
}

impl SchemaExplainer {
    pub fn new(schema: Arc<ClusterSchema>) -> Self {
        Self { schema }
    }

    /// The object schema behind `node`, looking through references, arrays
    /// and maps.
    fn object_of<'s>(&'s self, mut node: &'s SchemaNode) -> Option<&'s KindSchema> {
        for _ in 0..MAX_DEREF {
            node = match node {
                SchemaNode::Kind(kind) => return Some(kind),
                SchemaNode::Array(c) | SchemaNode::Map(c) => &c.sub_schema,
                SchemaNode::Reference(r) => self.schema.lookup_schema(&r.reference)?,
                SchemaNode::Primitive(_) => return None,
            };
        }
        None
    }

    fn description_of<'s>(&'s self, node: &'s SchemaNode) -> Option<&'s str> {
        node.description().or_else(|| match node {
            SchemaNode::Reference(r) => self
                .schema
                .lookup_schema(&r.reference)
                .and_then(SchemaNode::description),
            _ => None,
        })
    }
}

impl Explain for SchemaExplainer {
    fn render(&self, resource: &GroupVersionResource, fields: &[&str]) -> Result<String, RenderError> {
        let not_found = || RenderError::SchemaNotFound(resource.clone());
        let gvk = self.schema.kind_for(resource).ok_or_else(not_found)?;
        let id = self.schema.resolve_kind(resource).ok_or_else(not_found)?;
        let root = self.schema.lookup_schema(&id).ok_or_else(not_found)?;

        let mut node = root;
        let mut walked = resource.resource.to_lowercase();
        for field in fields {
            let kind = self.object_of(node).ok_or_else(|| RenderError::FieldNotFound {
                path: walked.clone(),
                field: field.to_string(),
            })?;
            let next = kind
                .fields
                .iter()
                .find(|f| f.name == *field)
                .ok_or_else(|| RenderError::FieldNotFound {
                    path: walked.clone(),
                    field: field.to_string(),
                })?;
            node = &next.schema;
            walked.push('.');
            walked.push_str(field);
        }

        let mut out = String::new();
        if !gvk.group.is_empty() {
            out.push_str(&format!("GROUP:      {}\n", gvk.group));
        }
        out.push_str(&format!("KIND:       {}\n", gvk.kind));
        out.push_str(&format!("VERSION:    {}\n\n", gvk.version));

        if let Some(last) = fields.last() {
            out.push_str(&format!("FIELD: {last} <{}>\n\n", type_name(node)));
        }

        out.push_str("DESCRIPTION:\n");
        match self.description_of(node) {
            Some(text) => push_indented(&mut out, text, 4),
            None => out.push_str("    <empty>\n"),
        }

        if let Some(kind) = self.object_of(node).filter(|k| !k.fields.is_empty()) {
            out.push_str("\nFIELDS:\n");
            for field in &kind.fields {
                let required = if kind.required.contains(&field.name) {
                    " -required-"
                } else {
                    ""
                };
                out.push_str(&format!(
                    "  {}\t<{}>{required}\n",
                    field.name,
                    type_name(&field.schema)
                ));
                if let Some(text) = self.description_of(&field.schema) {
                    push_indented(&mut out, text, 4);
                }
                out.push('\n');
            }
        }

        Ok(out)
    }
}

/// Short type label used in explain output.
pub fn type_name(node: &SchemaNode) -> String {
    match node {
        SchemaNode::Kind(_) => "Object".to_string(),
        SchemaNode::Array(c) => format!("[]{}", type_name(&c.sub_schema)),
        SchemaNode::Map(c) => format!("map[string]{}", type_name(&c.sub_schema)),
        SchemaNode::Reference(r) => r
            .reference
            .rsplit('.')
            .next()
            .unwrap_or(&r.reference)
            .to_string(),
        SchemaNode::Primitive(p) => match p.format.as_deref() {
            Some("int-or-string") => "IntOrString".to_string(),
            _ => p.type_name.clone(),
        },
    }
}

fn push_indented(out: &mut String, text: &str, indent: usize) {
    for line in text.lines() {
        if line.trim().is_empty() {
            out.push('\n');
        } else {
            out.push_str(&" ".repeat(indent));
            out.push_str(line.trim_end());
            out.push('\n');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{
        resource::{ApiResource, ResourceGroup},
        schema::{GroupVersionKind, SchemaSet},
    };

    fn explainer() -> SchemaExplainer {
        let mut set = SchemaSet::new();
        set.insert(
            "io.k8s.api.apps.v1.DeploymentSpec",
            SchemaNode::Kind(KindSchema {
                description: Some("DeploymentSpec is the specification of the desired behavior.".into()),
                fields: vec![
                    crate::data::schema::Field {
                        name: "replicas".into(),
                        schema: SchemaNode::primitive("integer")
                            .with_description("Number of desired pods."),
                    },
                    crate::data::schema::Field {
                        name: "selector".into(),
                        schema: SchemaNode::map(SchemaNode::primitive("string")),
                    },
                ],
                required: vec!["selector".into()],
            }),
        );
        set.insert(
            "io.k8s.api.apps.v1.Deployment",
            SchemaNode::kind([("spec", SchemaNode::reference("io.k8s.api.apps.v1.DeploymentSpec"))])
                .with_description("Deployment enables declarative updates for Pods."),
        );
        set.register_kind(
            GroupVersionKind {
                group: "apps".into(),
                version: "v1".into(),
                kind: "Deployment".into(),
            },
            "io.k8s.api.apps.v1.Deployment",
        );
        let groups = [ResourceGroup {
            group_version: "apps/v1".into(),
            resources: vec![ApiResource {
                name: "deployments".into(),
                kind: "Deployment".into(),
                ..Default::default()
            }],
        }];
        SchemaExplainer::new(Arc::new(ClusterSchema::new(set, &groups)))
    }

    fn deployments() -> GroupVersionResource {
        GroupVersionResource {
            group: "apps".into(),
            version: "v1".into(),
            resource: "deployments".into(),
        }
    }

    #[test]
    fn test_render_resource() {
        let text = explain_path(&explainer(), &deployments(), "deployments").unwrap();
        assert!(text.starts_with("GROUP:      apps\nKIND:       Deployment\nVERSION:    v1\n"));
        assert!(text.contains("    Deployment enables declarative updates for Pods."));
        assert!(text.contains("  spec\t<DeploymentSpec>"));
    }

    #[test]
    fn test_render_nested_field() {
        let text = explain_path(&explainer(), &deployments(), "deployments.spec.replicas").unwrap();
        assert!(text.contains("FIELD: replicas <integer>"));
        assert!(text.contains("    Number of desired pods."));
        assert!(!text.contains("FIELDS:"));
    }

    #[test]
    fn test_render_lists_required_fields() {
        let text = explain_path(&explainer(), &deployments(), "deployments.spec").unwrap();
        assert!(text.contains("  selector\t<map[string]string> -required-"));
        assert!(text.contains("DeploymentSpec is the specification"));
    }

    #[test]
    fn test_render_errors() {
        let e = explainer();
        assert_eq!(
            explain_path(&e, &deployments(), ""),
            Err(RenderError::EmptyPath)
        );
        assert_eq!(
            explain_path(&e, &deployments(), "deployments.spec.nope"),
            Err(RenderError::FieldNotFound {
                path: "deployments.spec".into(),
                field: "nope".into(),
            })
        );
    }
}
