//! OpenAPI v2 (swagger) documents as served by `/openapi/v2`.
//!
//! Only the parts needed to enumerate and document fields are read:
//! `definitions`, their `properties`, `items`, `additionalProperties`,
//! `$ref`/`allOf` and the `x-kubernetes-group-version-kind` extension.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{
    data::schema::{
        ContainerSchema, Field, GroupVersionKind, KindSchema, PrimitiveSchema, ReferenceSchema,
        SchemaNode, SchemaSet,
    },
    error::OpenApiError,
};

const DEFINITIONS_PREFIX: &str = "#/definitions/";

#[derive(Debug, Deserialize)]
struct Document {
    definitions: Option<Map<String, Value>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSchema {
    #[serde(rename = "$ref")]
    reference: Option<String>,
    #[serde(rename = "type")]
    type_name: Option<String>,
    format: Option<String>,
    description: Option<String>,
    #[serde(default)]
    properties: Map<String, Value>,
    #[serde(default)]
    required: Vec<String>,
    items: Option<Box<Value>>,
    additional_properties: Option<Value>,
    #[serde(default)]
    all_of: Vec<Value>,
    #[serde(default, rename = "x-kubernetes-group-version-kind")]
    group_version_kind: Vec<GroupVersionKind>,
}

/// Parse a swagger document into a definitions store.
pub fn parse(text: &str) -> Result<SchemaSet, OpenApiError> {
    let doc: Value = serde_json::from_str(text)?;
    from_value(&doc)
}

/// Convert an already decoded swagger document.
pub fn from_value(doc: &Value) -> Result<SchemaSet, OpenApiError> {
    let doc = Document::deserialize(doc)?;
    let definitions = doc.definitions.ok_or(OpenApiError::MissingDefinitions)?;

    let mut set = SchemaSet::new();
    for (name, value) in &definitions {
        let raw = decode(name, value)?;
        for gvk in &raw.group_version_kind {
            set.register_kind(gvk.clone(), name.as_str());
        }
        set.insert(name.as_str(), convert(name, &raw)?);
    }
    debug!("openapi: {} definitions", set.len());
    Ok(set)
}

fn decode(name: &str, value: &Value) -> Result<RawSchema, OpenApiError> {
    RawSchema::deserialize(value).map_err(|e| OpenApiError::InvalidDefinition {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

fn convert(name: &str, raw: &RawSchema) -> Result<SchemaNode, OpenApiError> {
    let description = raw.description.clone();

    if let Some(reference) = &raw.reference {
        return Ok(reference_node(reference, description));
    }
    if let [single] = raw.all_of.as_slice() {
        let inner = decode(name, single)?;
        if let Some(reference) = &inner.reference {
            return Ok(reference_node(reference, description));
        }
    }

    match raw.type_name.as_deref() {
        Some("array") => {
            let items = raw.items.as_deref().ok_or_else(|| OpenApiError::InvalidDefinition {
                name: name.to_string(),
                reason: "array without items".to_string(),
            })?;
            Ok(SchemaNode::Array(ContainerSchema {
                description,
                sub_schema: Box::new(convert(name, &decode(name, items)?)?),
            }))
        }
        Some("object") | None if !raw.properties.is_empty() => {
            let mut fields = Vec::with_capacity(raw.properties.len());
            for (field, value) in &raw.properties {
                let path = format!("{name}.{field}");
                fields.push(Field {
                    name: field.clone(),
                    schema: convert(&path, &decode(&path, value)?)?,
                });
            }
            Ok(SchemaNode::Kind(KindSchema {
                description,
                fields,
                required: raw.required.clone(),
            }))
        }
        Some("object") | None => match raw.additional_properties.as_ref() {
            Some(values) if values.is_object() => Ok(SchemaNode::Map(ContainerSchema {
                description,
                sub_schema: Box::new(convert(name, &decode(name, values)?)?),
            })),
            _ => Ok(SchemaNode::Primitive(PrimitiveSchema {
                description,
                type_name: "object".to_string(),
                format: raw.format.clone(),
            })),
        },
        Some(other) => Ok(SchemaNode::Primitive(PrimitiveSchema {
            description,
            type_name: other.to_string(),
            format: raw.format.clone(),
        })),
    }
}

fn reference_node(reference: &str, description: Option<String>) -> SchemaNode {
    let target = reference
        .strip_prefix(DEFINITIONS_PREFIX)
        .unwrap_or(reference);
    SchemaNode::Reference(ReferenceSchema {
        description,
        reference: target.to_string(),
    })
}
