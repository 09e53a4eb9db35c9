//! Error types for catalog construction, schema traversal and documentation
//! rendering.

use thiserror::Error;

use crate::data::resource::GroupVersionResource;

/// Failure while turning the discovery snapshot into a catalog.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    /// Discovery could not be reached or refused the request.
    #[error("discovery failed: {0}")]
    Discovery(String),

    /// A group/version string from discovery is malformed.
    #[error("invalid group version {group_version:?}: {reason}")]
    InvalidGroupVersion {
        group_version: String,
        reason: &'static str,
    },

    /// The REST mapper has no kind for the resource.
    #[error("no kind registered for {0}")]
    KindNotFound(GroupVersionResource),

    /// The kind is known but the schema document has no definition for it.
    #[error("no schema found for {gvr} (kind {kind})")]
    SchemaNotFound {
        gvr: GroupVersionResource,
        kind: String,
    },

    /// Field enumeration failed.
    #[error("{gvr}: {source}")]
    Traversal {
        gvr: GroupVersionResource,
        #[source]
        source: TraversalError,
    },
}

/// Failure inside the schema path visitor.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TraversalError {
    #[error("field {path}: unresolved schema reference {reference:?}")]
    UnresolvedReference { path: String, reference: String },
}

/// Failure while rendering documentation for a field path.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("empty path is not allowed for explain")]
    EmptyPath,

    #[error("no schema found for {0}")]
    SchemaNotFound(GroupVersionResource),

    #[error("field {field:?} does not exist in {path}")]
    FieldNotFound { path: String, field: String },
}

/// Malformed OpenAPI document.
#[derive(Error, Debug)]
pub enum OpenApiError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document has no `definitions` object")]
    MissingDefinitions,

    #[error("definition {name}: {reason}")]
    InvalidDefinition { name: String, reason: String },
}
