//! Catalog data structures and their construction.
//!
//! The data module is organized into several submodules:
//!
//! - [`resource`] - Group/version/resource identifiers and discovery records
//! - [`schema`] - Schema graph nodes and the schema resolution collaborator
//! - [`openapi`] - Swagger document parsing
//! - [`visitor`] - Field path enumeration over a schema graph
//! - [`field_tree`] - Prefix tree over field paths
//! - [`catalog`] - UI-facing node arena
//! - [`builder`] - Root, group, resource and field hierarchy assembly
//! - [`app_data`] - Interactive session state

/// Interactive session state and key handling.
pub mod app_data;

/// Catalog assembly from a discovery snapshot.
pub mod builder;

/// UI-facing node arena with parent links.
pub mod catalog;

/// Prefix tree over dotted field paths.
pub mod field_tree;

pub mod openapi;

/// Group/version/resource identifiers.
pub mod resource;

/// Schema graph and resolution.
pub mod schema;

/// Cycle-safe field path enumeration.
pub mod visitor;

pub use app_data::AppData;
pub use builder::{BuildReport, CatalogBuilder};
pub use catalog::{Catalog, CatalogNode, NodeId, NodeKind};
