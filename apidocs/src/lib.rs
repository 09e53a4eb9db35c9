//! # apidocs
//!
//! A terminal browser for the resource types of a Kubernetes cluster.
//!
//! The catalog is a four level hierarchy: API groups, the resources they serve,
//! and every field reachable from each resource's schema. Selecting a node
//! shows its documentation in `kubectl explain` form.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use apidocs::data::{AppData, CatalogBuilder, openapi, resource::ResourceGroup, schema::ClusterSchema};
//! use apidocs::explain::SchemaExplainer;
//!
//! # async fn demo(swagger: &str, groups: Vec<ResourceGroup>) -> anyhow::Result<()> {
//! let schema = Arc::new(ClusterSchema::new(openapi::parse(swagger)?, &groups));
//! let report = CatalogBuilder::new(schema.as_ref()).build(groups);
//! let mut app = AppData::new(report.catalog, Box::new(SchemaExplainer::new(schema)));
//! apidocs::run(&mut app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`data`] - Schema graph, field enumeration and catalog construction
//! - [`nav`] - Drill-down navigation and search
//! - [`explain`] - Documentation rendering and caching
//! - [`ui`] - Terminal drawing
//! - [`run`] - Terminal lifecycle and event loop

#[macro_use]
extern crate log;

/// Catalog data structures and construction.
pub mod data;

/// Error types.
pub mod error;

/// Field documentation rendering and caching.
pub mod explain;

/// Navigation state machine and search filter.
pub mod nav;

/// Interactive browser runner.
pub mod run;

/// Terminal drawing.
pub mod ui;

pub use run::*;
