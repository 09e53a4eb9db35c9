//! # kubectl-apidocs
//!
//! Browse the API resources of a Kubernetes cluster as a tree, with
//! `kubectl explain` documentation for every field.
//!
//! The catalog is built from a live cluster (discovery plus `/openapi/v2`) or
//! from saved documents, then shown in the [`apidocs`] terminal browser or
//! printed by the `paths` and `explain` subcommands.
//!
//! ## Modules
//!
//! - [`cluster`] - Discovery and schema requests against the API server
//! - [`commands`] - `paths`, `explain` and the interactive browser
//! - [`config`] - `.apidocs.toml` settings
//! - [`ctx`] - Application context and catalog build
//! - [`logging`] - Logger setup for terminal and subcommand modes

/// Discovery and schema retrieval from a live cluster.
pub mod cluster;

/// Subcommand implementations.
pub mod commands;

/// User configuration.
pub mod config;

/// Application context and state management.
pub mod ctx;

pub mod logging;

#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;
