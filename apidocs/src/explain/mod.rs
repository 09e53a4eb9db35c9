//! Field documentation.

pub mod cache;
pub mod render;

pub use cache::ExplainCache;
pub use render::{Explain, SchemaExplainer, explain_path};
