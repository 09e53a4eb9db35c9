//! Interactive navigation over a built catalog.
//!
//! - [`navigator`] - drill-down stack, preview and expansion state
//! - [`search`] - filtered views of the hierarchy

pub mod navigator;
pub mod search;

pub use navigator::{Navigator, TreeView};
pub use search::{SearchResult, filter};
