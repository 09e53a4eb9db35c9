use std::collections::HashMap;

use crate::error::RenderError;

/// Rendered documentation keyed by field path.
///
/// Entries live for the whole session. Only successful renders are stored.
#[derive(Debug, Default)]
pub struct ExplainCache {
    entries: HashMap<String, String>,
}

impl ExplainCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached text for `path`, calling `render` on a miss.
    pub fn get_or_render<F>(&mut self, path: &str, render: F) -> Result<&str, RenderError>
    where
        F: FnOnce() -> Result<String, RenderError>,
    {
        if self.entries.contains_key(path) {
            debug!("explain cached {path}");
        } else {
            debug!("explain perform {path}");
            let text = render()?;
            self.entries.insert(path.to_string(), text);
        }
        Ok(self.entries[path].as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_called_once() {
        let mut cache = ExplainCache::new();
        let mut calls = 0;
        for _ in 0..3 {
            let text = cache
                .get_or_render("pods.spec", || {
                    calls += 1;
                    Ok("spec docs".to_string())
                })
                .unwrap();
            assert_eq!(text, "spec docs");
        }
        assert_eq!(calls, 1);
        assert_eq!(cache.entries.len(), 1);
    }

    #[test]
    fn test_failure_not_cached() {
        let mut cache = ExplainCache::new();
        let err = cache.get_or_render("pods", || Err(RenderError::EmptyPath));
        assert_eq!(err, Err(RenderError::EmptyPath));
        assert!(cache.entries.is_empty());
    }
}
