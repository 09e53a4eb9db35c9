//! Subcommand implementations.

use std::collections::HashMap;

use anyhow::Context;
use apidocs::{
    data::{
        AppData, CatalogBuilder,
        builder::sort_groups,
        resource::{GroupVersion, GroupVersionResource, ResourceGroup},
    },
    explain::{SchemaExplainer, explain_path},
};
use regex::Regex;

use crate::ctx::{AppContext, Snapshot};

/// Lookup from any user-facing resource name to its identifier.
///
/// Names are matched case-insensitively. When two groups serve the same name,
/// the one sorted first (pinned groups, then alphabetical) wins.
#[derive(Debug, Default)]
pub struct ResourceIndex {
    by_alias: HashMap<String, GroupVersionResource>,
    ordered: Vec<GroupVersionResource>,
}

impl ResourceIndex {
    pub fn new(groups: &[ResourceGroup], priority: &[String]) -> Self {
        let mut groups = groups.to_vec();
        sort_groups(&mut groups, priority);

        let mut index = Self::default();
        for group in &mut groups {
            let Ok(gv) = GroupVersion::parse(&group.group_version) else {
                continue;
            };
            group.resources.sort_by(|a, b| a.name.cmp(&b.name));
            for res in &group.resources {
                let gvr = gv.with_resource(&res.name);
                for alias in res.aliases() {
                    index
                        .by_alias
                        .entry(alias.to_lowercase())
                        .or_insert_with(|| gvr.clone());
                }
                index.ordered.push(gvr);
            }
        }
        index
    }

    pub fn resolve(&self, name: &str) -> Option<&GroupVersionResource> {
        self.by_alias.get(&name.to_lowercase())
    }

    /// Every resource in catalog order.
    pub fn resources(&self) -> &[GroupVersionResource] {
        &self.ordered
    }
}

/// Field paths of every resource, or of one resource, optionally filtered by
/// a regular expression.
///
/// # Errors
///
/// Returns an error if the filter is not a valid regex or the resource is
/// unknown.
pub fn field_paths(
    snapshot: &Snapshot,
    priority: &[String],
    filter: Option<&str>,
    resource: Option<&str>,
) -> anyhow::Result<Vec<String>> {
    let filter = filter
        .map(Regex::new)
        .transpose()
        .context("Invalid --filter expression")?;
    let index = ResourceIndex::new(&snapshot.groups, priority);
    let targets = match resource {
        Some(name) => {
            let gvr = index
                .resolve(name)
                .ok_or_else(|| anyhow!("the server doesn't have a resource type {name:?}"))?;
            vec![gvr.clone()]
        }
        None => index.resources().to_vec(),
    };

    let builder = CatalogBuilder::new(snapshot.schema.as_ref());
    let mut out = Vec::new();
    for gvr in &targets {
        let paths = match builder.field_paths(gvr) {
            Ok(paths) => paths,
            // a single named resource must resolve; the full listing skips
            Err(e) if resource.is_some() => return Err(e.into()),
            Err(e) => {
                warn!("skip resource: {e}");
                continue;
            }
        };
        out.extend(
            paths
                .into_iter()
                .filter(|p| filter.as_ref().is_none_or(|re| re.is_match(p))),
        );
    }
    Ok(out)
}

/// Documentation for `resource.field.path`. The first segment may be any
/// alias of the resource: plural, singular, kind or short name.
///
/// # Errors
///
/// Returns an error if the resource is unknown or a field does not exist.
pub fn explain(snapshot: &Snapshot, priority: &[String], path: &str) -> anyhow::Result<String> {
    let (name, rest) = match path.split_once('.') {
        Some((name, rest)) => (name, Some(rest)),
        None => (path, None),
    };
    if name.is_empty() {
        bail!("a resource name is required");
    }

    let index = ResourceIndex::new(&snapshot.groups, priority);
    let gvr = index
        .resolve(name)
        .ok_or_else(|| anyhow!("the server doesn't have a resource type {name:?}"))?;
    let full_path = match rest {
        Some(rest) => format!("{}.{rest}", gvr.resource),
        None => gvr.resource.clone(),
    };

    let explainer = SchemaExplainer::new(snapshot.schema.clone());
    let text = explain_path(&explainer, gvr, &full_path)?;
    Ok(text)
}

/// Build the catalog and run the interactive browser.
///
/// # Errors
///
/// Returns an error if discovery fails or the terminal cannot be driven.
pub async fn browse(ctx: &AppContext) -> anyhow::Result<()> {
    let snapshot = ctx.snapshot().await?;
    let report = ctx.build_catalog(&snapshot)?;
    let explainer = SchemaExplainer::new(snapshot.schema.clone());
    let mut app = AppData::new(report.catalog, Box::new(explainer));
    apidocs::run(&mut app).await
}
