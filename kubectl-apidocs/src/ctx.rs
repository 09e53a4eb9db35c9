//! Application context and state management.
//!
//! This module provides the [`AppContext`] type which holds the settings of a
//! run and knows where the discovery snapshot and schema come from.

use std::{
    io::{self, Write},
    path::PathBuf,
    sync::Arc,
};

use anyhow::Context;
use apidocs::{
    data::{BuildReport, CatalogBuilder, openapi, resource::ResourceGroup, schema::ClusterSchema},
    error::BuildError,
};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::fs;

use crate::{cluster::ClusterClient, config::AppConfig};

/// Where discovery and schema data are read from.
#[derive(Debug, Clone, PartialEq)]
pub enum Origin {
    /// A live API server.
    Cluster {
        kubeconfig: Option<PathBuf>,
        context: Option<String>,
    },
    /// Saved discovery and `/openapi/v2` documents.
    Files { openapi: PathBuf, discovery: PathBuf },
}

/// Discovery result joined with the parsed schema.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub groups: Vec<ResourceGroup>,
    pub schema: Arc<ClusterSchema>,
}

/// The main application context.
#[derive(Debug, Clone)]
pub struct AppContext {
    /// Loaded configuration.
    pub config: AppConfig,
    /// Source of discovery and schema data.
    pub origin: Origin,
    /// Draw a progress bar while building the catalog.
    pub show_progress: bool,
}

impl AppContext {
    pub fn new(config: AppConfig, origin: Origin) -> Self {
        Self {
            config,
            origin,
            show_progress: false,
        }
    }

    /// Fetch discovery and schema data.
    ///
    /// # Errors
    ///
    /// Returns an error if the cluster cannot be reached, a request times out,
    /// a file cannot be read, or the schema document is malformed.
    pub async fn snapshot(&self) -> anyhow::Result<Snapshot> {
        let (groups, document) = match &self.origin {
            Origin::Cluster {
                kubeconfig,
                context,
            } => {
                let client = ClusterClient::connect(
                    kubeconfig.as_deref(),
                    context.as_deref(),
                    self.config.request_timeout(),
                )
                .await?;
                let groups = client.discover().await?;
                let document = client.openapi_v2().await?;
                (groups, document)
            }
            Origin::Files { openapi, discovery } => {
                let groups = read_discovery(discovery).await?;
                let document = fs::read_to_string(openapi)
                    .await
                    .with_context(|| format!("Failed to read {}", openapi.display()))?;
                (groups, document)
            }
        };

        let definitions =
            openapi::parse(&document).context("Failed to parse OpenAPI document")?;
        if definitions.is_empty() {
            bail!("OpenAPI document has no definitions");
        }
        info!(
            "snapshot: {} group versions, {} definitions",
            groups.len(),
            definitions.len()
        );
        let schema = Arc::new(ClusterSchema::new(definitions, &groups));
        Ok(Snapshot { groups, schema })
    }

    /// Build the catalog, reporting progress when enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the progress bar template is invalid or the skip
    /// report cannot be written.
    pub fn build_catalog(&self, snapshot: &Snapshot) -> anyhow::Result<BuildReport> {
        let bar = if self.show_progress {
            let bar = ProgressBar::new(0);
            bar.set_style(
                ProgressStyle::with_template(
                    "{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )?
                .progress_chars("=> "),
            );
            bar
        } else {
            ProgressBar::hidden()
        };

        let report = CatalogBuilder::new(snapshot.schema.as_ref())
            .priority_groups(self.config.priority_groups.iter().cloned())
            .on_progress(|gvr, done, total| {
                bar.set_length(total as u64);
                bar.set_position(done as u64);
                bar.set_message(gvr.to_string());
            })
            .build(snapshot.groups.clone());
        bar.finish_and_clear();

        report_skipped(&mut io::stderr().lock(), &report.skipped)?;
        Ok(report)
    }
}

/// Print every skipped group or resource with its reason.
fn report_skipped<W: Write>(out: &mut W, skipped: &[BuildError]) -> io::Result<()> {
    if skipped.is_empty() {
        return Ok(());
    }
    let header = format!("{} entries skipped while building the catalog", skipped.len());
    writeln!(out, "{}", header.yellow())?;
    for e in skipped {
        writeln!(out, "  {e}")?;
    }
    Ok(())
}

/// Read a saved discovery document: a JSON array of group versions with their
/// resources.
pub async fn read_discovery(path: &std::path::Path) -> anyhow::Result<Vec<ResourceGroup>> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let groups = serde_json::from_str(&content)
        .with_context(|| format!("Invalid discovery document {}", path.display()))?;
    Ok(groups)
}
