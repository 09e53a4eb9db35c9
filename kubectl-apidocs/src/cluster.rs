//! Discovery and schema retrieval from a live cluster.

use std::{fmt::Display, future::Future, path::Path, time::Duration};

use apidocs::{
    data::resource::{ApiResource, ResourceGroup},
    error::BuildError,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::APIResourceList;
use kube::{
    Client, Config,
    config::{KubeConfigOptions, Kubeconfig},
};

const OPENAPI_V2_PATH: &str = "/openapi/v2";

/// Connected API server client with a per-request time bound.
#[derive(Clone)]
pub struct ClusterClient {
    client: Client,
    timeout: Duration,
}

impl ClusterClient {
    /// Connect using an explicit kubeconfig file, or the usual inference
    /// (`KUBECONFIG`, `~/.kube/config`, in-cluster) otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the kubeconfig cannot be read or names an unknown
    /// context.
    pub async fn connect(
        kubeconfig: Option<&Path>,
        context: Option<&str>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let options = KubeConfigOptions {
            context: context.map(str::to_string),
            ..Default::default()
        };
        let mut config = match (kubeconfig, context) {
            (Some(path), _) => {
                let kc = Kubeconfig::read_from(path)?;
                Config::from_custom_kubeconfig(kc, &options).await?
            }
            (None, Some(_)) => Config::from_kubeconfig(&options).await?,
            (None, None) => Config::infer().await?,
        };
        config.read_timeout = Some(timeout);
        info!("connecting to {}", config.cluster_url);

        Ok(Self {
            client: Client::try_from(config)?,
            timeout,
        })
    }

    /// Preferred version of every API group with its top level resources.
    ///
    /// # Errors
    ///
    /// Any failed or timed out request aborts discovery.
    pub async fn discover(&self) -> Result<Vec<ResourceGroup>, BuildError> {
        let mut groups = Vec::new();

        let core = bounded(
            self.timeout,
            "core versions",
            self.client.list_core_api_versions(),
        )
        .await?;
        if let Some(version) = core.versions.first() {
            let list = bounded(
                self.timeout,
                version,
                self.client.list_core_api_resources(version),
            )
            .await?;
            groups.push(resource_group(list));
        }

        let api_groups =
            bounded(self.timeout, "api groups", self.client.list_api_groups()).await?;
        for group in api_groups.groups {
            let Some(preferred) = group
                .preferred_version
                .or_else(|| group.versions.first().cloned())
            else {
                debug!("group {} has no versions", group.name);
                continue;
            };
            let gv = preferred.group_version;
            let list =
                bounded(self.timeout, &gv, self.client.list_api_group_resources(&gv)).await?;
            groups.push(resource_group(list));
        }

        info!("discovered {} group versions", groups.len());
        Ok(groups)
    }

    /// Raw OpenAPI v2 document.
    pub async fn openapi_v2(&self) -> Result<String, BuildError> {
        let request = http::Request::get(OPENAPI_V2_PATH)
            .header(http::header::ACCEPT, "application/json")
            .body(Vec::new())
            .map_err(|e| BuildError::Discovery(format!("{OPENAPI_V2_PATH}: {e}")))?;
        bounded(self.timeout, OPENAPI_V2_PATH, self.client.request_text(request)).await
    }
}

/// Await `call` for at most `timeout`. A failure or a timeout is a discovery
/// error naming `what`.
pub async fn bounded<T, E, F>(timeout: Duration, what: &str, call: F) -> Result<T, BuildError>
where
    E: Display,
    F: Future<Output = Result<T, E>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(Ok(v)) => Ok(v),
        Ok(Err(e)) => Err(BuildError::Discovery(format!("{what}: {e}"))),
        Err(_) => Err(BuildError::Discovery(format!(
            "{what}: timed out after {}s",
            timeout.as_secs()
        ))),
    }
}

/// Convert a discovery list, dropping sub-resources such as `pods/log`.
pub fn resource_group(list: APIResourceList) -> ResourceGroup {
    ResourceGroup {
        group_version: list.group_version,
        resources: list
            .resources
            .into_iter()
            .filter(|r| !r.name.contains('/'))
            .map(|r| ApiResource {
                name: r.name,
                kind: r.kind,
                singular_name: r.singular_name,
                short_names: r.short_names.unwrap_or_default(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::APIResource;

    fn api_resource(name: &str, kind: &str, short: &[&str]) -> APIResource {
        APIResource {
            name: name.to_string(),
            kind: kind.to_string(),
            singular_name: name.trim_end_matches('s').to_string(),
            short_names: (!short.is_empty()).then(|| short.iter().map(|s| s.to_string()).collect()),
            namespaced: true,
            verbs: vec!["get".to_string()],
            ..Default::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_request_times_out() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok::<_, kube::Error>(())
        };
        let err = bounded(Duration::from_secs(5), "api groups", slow)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            BuildError::Discovery("api groups: timed out after 5s".to_string())
        );
    }

    #[tokio::test]
    async fn test_failed_request_aborts() {
        let failing = async { Err::<(), _>(std::io::Error::other("connection refused")) };
        let err = bounded(Duration::from_secs(5), "core versions", failing)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            BuildError::Discovery("core versions: connection refused".to_string())
        );
    }

    #[tokio::test]
    async fn test_fast_request_passes() {
        let fast = async { Ok::<_, std::io::Error>(7) };
        assert_eq!(bounded(Duration::from_secs(5), "v1", fast).await, Ok(7));
    }

    #[test]
    fn test_subresources_dropped() {
        let list = APIResourceList {
            group_version: "v1".to_string(),
            resources: vec![
                api_resource("pods", "Pod", &["po"]),
                api_resource("pods/log", "Pod", &[]),
                api_resource("secrets", "Secret", &[]),
            ],
        };
        let group = resource_group(list);
        assert_eq!(group.group_version, "v1");
        let names: Vec<_> = group.resources.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["pods", "secrets"]);
        assert_eq!(group.resources[0].short_names, ["po"]);
        assert!(group.resources[1].short_names.is_empty());
    }
}
