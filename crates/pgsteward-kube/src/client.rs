//! Aggregated Kubernetes client for the operator control loop
//!
//! `KubeClients` bundles typed access to every resource category the
//! operator touches behind one immutable handle, built once per process.
//! Construction is all-or-nothing: a facade either carries every accessor
//! or the caller gets an error and nothing else.

use std::path::PathBuf;
use std::sync::Arc;

use k8s_openapi::api::apps::v1::StatefulSet;
use k8s_openapi::api::batch::v1::CronJob;
use k8s_openapi::api::core::v1::{
    ConfigMap, Endpoints, Namespace, Node, PersistentVolume, PersistentVolumeClaim, Pod, Secret,
    Service, ServiceAccount,
};
use k8s_openapi::api::policy::v1::PodDisruptionBudget;
use k8s_openapi::api::rbac::v1::{Role, RoleBinding};
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::config::{KubeConfigOptions, Kubeconfig};
use tracing::{debug, info};

use crate::access::{ClusterResourceAccess, LiveAccess, ResourceAccess};
use crate::crd::PostgresCluster;
use crate::error::{KubeError, Result};

/// Where to find the API server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientConfig {
    /// Service-account discovery from inside a pod
    InCluster,

    /// An explicit kubeconfig file, optionally pinned to a context
    Kubeconfig {
        path: PathBuf,
        context: Option<String>,
    },
}

impl ClientConfig {
    /// Resolve this configuration into a client configuration.
    ///
    /// Failures (unreadable file, malformed content, unknown context, no
    /// in-cluster environment) surface as [`KubeError::Connection`].
    pub async fn load(&self) -> Result<kube::Config> {
        match self {
            Self::InCluster => kube::Config::incluster().map_err(|e| {
                KubeError::Connection(format!("in-cluster configuration unavailable: {e}"))
            }),
            Self::Kubeconfig { path, context } => {
                debug!(path = %path.display(), "loading kubeconfig");
                let kubeconfig = Kubeconfig::read_from(path).map_err(|e| {
                    KubeError::Connection(format!(
                        "could not read kubeconfig {}: {e}",
                        path.display()
                    ))
                })?;
                let options = KubeConfigOptions {
                    context: context.clone(),
                    ..Default::default()
                };
                kube::Config::from_custom_kubeconfig(kubeconfig, &options)
                    .await
                    .map_err(|e| {
                        KubeError::Connection(format!(
                            "invalid kubeconfig {}: {e}",
                            path.display()
                        ))
                    })
            }
        }
    }
}

/// Aggregated handle over every resource category the operator manages
///
/// Each field is a capability trait object, so tests can swap in the
/// canned tables from [`crate::mock`] without touching the control loop.
/// The handle is immutable after construction; there are no setters.
pub struct KubeClients {
    pub secrets: Arc<dyn ResourceAccess<Secret>>,
    pub services: Arc<dyn ResourceAccess<Service>>,
    pub endpoints: Arc<dyn ResourceAccess<Endpoints>>,
    pub pods: Arc<dyn ResourceAccess<Pod>>,
    pub persistent_volumes: Arc<dyn ClusterResourceAccess<PersistentVolume>>,
    pub persistent_volume_claims: Arc<dyn ResourceAccess<PersistentVolumeClaim>>,
    pub config_maps: Arc<dyn ResourceAccess<ConfigMap>>,
    pub nodes: Arc<dyn ClusterResourceAccess<Node>>,
    pub namespaces: Arc<dyn ClusterResourceAccess<Namespace>>,
    pub service_accounts: Arc<dyn ResourceAccess<ServiceAccount>>,
    pub stateful_sets: Arc<dyn ResourceAccess<StatefulSet>>,
    pub roles: Arc<dyn ResourceAccess<Role>>,
    pub role_bindings: Arc<dyn ResourceAccess<RoleBinding>>,
    pub pod_disruption_budgets: Arc<dyn ResourceAccess<PodDisruptionBudget>>,
    pub custom_resource_definitions: Arc<dyn ClusterResourceAccess<CustomResourceDefinition>>,
    pub cron_jobs: Arc<dyn ResourceAccess<CronJob>>,
    pub postgres_clusters: Arc<dyn ResourceAccess<PostgresCluster>>,

    pub(crate) raw: Option<kube::Client>,
}

impl std::fmt::Debug for KubeClients {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeClients")
            .field("raw", &self.raw.is_some())
            .finish_non_exhaustive()
    }
}

impl KubeClients {
    /// Connect using the given configuration
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        let kube_config = config.load().await?;
        let client = kube::Client::try_from(kube_config)
            .map_err(|e| KubeError::Connection(format!("could not build client: {e}")))?;
        info!("connected to the Kubernetes API");
        Ok(Self::with_client(client))
    }

    /// Build the facade around an existing client
    pub fn with_client(client: kube::Client) -> Self {
        Self {
            secrets: Arc::new(LiveAccess::<Secret>::new(client.clone())),
            services: Arc::new(LiveAccess::<Service>::new(client.clone())),
            endpoints: Arc::new(LiveAccess::<Endpoints>::new(client.clone())),
            pods: Arc::new(LiveAccess::<Pod>::new(client.clone())),
            persistent_volumes: Arc::new(LiveAccess::<PersistentVolume>::new(client.clone())),
            persistent_volume_claims: Arc::new(LiveAccess::<PersistentVolumeClaim>::new(
                client.clone(),
            )),
            config_maps: Arc::new(LiveAccess::<ConfigMap>::new(client.clone())),
            nodes: Arc::new(LiveAccess::<Node>::new(client.clone())),
            namespaces: Arc::new(LiveAccess::<Namespace>::new(client.clone())),
            service_accounts: Arc::new(LiveAccess::<ServiceAccount>::new(client.clone())),
            stateful_sets: Arc::new(LiveAccess::<StatefulSet>::new(client.clone())),
            roles: Arc::new(LiveAccess::<Role>::new(client.clone())),
            role_bindings: Arc::new(LiveAccess::<RoleBinding>::new(client.clone())),
            pod_disruption_budgets: Arc::new(LiveAccess::<PodDisruptionBudget>::new(
                client.clone(),
            )),
            custom_resource_definitions: Arc::new(LiveAccess::<CustomResourceDefinition>::new(
                client.clone(),
            )),
            cron_jobs: Arc::new(LiveAccess::<CronJob>::new(client.clone())),
            postgres_clusters: Arc::new(LiveAccess::<PostgresCluster>::new(client.clone())),
            raw: Some(client),
        }
    }

    /// The low-level client, for operations with no typed accessor.
    ///
    /// `None` on facades built by the test-double factory.
    pub fn raw_client(&self) -> Option<&kube::Client> {
        self.raw.as_ref()
    }
}
