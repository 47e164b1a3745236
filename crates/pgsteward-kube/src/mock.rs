//! Canned test doubles for the client facade
//!
//! Code exercising configuration-loading paths needs a facade that answers
//! without an API server. [`CannedAccess`] is a table-backed stand-in for
//! one resource category; [`mock_clients`] wires up the tables the
//! infrastructure-role tests expect.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use k8s_openapi::ByteString;
use k8s_openapi::api::core::v1::{ConfigMap, Secret};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

use crate::access::{ClusterResourceAccess, ResourceAccess};
use crate::client::KubeClients;
use crate::error::{KubeError, Result};

/// Lookup name both canned stores answer with fixture data
pub const FIXTURE_NAME: &str = "infrastructureroles-test";

/// Lookup name that always fails, for exercising error paths
pub const FAILING_NAME: &str = "infrastructureroles-broken";

/// Counts of operations performed, for test assertions
#[derive(Debug, Default, Clone)]
pub struct OperationCounts {
    pub gets: usize,
    pub applies: usize,
    pub deletes: usize,
}

/// In-memory, table-backed access for one resource category
///
/// Lookups ignore the namespace and key on the object name. Unknown names
/// yield [`KubeError::NotFound`]; names registered with
/// [`CannedAccess::with_failure`] yield the injected error instead.
pub struct CannedAccess<K> {
    kind: &'static str,
    objects: RwLock<HashMap<String, K>>,
    failures: HashMap<String, String>,
    operations: RwLock<OperationCounts>,
}

impl<K> CannedAccess<K> {
    /// Create an empty table; every lookup fails with not-found
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            objects: RwLock::new(HashMap::new()),
            failures: HashMap::new(),
            operations: RwLock::new(OperationCounts::default()),
        }
    }

    /// Seed a canned object under a lookup name
    pub fn with_object(self, name: impl Into<String>, object: K) -> Self {
        self.objects.write().unwrap().insert(name.into(), object);
        self
    }

    /// Make lookups of a name fail with the given message
    pub fn with_failure(mut self, name: impl Into<String>, message: impl Into<String>) -> Self {
        self.failures.insert(name.into(), message.into());
        self
    }

    /// Operation counts so far, for assertions
    pub fn operation_counts(&self) -> OperationCounts {
        self.operations.read().unwrap().clone()
    }
}

impl<K: Clone> CannedAccess<K> {
    fn lookup(&self, name: &str) -> Result<K> {
        self.operations.write().unwrap().gets += 1;

        if let Some(message) = self.failures.get(name) {
            return Err(KubeError::Canned {
                name: name.to_string(),
                message: message.clone(),
            });
        }

        self.objects
            .read()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| KubeError::NotFound {
                kind: self.kind,
                name: name.to_string(),
            })
    }

    fn store(&self, name: &str, object: &K) -> K {
        self.operations.write().unwrap().applies += 1;
        self.objects
            .write()
            .unwrap()
            .insert(name.to_string(), object.clone());
        object.clone()
    }

    fn remove(&self, name: &str) -> Result<()> {
        self.operations.write().unwrap().deletes += 1;
        self.objects
            .write()
            .unwrap()
            .remove(name)
            .map(|_| ())
            .ok_or(KubeError::NotFound {
                kind: self.kind,
                name: name.to_string(),
            })
    }
}

#[async_trait]
impl<K> ResourceAccess<K> for CannedAccess<K>
where
    K: Clone + Send + Sync + 'static,
{
    async fn get(&self, _namespace: &str, name: &str) -> Result<K> {
        self.lookup(name)
    }

    async fn apply(&self, _namespace: &str, name: &str, desired: &K) -> Result<K> {
        Ok(self.store(name, desired))
    }

    async fn delete(&self, _namespace: &str, name: &str) -> Result<()> {
        self.remove(name)
    }
}

#[async_trait]
impl<K> ClusterResourceAccess<K> for CannedAccess<K>
where
    K: Clone + Send + Sync + 'static,
{
    async fn get(&self, name: &str) -> Result<K> {
        self.lookup(name)
    }

    async fn apply(&self, name: &str, desired: &K) -> Result<K> {
        Ok(self.store(name, desired))
    }

    async fn delete(&self, name: &str) -> Result<()> {
        self.remove(name)
    }
}

/// Build a facade whose secret and config-map lookups answer with the
/// infrastructure-role fixtures.
///
/// Every other category starts as an empty table (lookups fail with
/// not-found), and the raw client is left unset.
pub fn mock_clients() -> KubeClients {
    KubeClients {
        secrets: Arc::new(
            CannedAccess::new("Secret")
                .with_object(FIXTURE_NAME, fixture_secret())
                .with_failure(FAILING_NAME, "canned lookup failure"),
        ),
        config_maps: Arc::new(
            CannedAccess::new("ConfigMap")
                .with_object(FIXTURE_NAME, fixture_config_map())
                .with_failure(FAILING_NAME, "canned lookup failure"),
        ),
        services: Arc::new(CannedAccess::new("Service")),
        endpoints: Arc::new(CannedAccess::new("Endpoints")),
        pods: Arc::new(CannedAccess::new("Pod")),
        persistent_volumes: Arc::new(CannedAccess::new("PersistentVolume")),
        persistent_volume_claims: Arc::new(CannedAccess::new("PersistentVolumeClaim")),
        nodes: Arc::new(CannedAccess::new("Node")),
        namespaces: Arc::new(CannedAccess::new("Namespace")),
        service_accounts: Arc::new(CannedAccess::new("ServiceAccount")),
        stateful_sets: Arc::new(CannedAccess::new("StatefulSet")),
        roles: Arc::new(CannedAccess::new("Role")),
        role_bindings: Arc::new(CannedAccess::new("RoleBinding")),
        pod_disruption_budgets: Arc::new(CannedAccess::new("PodDisruptionBudget")),
        custom_resource_definitions: Arc::new(CannedAccess::new("CustomResourceDefinition")),
        cron_jobs: Arc::new(CannedAccess::new("CronJob")),
        postgres_clusters: Arc::new(CannedAccess::new("PostgresCluster")),
        raw: None,
    }
}

fn fixture_secret() -> Secret {
    let mut data = BTreeMap::new();
    data.insert("user1".to_string(), ByteString(b"testrole".to_vec()));
    data.insert(
        "password1".to_string(),
        ByteString(b"testpassword".to_vec()),
    );
    data.insert("inrole1".to_string(), ByteString(b"testinrole".to_vec()));
    data.insert(
        "foobar".to_string(),
        ByteString(BASE64.encode(b"password").into_bytes()),
    );

    Secret {
        metadata: ObjectMeta {
            name: Some("testcluster".to_string()),
            ..Default::default()
        },
        data: Some(data),
        ..Default::default()
    }
}

fn fixture_config_map() -> ConfigMap {
    ConfigMap {
        metadata: ObjectMeta {
            name: Some("testcluster".to_string()),
            ..Default::default()
        },
        data: Some(BTreeMap::from([("foobar".to_string(), "{}".to_string())])),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::Node;

    #[tokio::test]
    async fn test_fixture_secret_lookup() {
        let clients = mock_clients();

        let secret = clients.secrets.get("default", FIXTURE_NAME).await.unwrap();
        assert_eq!(secret.metadata.name.as_deref(), Some("testcluster"));

        let data = secret.data.unwrap();
        assert_eq!(data["user1"].0, b"testrole");
        assert_eq!(data["password1"].0, b"testpassword");
        assert_eq!(data["inrole1"].0, b"testinrole");
        // Stored base64-encoded, as configuration loaders expect
        assert_eq!(data["foobar"].0, b"cGFzc3dvcmQ=");
    }

    #[tokio::test]
    async fn test_fixture_config_map_lookup() {
        let clients = mock_clients();

        let config_map = clients
            .config_maps
            .get("default", FIXTURE_NAME)
            .await
            .unwrap();
        assert_eq!(config_map.metadata.name.as_deref(), Some("testcluster"));
        assert_eq!(
            config_map.data.unwrap().get("foobar").map(String::as_str),
            Some("{}")
        );
    }

    #[tokio::test]
    async fn test_lookup_ignores_namespace() {
        let clients = mock_clients();
        assert!(clients.secrets.get("default", FIXTURE_NAME).await.is_ok());
        assert!(clients.secrets.get("somewhere-else", FIXTURE_NAME).await.is_ok());
    }

    #[tokio::test]
    async fn test_failing_name_returns_injected_error() {
        let clients = mock_clients();
        let err = clients.secrets.get("default", FAILING_NAME).await.unwrap_err();
        assert!(matches!(err, KubeError::Canned { .. }));
        // Injected failures are opaque; they classify as neither outcome
        assert!(!err.is_not_found());
        assert!(!err.is_already_exists());
    }

    #[tokio::test]
    async fn test_unknown_name_is_not_found() {
        let clients = mock_clients();
        let err = clients.secrets.get("default", "unknown").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_unseeded_categories_answer_not_found() {
        let clients = mock_clients();
        assert!(
            clients
                .pods
                .get("default", "any")
                .await
                .unwrap_err()
                .is_not_found()
        );
        assert!(clients.nodes.get("any").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_raw_client_is_unset() {
        assert!(mock_clients().raw_client().is_none());
    }

    #[tokio::test]
    async fn test_apply_then_get_round_trips() {
        let table: CannedAccess<Node> = CannedAccess::new("Node");

        let mut node = Node::default();
        node.metadata.name = Some("worker-1".to_string());

        ClusterResourceAccess::apply(&table, "worker-1", &node)
            .await
            .unwrap();
        let fetched = ClusterResourceAccess::get(&table, "worker-1").await.unwrap();
        assert_eq!(fetched.metadata.name.as_deref(), Some("worker-1"));

        ClusterResourceAccess::delete(&table, "worker-1").await.unwrap();
        assert!(
            ClusterResourceAccess::get(&table, "worker-1")
                .await
                .unwrap_err()
                .is_not_found()
        );
    }

    #[tokio::test]
    async fn test_delete_unknown_name_is_not_found() {
        let table: CannedAccess<Node> = CannedAccess::new("Node");
        assert!(
            ClusterResourceAccess::delete(&table, "missing")
                .await
                .unwrap_err()
                .is_not_found()
        );
    }

    #[tokio::test]
    async fn test_operation_counts() {
        let table = CannedAccess::new("Secret").with_object("one", fixture_secret());

        let _ = ResourceAccess::get(&table, "default", "one").await;
        let _ = ResourceAccess::get(&table, "default", "two").await;
        let _ = ResourceAccess::apply(&table, "default", "three", &fixture_secret()).await;
        let _ = ResourceAccess::delete(&table, "default", "three").await;

        let counts = table.operation_counts();
        assert_eq!(counts.gets, 2);
        assert_eq!(counts.applies, 1);
        assert_eq!(counts.deletes, 1);
    }
}
