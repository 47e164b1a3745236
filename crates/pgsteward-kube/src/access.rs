//! Typed access to the resource categories the operator manages
//!
//! Each category is exposed through a small capability trait so the facade
//! can hold live API-backed implementations in production and table-backed
//! canned ones in tests (see [`crate::mock`]).

use std::fmt::Debug;
use std::marker::PhantomData;

use async_trait::async_trait;
use k8s_openapi::{ClusterResourceScope, NamespaceResourceScope};
use kube::api::{Api, DeleteParams, Patch, PatchParams};
use kube::{Client, Resource};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{KubeError, Result};

/// Field manager name for Server-Side Apply
pub const FIELD_MANAGER: &str = "pgsteward";

/// Access to one namespaced resource category
#[async_trait]
pub trait ResourceAccess<K>: Send + Sync {
    /// Fetch a single object
    async fn get(&self, namespace: &str, name: &str) -> Result<K>;

    /// Create or update via Server-Side Apply
    async fn apply(&self, namespace: &str, name: &str, desired: &K) -> Result<K>;

    /// Delete an object
    async fn delete(&self, namespace: &str, name: &str) -> Result<()>;
}

/// Access to one cluster-scoped resource category
#[async_trait]
pub trait ClusterResourceAccess<K>: Send + Sync {
    /// Fetch a single object
    async fn get(&self, name: &str) -> Result<K>;

    /// Create or update via Server-Side Apply
    async fn apply(&self, name: &str, desired: &K) -> Result<K>;

    /// Delete an object
    async fn delete(&self, name: &str) -> Result<()>;
}

/// Live implementation backed by the API server
pub struct LiveAccess<K> {
    client: Client,
    _kind: PhantomData<fn() -> K>,
}

impl<K> LiveAccess<K> {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            _kind: PhantomData,
        }
    }

    fn apply_params() -> PatchParams {
        let mut params = PatchParams::apply(FIELD_MANAGER);
        params.force = true; // take ownership of the fields the operator renders
        params
    }
}

#[async_trait]
impl<K> ResourceAccess<K> for LiveAccess<K>
where
    K: Resource<Scope = NamespaceResourceScope>
        + Clone
        + Debug
        + DeserializeOwned
        + Serialize
        + Send
        + Sync
        + 'static,
    K::DynamicType: Default,
{
    async fn get(&self, namespace: &str, name: &str) -> Result<K> {
        let api: Api<K> = Api::namespaced(self.client.clone(), namespace);
        api.get(name).await.map_err(KubeError::Api)
    }

    async fn apply(&self, namespace: &str, name: &str, desired: &K) -> Result<K> {
        let api: Api<K> = Api::namespaced(self.client.clone(), namespace);
        api.patch(name, &Self::apply_params(), &Patch::Apply(desired))
            .await
            .map_err(KubeError::Api)
    }

    async fn delete(&self, namespace: &str, name: &str) -> Result<()> {
        let api: Api<K> = Api::namespaced(self.client.clone(), namespace);
        api.delete(name, &DeleteParams::default())
            .await
            .map(|_| ())
            .map_err(KubeError::Api)
    }
}

#[async_trait]
impl<K> ClusterResourceAccess<K> for LiveAccess<K>
where
    K: Resource<Scope = ClusterResourceScope>
        + Clone
        + Debug
        + DeserializeOwned
        + Serialize
        + Send
        + Sync
        + 'static,
    K::DynamicType: Default,
{
    async fn get(&self, name: &str) -> Result<K> {
        let api: Api<K> = Api::all(self.client.clone());
        api.get(name).await.map_err(KubeError::Api)
    }

    async fn apply(&self, name: &str, desired: &K) -> Result<K> {
        let api: Api<K> = Api::all(self.client.clone());
        api.patch(name, &Self::apply_params(), &Patch::Apply(desired))
            .await
            .map_err(KubeError::Api)
    }

    async fn delete(&self, name: &str) -> Result<()> {
        let api: Api<K> = Api::all(self.client.clone());
        api.delete(name, &DeleteParams::default())
            .await
            .map(|_| ())
            .map_err(KubeError::Api)
    }
}
