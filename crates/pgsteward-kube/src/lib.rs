//! pgsteward Kube - Kubernetes integration for the Postgres cluster operator
//!
//! This crate provides:
//! - **Client Facade**: one immutable handle with typed access to every
//!   resource category the operator manages, plus the raw low-level client
//! - **Equivalence Engine**: desired-vs-observed comparisons that tell the
//!   control loop when an update would be a no-op
//! - **Error Classification**: total predicates over raw API errors
//!   (not-found, already-exists)
//! - **Test Doubles**: table-backed canned accessors for exercising
//!   dependent code without a cluster

pub mod access;
pub mod annotations;
pub mod client;
pub mod compare;
pub mod crd;
pub mod error;
pub mod mock;

pub use access::{ClusterResourceAccess, FIELD_MANAGER, LiveAccess, ResourceAccess};
pub use client::{ClientConfig, KubeClients};
pub use compare::{
    MatchVerdict, first_container_image, same_cron_job, same_disruption_budget, same_service,
};
pub use crd::{PostgresCluster, PostgresClusterSpec, PostgresClusterStatus};
pub use error::{ApiErrorKind, KubeError, Result, classify, is_already_exists, is_not_found};
pub use mock::{CannedAccess, FAILING_NAME, FIXTURE_NAME, OperationCounts, mock_clients};
