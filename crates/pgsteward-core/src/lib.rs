//! pgsteward Core - domain types for the Postgres cluster operator
//!
//! This crate provides the foundational types shared across pgsteward:
//! - `PostgresParams`: engine version and configuration overrides
//! - `VolumeSpec`: persistent volume request for the data directory
//! - `ClusterPhase`: lifecycle phase reported in the cluster status
//!
//! Everything here is plain data with serde and schema derives; the
//! Kubernetes-facing pieces live in `pgsteward-kube`.

pub mod cluster;
pub mod error;

pub use cluster::{
    ClusterPhase, PostgresParams, VolumeSpec, DEFAULT_LOGICAL_BACKUP_SCHEDULE, SUPPORTED_VERSIONS,
};
pub use error::{CoreError, Result};
