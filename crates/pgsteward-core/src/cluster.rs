//! Postgres cluster domain types
//!
//! These structs mirror the user-facing cluster manifest. They carry no
//! Kubernetes machinery so that manifest handling stays testable without a
//! cluster; `pgsteward-kube` embeds them into the custom resource schema.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Postgres major versions the operator knows how to provision
pub const SUPPORTED_VERSIONS: &[&str] = &["13", "14", "15", "16", "17"];

/// Cron schedule used for logical backups when the manifest sets none
pub const DEFAULT_LOGICAL_BACKUP_SCHEDULE: &str = "30 00 * * *";

/// Postgres engine configuration from a cluster manifest
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostgresParams {
    /// Major engine version, e.g. "16"
    pub version: String,

    /// Raw postgresql.conf overrides applied to every pod
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, String>,
}

impl PostgresParams {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            parameters: BTreeMap::new(),
        }
    }

    /// Reject versions the operator cannot provision
    pub fn validate(&self) -> Result<()> {
        if !SUPPORTED_VERSIONS.contains(&self.version.as_str()) {
            return Err(CoreError::UnsupportedVersion {
                version: self.version.clone(),
            });
        }
        Ok(())
    }
}

/// Persistent volume request for the Postgres data directory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VolumeSpec {
    /// Size as a Kubernetes quantity string, e.g. "50Gi"
    pub size: String,

    /// Storage class; the cluster default applies when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,
}

impl VolumeSpec {
    pub fn new(size: impl Into<String>) -> Self {
        Self {
            size: size.into(),
            storage_class: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.size.trim().is_empty() {
            return Err(CoreError::InvalidManifest {
                message: "volume size must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Lifecycle phase reported in the cluster status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ClusterPhase {
    #[default]
    Pending,
    Creating,
    Running,
    Updating,
    UpdateFailed,
    SyncFailed,
    Invalid,
}

impl ClusterPhase {
    /// Phases in which the control loop must not start another rollout
    pub fn is_transitional(&self) -> bool {
        matches!(self, Self::Pending | Self::Creating | Self::Updating)
    }
}

impl std::fmt::Display for ClusterPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "Pending",
            Self::Creating => "Creating",
            Self::Running => "Running",
            Self::Updating => "Updating",
            Self::UpdateFailed => "UpdateFailed",
            Self::SyncFailed => "SyncFailed",
            Self::Invalid => "Invalid",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_supported_version() {
        assert!(PostgresParams::new("16").validate().is_ok());
        assert!(PostgresParams::new("13").validate().is_ok());
    }

    #[test]
    fn test_validate_unsupported_version() {
        let result = PostgresParams::new("9.6").validate();
        assert!(matches!(
            result,
            Err(CoreError::UnsupportedVersion { version }) if version == "9.6"
        ));
    }

    #[test]
    fn test_volume_requires_size() {
        assert!(VolumeSpec::new("50Gi").validate().is_ok());
        assert!(VolumeSpec::new("  ").validate().is_err());
    }

    #[test]
    fn test_params_camel_case_round_trip() {
        let yaml = "version: \"16\"\nparameters:\n  shared_buffers: 1GB\n";
        let params: PostgresParams = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(params.version, "16");
        assert_eq!(
            params.parameters.get("shared_buffers").map(String::as_str),
            Some("1GB")
        );

        let back: PostgresParams =
            serde_yaml::from_str(&serde_yaml::to_string(&params).unwrap()).unwrap();
        assert_eq!(back, params);
    }

    #[test]
    fn test_volume_storage_class_key() {
        let yaml = "size: 10Gi\nstorageClass: fast-ssd\n";
        let volume: VolumeSpec = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(volume.storage_class.as_deref(), Some("fast-ssd"));
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(ClusterPhase::Running.to_string(), "Running");
        assert_eq!(ClusterPhase::UpdateFailed.to_string(), "UpdateFailed");
    }

    #[test]
    fn test_transitional_phases() {
        assert!(ClusterPhase::Creating.is_transitional());
        assert!(ClusterPhase::Updating.is_transitional());
        assert!(!ClusterPhase::Running.is_transitional());
        assert!(!ClusterPhase::SyncFailed.is_transitional());
    }
}
