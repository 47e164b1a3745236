//! The PostgresCluster custom resource
//!
//! One `PostgresCluster` object describes one managed Postgres cluster; the
//! control loop reconciles everything else (services, stateful set,
//! disruption budget, backup job) from it.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use pgsteward_core::{ClusterPhase, DEFAULT_LOGICAL_BACKUP_SCHEDULE, PostgresParams, VolumeSpec};

/// Desired state of one Postgres cluster
#[derive(CustomResource, Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "pgsteward.io",
    version = "v1",
    kind = "PostgresCluster",
    plural = "postgresclusters",
    shortname = "pgc",
    namespaced,
    status = "PostgresClusterStatus",
    derive = "PartialEq"
)]
#[serde(rename_all = "camelCase")]
pub struct PostgresClusterSpec {
    /// Owning team; prefixed into the cluster name by convention
    pub team_id: String,

    /// Desired number of Postgres pods
    pub number_of_instances: i32,

    pub postgresql: PostgresParams,

    pub volume: VolumeSpec,

    /// CIDRs admitted through the load balancer; unset means unrestricted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_source_ranges: Option<Vec<String>>,

    #[serde(default)]
    pub enable_master_load_balancer: bool,

    #[serde(default)]
    pub enable_logical_backup: bool,

    /// Cron expression overriding the default backup schedule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical_backup_schedule: Option<String>,

    /// Full image reference for the Postgres pods; the operator default
    /// applies when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker_image: Option<String>,
}

/// Observed state written back by the control loop
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostgresClusterStatus {
    pub phase: ClusterPhase,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,
}

impl PostgresCluster {
    /// Schedule for the logical backup job, falling back to the operator
    /// default when the manifest sets none
    pub fn backup_schedule(&self) -> &str {
        self.spec
            .logical_backup_schedule
            .as_deref()
            .unwrap_or(DEFAULT_LOGICAL_BACKUP_SCHEDULE)
    }

    /// Name of the cron job running logical backups for this cluster
    pub fn backup_job_name(&self) -> String {
        format!(
            "logical-backup-{}",
            self.metadata.name.as_deref().unwrap_or_default()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_deserialization() {
        let yaml = r#"
apiVersion: pgsteward.io/v1
kind: PostgresCluster
metadata:
  name: acid-minimal
  namespace: default
spec:
  teamId: acid
  numberOfInstances: 2
  postgresql:
    version: "16"
  volume:
    size: 10Gi
  enableLogicalBackup: true
  allowedSourceRanges:
    - 10.0.0.0/8
"#;
        let cluster: PostgresCluster = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cluster.spec.team_id, "acid");
        assert_eq!(cluster.spec.number_of_instances, 2);
        assert_eq!(cluster.spec.postgresql.version, "16");
        assert!(cluster.spec.enable_logical_backup);
        assert!(!cluster.spec.enable_master_load_balancer);
        assert_eq!(
            cluster.spec.allowed_source_ranges.as_deref(),
            Some(&["10.0.0.0/8".to_string()][..])
        );
    }

    #[test]
    fn test_backup_schedule_default() {
        let cluster = PostgresCluster::new("acid-minimal", PostgresClusterSpec::default());
        assert_eq!(cluster.backup_schedule(), DEFAULT_LOGICAL_BACKUP_SCHEDULE);

        let with_override = PostgresCluster::new(
            "acid-minimal",
            PostgresClusterSpec {
                logical_backup_schedule: Some("15 03 * * *".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(with_override.backup_schedule(), "15 03 * * *");
    }

    #[test]
    fn test_backup_job_name() {
        let cluster = PostgresCluster::new("acid-minimal", PostgresClusterSpec::default());
        assert_eq!(cluster.backup_job_name(), "logical-backup-acid-minimal");
    }

    #[test]
    fn test_status_serializes_phase() {
        let status = PostgresClusterStatus {
            phase: ClusterPhase::Running,
            observed_generation: Some(3),
        };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["phase"], "Running");
        assert_eq!(json["observedGeneration"], 3);
    }
}
