//! Drift detection between desired and observed cluster objects
//!
//! The control loop renders the object it wants, fetches the one that
//! exists, and asks here whether an update would change anything. Checks
//! run in priority order and stop at the first mismatch: the caller only
//! needs a go/no-go answer plus one line for the log, so a full structural
//! diff would be wasted work on every polling cycle.

use k8s_openapi::api::batch::v1::CronJob;
use k8s_openapi::api::core::v1::Service;
use k8s_openapi::api::policy::v1::PodDisruptionBudget;
use serde::{Deserialize, Serialize};

use crate::annotations;
use crate::error::{KubeError, Result};

/// Outcome of comparing an observed object with the desired one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchVerdict {
    /// Whether the observed object can stay as it is
    pub matches: bool,

    /// Reason for the first mismatching field; empty on a match
    pub reason: String,
}

impl MatchVerdict {
    pub fn matching() -> Self {
        Self {
            matches: true,
            reason: String::new(),
        }
    }

    pub fn mismatch(reason: impl Into<String>) -> Self {
        Self {
            matches: false,
            reason: reason.into(),
        }
    }
}

/// Compare the services the operator owns (master and replica endpoints).
///
/// Only fields the operator actually renders take part: the service type,
/// the load balancer source ranges, and the two control-plane annotations.
pub fn same_service(current: &Service, desired: &Service) -> MatchVerdict {
    let current_type = service_type(current);
    let desired_type = service_type(desired);
    if current_type != desired_type {
        return MatchVerdict::mismatch(format!(
            "service type {:?} does not match the current one {:?}",
            desired_type, current_type
        ));
    }

    let current_ranges = source_ranges(current);
    let desired_ranges = source_ranges(desired);
    // The API server serializes an empty source-range list as an absent
    // field, so two empty sides never count as drift.
    if (!current_ranges.is_empty() || !desired_ranges.is_empty())
        && current_ranges != desired_ranges
    {
        return MatchVerdict::mismatch(
            "load balancer source ranges do not match the current ones",
        );
    }

    for key in [annotations::DNS_NAME, annotations::LB_IDLE_TIMEOUT] {
        let current_value = annotations::annotation_or_default(&current.metadata, key);
        let desired_value = annotations::annotation_or_default(&desired.metadata, key);
        if current_value != desired_value {
            return MatchVerdict::mismatch(format!(
                "{:?} annotation value {:?} does not match the current one {:?}",
                key, desired_value, current_value
            ));
        }
    }

    MatchVerdict::matching()
}

/// Compare pod disruption budgets wholesale.
///
/// The spec block is atomic to the control loop; no caller acts on an
/// individual field of it, so there is no field-level diagnosis either.
pub fn same_disruption_budget(
    current: &PodDisruptionBudget,
    desired: &PodDisruptionBudget,
) -> MatchVerdict {
    if current.spec != desired.spec {
        return MatchVerdict::mismatch("disruption budget spec does not match the current one");
    }
    MatchVerdict::matching()
}

/// Compare logical backup cron jobs by schedule and container image.
///
/// Schedules are compared as raw strings; two cron expressions denoting
/// the same timetable still count as drift. Fails with
/// [`KubeError::EmptyJobTemplate`] when either side's pod template carries
/// no containers: a job without a container is a broken manifest, not
/// drift.
pub fn same_cron_job(current: &CronJob, desired: &CronJob) -> Result<MatchVerdict> {
    let current_schedule = schedule(current);
    let desired_schedule = schedule(desired);
    if current_schedule != desired_schedule {
        return Ok(MatchVerdict::mismatch(format!(
            "schedule {:?} does not match the current one {:?}",
            desired_schedule, current_schedule
        )));
    }

    let desired_image = first_container_image(desired)?;
    let current_image = first_container_image(current)?;
    if current_image != desired_image {
        return Ok(MatchVerdict::mismatch(format!(
            "image {:?} does not match the current one {:?}",
            desired_image, current_image
        )));
    }

    Ok(MatchVerdict::matching())
}

/// Image of the first container in the job's pod template.
///
/// The backup job the operator renders has exactly one container; a
/// template without any is reported as [`KubeError::EmptyJobTemplate`]. A
/// container with no image reads as the empty string.
pub fn first_container_image(job: &CronJob) -> Result<&str> {
    let containers = job
        .spec
        .as_ref()
        .and_then(|spec| spec.job_template.spec.as_ref())
        .and_then(|job_spec| job_spec.template.spec.as_ref())
        .map(|pod_spec| pod_spec.containers.as_slice())
        .unwrap_or_default();

    let first = containers
        .first()
        .ok_or_else(|| KubeError::EmptyJobTemplate {
            name: job.metadata.name.clone().unwrap_or_default(),
        })?;

    Ok(first.image.as_deref().unwrap_or(""))
}

fn schedule(job: &CronJob) -> &str {
    job.spec
        .as_ref()
        .map(|spec| spec.schedule.as_str())
        .unwrap_or("")
}

fn service_type(service: &Service) -> &str {
    service
        .spec
        .as_ref()
        .and_then(|spec| spec.type_.as_deref())
        .unwrap_or("")
}

fn source_ranges(service: &Service) -> &[String] {
    service
        .spec
        .as_ref()
        .and_then(|spec| spec.load_balancer_source_ranges.as_deref())
        .unwrap_or(&[])
}
