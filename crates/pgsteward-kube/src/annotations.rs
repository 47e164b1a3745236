//! Service annotation keys with control-plane significance
//!
//! The operator publishes the master endpoint through external-dns and
//! fronts it with a cloud load balancer; both are driven by annotations on
//! the service it renders.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

/// DNS name published for the master service, consumed by external-dns
pub const DNS_NAME: &str = "external-dns.alpha.kubernetes.io/hostname";

/// Idle timeout for the cloud load balancer fronting the master service
pub const LB_IDLE_TIMEOUT: &str =
    "service.beta.kubernetes.io/aws-load-balancer-connection-idle-timeout";

/// Read an annotation value, treating a missing map or key as empty.
///
/// The control plane does not distinguish "annotation absent" from
/// "annotation present with an empty value".
pub fn annotation_or_default<'a>(meta: &'a ObjectMeta, key: &str) -> &'a str {
    meta.annotations
        .as_ref()
        .and_then(|annotations| annotations.get(key))
        .map(String::as_str)
        .unwrap_or("")
}
