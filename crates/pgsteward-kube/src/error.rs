//! Error types and API error classification

use thiserror::Error;

/// Result type for pgsteward Kubernetes operations
pub type Result<T> = std::result::Result<T, KubeError>;

/// Errors that can occur while talking to or reasoning about the cluster
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum KubeError {
    /// Kubernetes API error
    #[error("Kubernetes API error: {0}")]
    Api(#[from] kube::Error),

    /// Client construction failed
    #[error("could not build Kubernetes client: {0}")]
    Connection(String),

    /// Canned store has no entry for the requested object
    #[error("{kind} '{name}' not found")]
    NotFound { kind: &'static str, name: String },

    /// Canned store was configured to fail this lookup
    #[error("lookup of '{name}' failed: {message}")]
    Canned { name: String, message: String },

    /// A cron job's pod template has no containers
    #[error("cron job '{name}' has no containers in its job template")]
    EmptyJobTemplate { name: String },
}

/// Outcome of classifying a raw API error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    AlreadyExists,
    NotFound,
    /// Anything the caller should treat as a real failure
    Other,
}

/// Map a raw API error onto the small set of outcomes the control loop
/// branches on. Status reason wins; a bare 404 without a recognizable
/// reason still counts as not-found. Unrecognized shapes are `Other` so
/// unknown failures are never silently absorbed.
pub fn classify(err: &kube::Error) -> ApiErrorKind {
    match err {
        kube::Error::Api(resp) => match resp.reason.as_str() {
            "NotFound" => ApiErrorKind::NotFound,
            "AlreadyExists" => ApiErrorKind::AlreadyExists,
            _ if resp.code == 404 => ApiErrorKind::NotFound,
            _ => ApiErrorKind::Other,
        },
        _ => ApiErrorKind::Other,
    }
}

/// Check if an API error reports that the object already exists
pub fn is_already_exists(err: &kube::Error) -> bool {
    classify(err) == ApiErrorKind::AlreadyExists
}

/// Check if an API error reports that the object does not exist
pub fn is_not_found(err: &kube::Error) -> bool {
    classify(err) == ApiErrorKind::NotFound
}

impl KubeError {
    /// Check if this error means the object does not exist, whether it came
    /// from the API server or from a canned store
    pub fn is_not_found(&self) -> bool {
        match self {
            KubeError::Api(err) => classify(err) == ApiErrorKind::NotFound,
            KubeError::NotFound { .. } => true,
            _ => false,
        }
    }

    /// Check if this error means the object already exists
    pub fn is_already_exists(&self) -> bool {
        matches!(self, KubeError::Api(err) if classify(err) == ApiErrorKind::AlreadyExists)
    }
}
