//! Workload kind resolution.
//!
//! A decoded workload object arrives with a (group, version, kind)
//! triple; different kinds embed their pod-level spec at different
//! depths (a bare pod carries it directly, deployment-like kinds wrap a
//! pod template one level down). The resolver maps the triple to the
//! extraction function for that concrete shape.
//!
//! The registry is a flat static table rather than reflection: every
//! supported kind is listed explicitly, and an unregistered triple fails
//! with an error naming the first unmatched key (group, then version,
//! then kind) so the caller can report exactly what is unsupported.

use crate::error::{Error, Result};
use crate::spec::{Pod, PodSpec, TemplatedWorkload};

/// Extracts the embedded pod spec from a decoded workload object.
pub type Extractor = fn(&serde_yaml::Value) -> Result<PodSpec>;

/// Every workload kind the translator accepts. The legacy `extensions`
/// group and the `apps` beta versions carry the same shapes as `apps/v1`;
/// they stay distinct entries so registry membership matches the
/// orchestration API's actual published kinds.
static REGISTRY: &[(&str, &str, &str, Extractor)] = &[
    ("core", "v1", "Pod", extract_pod),
    ("apps", "v1", "Deployment", extract_templated),
    ("apps", "v1", "ReplicaSet", extract_templated),
    ("apps", "v1", "DaemonSet", extract_templated),
    ("apps", "v1beta1", "Deployment", extract_templated),
    ("apps", "v1beta2", "Deployment", extract_templated),
    ("apps", "v1beta2", "ReplicaSet", extract_templated),
    ("apps", "v1beta2", "DaemonSet", extract_templated),
    ("extensions", "v1beta1", "Deployment", extract_templated),
    ("extensions", "v1beta1", "ReplicaSet", extract_templated),
    ("extensions", "v1beta1", "DaemonSet", extract_templated),
];

/// Looks up the extractor for a (group, version, kind) triple.
///
/// # Errors
///
/// - [`Error::UnknownGroup`] when no registered kind lives in `group`.
/// - [`Error::UnknownVersion`] when the group exists but not the version.
/// - [`Error::UnknownKind`] when group and version exist but the kind
///   is not registered under them.
pub fn lookup(group: &str, version: &str, kind: &str) -> Result<Extractor> {
    let mut in_group = REGISTRY.iter().filter(|(g, _, _, _)| *g == group).peekable();
    if in_group.peek().is_none() {
        return Err(Error::UnknownGroup {
            group: group.to_string(),
        });
    }

    let mut in_version = in_group.filter(|(_, v, _, _)| *v == version).peekable();
    if in_version.peek().is_none() {
        return Err(Error::UnknownVersion {
            group: group.to_string(),
            version: version.to_string(),
        });
    }

    in_version
        .find(|(_, _, k, _)| *k == kind)
        .map(|(_, _, _, extract)| *extract)
        .ok_or_else(|| Error::UnknownKind {
            group: group.to_string(),
            version: version.to_string(),
            kind: kind.to_string(),
        })
}

/// Splits an `apiVersion` string into (group, version). A bare version
/// with no `/` belongs to the legacy core group.
pub fn split_api_version(api_version: &str) -> (&str, &str) {
    match api_version.split_once('/') {
        Some((group, version)) => (group, version),
        None => ("core", api_version),
    }
}

// =============================================================================
// Extractors
// =============================================================================

fn extract_pod(doc: &serde_yaml::Value) -> Result<PodSpec> {
    let pod: Pod = serde_yaml::from_value(doc.clone())?;
    Ok(pod.spec)
}

fn extract_templated(doc: &serde_yaml::Value) -> Result<PodSpec> {
    let workload: TemplatedWorkload = serde_yaml::from_value(doc.clone())?;
    Ok(workload.spec.template.spec)
}
