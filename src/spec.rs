//! Workload specification input types.
//!
//! These mirror the orchestration API's pod-level descriptor: the
//! containers, init containers, volumes, and pod-wide policy that the
//! translation engine consumes. Field names follow the API's camelCase
//! wire form; decoding is plain serde (unknown fields are ignored, which
//! is intentional -- the engine only reads what it translates).
//!
//! All of these types are read-only input. The engine never mutates a
//! decoded spec.

use crate::quantity::Quantity;
use serde::Deserialize;
use std::collections::BTreeMap;

// =============================================================================
// Pod Spec
// =============================================================================

/// A pod-level workload spec: the unit of translation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodSpec {
    /// Hostname applied to every image translated from this pod.
    pub hostname: Option<String>,
    /// Run all containers in the host PID namespace.
    #[serde(rename = "hostPID", default)]
    pub host_pid: bool,
    /// Share one PID namespace among the pod's own containers.
    pub share_process_namespace: Option<bool>,
    /// One-shot containers, run to completion in order before the rest.
    #[serde(default)]
    pub init_containers: Vec<Container>,
    /// Long-running containers.
    #[serde(default)]
    pub containers: Vec<Container>,
    /// Named volumes containers may mount.
    #[serde(default)]
    pub volumes: Vec<Volume>,
}

// =============================================================================
// Containers
// =============================================================================

/// A single container declaration within a pod.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    /// Container name (unique within the pod).
    #[serde(default)]
    pub name: String,
    /// Image reference (e.g. "nginx:1.25").
    #[serde(default)]
    pub image: String,
    /// Entrypoint override; the image's built-in entrypoint applies when absent.
    pub command: Option<Vec<String>>,
    /// Working directory inside the container.
    pub working_dir: Option<String>,
    /// Environment variable declarations.
    #[serde(default)]
    pub env: Vec<EnvVar>,
    /// Bulk environment imports (unimplemented passthrough, warned).
    #[serde(default)]
    pub env_from: Vec<EnvFromSource>,
    /// Volume mount points.
    #[serde(default)]
    pub volume_mounts: Vec<VolumeMount>,
    /// Per-container security policy.
    pub security_context: Option<SecurityContext>,
    /// Resource limits and requests.
    #[serde(default)]
    pub resources: ResourceRequirements,
    /// Declared ports (informational only; never enforced).
    #[serde(default)]
    pub ports: Vec<ContainerPort>,
}

/// One environment variable declaration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvVar {
    pub name: String,
    /// Literal value; empty when absent.
    pub value: Option<String>,
    /// External indirection (configMap/secret/field refs). Only presence
    /// matters here: entries carrying it are skipped with a warning.
    pub value_from: Option<EnvVarSource>,
}

/// Opaque env indirection source. Decoded for shape only.
#[derive(Debug, Clone, Deserialize)]
pub struct EnvVarSource {}

/// Opaque bulk env import source. Decoded for shape only.
#[derive(Debug, Clone, Deserialize)]
pub struct EnvFromSource {}

/// A container's reference to a pod-level volume.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeMount {
    /// Name of the pod-level volume to mount.
    pub name: String,
    /// Path inside the container.
    pub mount_path: String,
    /// Mount read-only.
    #[serde(default)]
    pub read_only: bool,
    /// Propagation mode: "None", "HostToContainer", or "Bidirectional".
    pub mount_propagation: Option<String>,
}

/// Declared container port. Carried through decoding only so the engine
/// can warn that port exposure is not enforced.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerPort {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub container_port: i32,
}

// =============================================================================
// Security Context
// =============================================================================

/// Per-container security policy.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityContext {
    /// Grant the container all capabilities.
    pub privileged: Option<bool>,
    /// Explicit capability add/drop lists applied over the default grant.
    pub capabilities: Option<Capabilities>,
    /// Numeric UID to run as.
    pub run_as_user: Option<i64>,
    /// Numeric GID to run as.
    pub run_as_group: Option<i64>,
    /// Mount the root filesystem read-only.
    pub read_only_root_filesystem: Option<bool>,
    /// Whether the process may gain more privileges than its parent.
    pub allow_privilege_escalation: Option<bool>,
}

/// Capability add/drop lists. Names are unprefixed ("NET_ADMIN", not
/// "CAP_NET_ADMIN"); the translator adds the prefix.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Capabilities {
    #[serde(default)]
    pub add: Vec<String>,
    #[serde(default)]
    pub drop: Vec<String>,
}

// =============================================================================
// Resources
// =============================================================================

/// Resource limits and requests. Only `limits` is translated; `requests`
/// is decoded so real workload documents round-trip through the decoder
/// but is otherwise ignored, like the original converter does.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceRequirements {
    #[serde(default)]
    pub limits: BTreeMap<String, Quantity>,
    #[serde(default)]
    pub requests: BTreeMap<String, Quantity>,
}

// =============================================================================
// Volumes
// =============================================================================

/// A pod-level named volume.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    /// Volume name, referenced by container volume mounts.
    pub name: String,
    /// Host filesystem path source.
    pub host_path: Option<HostPathVolume>,
    /// Ephemeral empty directory source.
    pub empty_dir: Option<EmptyDirVolume>,
}

/// Host-path volume source.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostPathVolume {
    /// Absolute path on the host.
    pub path: String,
    /// Optional type tag: "DirectoryOrCreate", "FileOrCreate",
    /// "Directory", "File", "Socket", "CharDevice", "BlockDevice".
    #[serde(rename = "type")]
    pub type_: Option<String>,
}

/// Empty-dir volume source. Decoded for shape only; the engine
/// synthesizes the host path itself.
#[derive(Debug, Clone, Deserialize)]
pub struct EmptyDirVolume {}

// =============================================================================
// Workload Wrappers
// =============================================================================
//
// Concrete shapes the resolver's extractors decode. A bare pod embeds its
// spec directly; deployment-like kinds wrap a pod template one level down.

/// A bare pod object.
#[derive(Debug, Clone, Deserialize)]
pub struct Pod {
    #[serde(default)]
    pub spec: PodSpec,
}

/// A pod template embedded in a wrapper kind.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PodTemplateSpec {
    #[serde(default)]
    pub spec: PodSpec,
}

/// The shared shape of deployment, replica-set, and daemon-set objects:
/// `spec.template` holds the pod template.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplatedWorkload {
    #[serde(default)]
    pub spec: TemplatedWorkloadSpec,
}

/// The `spec` block of a templated workload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplatedWorkloadSpec {
    #[serde(default)]
    pub template: PodTemplateSpec,
}
