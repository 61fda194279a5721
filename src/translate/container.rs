//! Container translation.
//!
//! Maps one container declaration (plus the pod-wide context it inherits:
//! hostname and PID-namespace policy) onto a single boot-image entry.
//! Fatal conditions are limited to dangling volume references; every
//! other partial-support case -- env indirection, unknown propagation or
//! limit names, unrepresentable cpu quantities, declared ports -- is
//! logged as a warning and the affected field dropped, never silently.

use crate::error::{Error, Result};
use crate::manifest::{IdValue, Image, ImageConfig, LinuxCpu, LinuxMemory, LinuxResources};
use crate::spec::{Container, PodSpec, VolumeMount};
use crate::translate::volume::VolumeTable;
use tracing::warn;

/// Bind mounted into every container so DNS resolution works.
pub const RESOLV_CONF_BIND: &str = "/etc/resolv.conf:/etc/resolv.conf";

/// PID namespace path used when a pod shares one PID namespace among its
/// own containers.
pub const SHARED_PID_NAMESPACE: &str = "/run/pidns/shared-namespace";

/// The default grant for a non-privileged container, in the order the
/// output list is emitted. An ordered slice rather than a set: the
/// manifest must serialize identically across runs.
pub const DEFAULT_CAPABILITIES: &[&str] = &[
    "CAP_SETPCAP",
    "CAP_MKNOD",
    "CAP_AUDIT_WRITE",
    "CAP_CHOWN",
    "CAP_NET_RAW",
    "CAP_DAC_OVERRIDE",
    "CAP_FOWNER",
    "CAP_FSETID",
    "CAP_KILL",
    "CAP_SETGID",
    "CAP_SETUID",
    "CAP_NET_BIND_SERVICE",
    "CAP_SYS_CHROOT",
    "CAP_SETFCAP",
];

// =============================================================================
// Capability Set
// =============================================================================

/// An ordered capability presence map.
///
/// Directives apply later-wins per capability name, but first-mention
/// order is preserved so the emitted list is deterministic.
#[derive(Debug, Clone)]
pub struct CapabilitySet {
    entries: Vec<(String, bool)>,
}

impl CapabilitySet {
    /// The fixed default grant.
    pub fn default_grant() -> Self {
        Self {
            entries: DEFAULT_CAPABILITIES
                .iter()
                .map(|name| (name.to_string(), true))
                .collect(),
        }
    }

    /// The privileged sentinel: a single "all" entry replacing the grant.
    pub fn all() -> Self {
        Self {
            entries: vec![("all".to_string(), true)],
        }
    }

    /// Marks a capability present or absent. The last directive for a
    /// name wins; a name's position in the output is where it was first
    /// mentioned.
    pub fn set(&mut self, name: String, present: bool) {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = present,
            None => self.entries.push((name, present)),
        }
    }

    /// The capabilities currently marked present, in declaration order.
    pub fn granted(self) -> Vec<String> {
        self.entries
            .into_iter()
            .filter_map(|(name, present)| present.then_some(name))
            .collect()
    }
}

// =============================================================================
// Container Translation
// =============================================================================

/// Translates one container declaration into a boot-image entry.
///
/// # Errors
///
/// [`Error::UnresolvedVolume`] when a volume mount references a name
/// absent from `volumes`. This aborts the whole run: a dangling mount
/// reference means the spec is malformed.
pub fn translate_container(
    container: &Container,
    pod: &PodSpec,
    volumes: &VolumeTable,
) -> Result<Image> {
    let mut config = ImageConfig {
        cwd: container.working_dir.clone().unwrap_or_default(),
        hostname: pod.hostname.clone().unwrap_or_default(),
        ..ImageConfig::default()
    };

    // Command override; the image's built-in entrypoint applies otherwise.
    if let Some(command) = &container.command {
        if !command.is_empty() {
            config.command = Some(command.clone());
        }
    }

    // Environment. Entries indirected through external references are
    // unimplemented: skipped with a warning, never a failure.
    let mut env = Vec::new();
    for entry in &container.env {
        if entry.value_from.is_some() {
            warn!(
                name = %entry.name,
                "valueFrom for environment variables not implemented; variable unset"
            );
            continue;
        }
        env.push(format!(
            "{}={}",
            entry.name,
            entry.value.as_deref().unwrap_or("")
        ));
    }
    if !env.is_empty() {
        config.env = Some(env);
    }
    if !container.env_from.is_empty() {
        warn!("envFrom not implemented; imported variables unset");
    }

    // Mounts, starting from the fixed DNS passthrough baseline.
    let mut binds = vec![RESOLV_CONF_BIND.to_string()];
    for mount in &container.volume_mounts {
        let (bind, propagation) = translate_mount(mount, volumes)?;
        if let Some(propagation) = propagation {
            // Last write wins, faithfully: a container with several
            // propagating mounts keeps the final one's mode.
            if let Some(old) = &config.rootfs_propagation {
                warn!(old = %old, new = %propagation, "overwriting rootfsPropagation value");
            }
            config.rootfs_propagation = Some(propagation.to_string());
        }
        binds.push(bind);
    }
    config.binds = Some(binds);

    // Capabilities and security flags.
    let mut capabilities = CapabilitySet::default_grant();
    if let Some(sc) = &container.security_context {
        if sc.privileged.unwrap_or(false) {
            capabilities = CapabilitySet::all();
        } else if let Some(directives) = &sc.capabilities {
            for name in &directives.add {
                capabilities.set(format!("CAP_{name}"), true);
            }
            for name in &directives.drop {
                capabilities.set(format!("CAP_{name}"), false);
            }
        }

        if let Some(uid) = sc.run_as_user {
            config.uid = Some(IdValue::Num(uid));
        }
        if let Some(gid) = sc.run_as_group {
            config.gid = Some(IdValue::Num(gid));
        }

        config.readonly = sc.read_only_root_filesystem;
        config.no_new_privileges = sc.allow_privilege_escalation;
    }
    let granted = capabilities.granted();
    if !granted.is_empty() {
        config.capabilities = Some(granted);
    }

    // PID namespace. The destination runtime defaults to a private PID
    // namespace per image, so only host and pod-shared modes are set.
    // Net, IPC, and UTS are never set: the runtime already shares those
    // across all images, which is what the pod model expects.
    if pod.host_pid {
        config.pid = "host".to_string();
    } else if pod.share_process_namespace.unwrap_or(false) {
        config.pid = SHARED_PID_NAMESPACE.to_string();
    }

    // Resource limits: cpu -> unscaled shares, memory -> bytes.
    let mut resources = LinuxResources::default();
    let mut resources_seen = false;
    for (name, limit) in &container.resources.limits {
        match name.as_str() {
            "cpu" => match limit.unscaled().and_then(|v| u64::try_from(v).ok()) {
                Some(shares) => {
                    resources.cpu = Some(LinuxCpu {
                        shares: Some(shares),
                        ..LinuxCpu::default()
                    });
                    resources_seen = true;
                }
                None => {
                    warn!(quantity = %limit, "couldn't convert cpu limit to an integer share count");
                }
            },
            "memory" => {
                resources.memory = Some(LinuxMemory {
                    limit: Some(limit.to_bytes()),
                    ..LinuxMemory::default()
                });
                resources_seen = true;
            }
            other => warn!(name = %other, "unknown limit name"),
        }
    }
    if resources_seen {
        config.resources = Some(resources);
    }

    // Ports are informational: the destination runtime leaves all ports
    // open, so exposure is only warned about, never written.
    for port in &container.ports {
        warn!(
            port = %port.name,
            number = port.container_port,
            "port exposure not enforced; all ports are already open"
        );
    }

    Ok(Image {
        name: container.name.clone(),
        image: container.image.clone(),
        config,
    })
}

/// Renders one volume mount as a `host:container[:opts]` bind string and
/// reports the propagation option it carries, if any.
fn translate_mount(
    mount: &VolumeMount,
    volumes: &VolumeTable,
) -> Result<(String, Option<&'static str>)> {
    let host_path = volumes
        .get(&mount.name)
        .ok_or_else(|| Error::UnresolvedVolume(mount.name.clone()))?;

    let mut options = Vec::new();
    if mount.read_only {
        options.push("ro");
    }

    let mut propagation = None;
    if let Some(mode) = &mount.mount_propagation {
        match mode.as_str() {
            "None" => {}
            "HostToContainer" => {
                propagation = Some("rslave");
                options.push("rslave");
            }
            "Bidirectional" => {
                propagation = Some("rshared");
                options.push("rshared");
            }
            other => warn!(value = %other, "unknown mount propagation value"),
        }
    }

    let mut bind = format!("{host_path}:{}", mount.mount_path);
    if !options.is_empty() {
        bind = format!("{bind}:{}", options.join(","));
    }

    Ok((bind, propagation))
}
