//! The translation engine: workload spec -> boot manifest.
//!
//! Translation is a single synchronous pass with no I/O:
//!
//! 1. Every declared volume is translated in order. This builds the
//!    volume name -> host path table and emits preparation images (steps
//!    that materialize a volume before anything mounts it) into the
//!    on-boot list.
//! 2. Every init container is translated in order and appended to the
//!    on-boot list, renamed so its ordinal position stays recoverable
//!    from the image name.
//! 3. Every regular container is translated in order into the services
//!    list.
//!
//! The volume table is the only shared state: written during phase 1,
//! read-only afterwards. The first error from any phase aborts the whole
//! run; no partial manifest is ever produced.

pub mod container;
pub mod volume;

pub use container::translate_container;
pub use volume::{translate_volume, VolumeTable};

use crate::error::Result;
use crate::manifest::BootManifest;
use crate::spec::PodSpec;

/// Translates a full pod-level workload spec into a boot manifest.
///
/// The on-boot list is omitted when empty; the services list is set only
/// when non-empty (the manifest schema renders the absent value as an
/// explicit `null` key).
pub fn translate_pod(spec: &PodSpec) -> Result<BootManifest> {
    let mut volumes = VolumeTable::new();
    let mut onboot = Vec::new();

    for volume in &spec.volumes {
        if let Some(prep) = translate_volume(volume, &mut volumes)? {
            onboot.push(prep);
        }
    }

    for (idx, init_container) in spec.init_containers.iter().enumerate() {
        let mut image = translate_container(init_container, spec, &volumes)?;
        image.name = format!("initContainer-{idx}-{}", init_container.name);
        onboot.push(image);
    }

    let mut services = Vec::new();
    for container in &spec.containers {
        let mut image = translate_container(container, spec, &volumes)?;
        image.name = format!("container-{}", container.name);
        services.push(image);
    }

    let mut manifest = BootManifest::default();
    if !onboot.is_empty() {
        manifest.onboot = Some(onboot);
    }
    if !services.is_empty() {
        manifest.services = Some(services);
    }

    Ok(manifest)
}
