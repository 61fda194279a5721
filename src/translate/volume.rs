//! Volume translation.
//!
//! Each pod-level volume resolves to an absolute host path, registered in
//! the shared [`VolumeTable`] that container translation later reads.
//! Volumes that need materializing before containers mount them (host
//! paths with a create-if-absent type tag, every empty-dir) additionally
//! yield a preparation image: a one-shot on-boot step running a single
//! `mkdir -p` or `touch` in a minimal static userspace image.

use crate::error::{Error, Result};
use crate::manifest::{Image, ImageConfig};
use crate::spec::Volume;
use std::collections::BTreeMap;

/// Host directory under which empty-dir volumes are synthesized.
pub const VOLUME_ROOT: &str = "/var/lib/volumes";

/// Image used for volume preparation steps.
pub const PREP_IMAGE: &str = "busybox:latest";

/// Volume name -> resolved absolute host path.
///
/// Built once per translation run during the volume phase; read-only for
/// the rest of the run. Every volume a container mounts must be present
/// here before that container is translated.
pub type VolumeTable = BTreeMap<String, String>;

/// Translates one volume declaration.
///
/// Registers the volume's host path in `table` and returns the
/// preparation image when one is needed, `None` otherwise.
///
/// # Errors
///
/// [`Error::UnsupportedVolume`] for any volume that is neither host-path
/// nor empty-dir.
pub fn translate_volume(volume: &Volume, table: &mut VolumeTable) -> Result<Option<Image>> {
    if let Some(host_path) = &volume.host_path {
        table.insert(volume.name.clone(), host_path.path.clone());

        // Only the create-if-absent type tags need a preparation step;
        // the existing-entity tags (Directory, File, Socket, CharDevice,
        // BlockDevice) and an absent tag do not.
        let command = match host_path.type_.as_deref() {
            Some("DirectoryOrCreate") => Some(vec![
                "mkdir".to_string(),
                "-p".to_string(),
                host_path.path.clone(),
            ]),
            Some("FileOrCreate") => Some(vec!["touch".to_string(), host_path.path.clone()]),
            _ => None,
        };

        Ok(command.map(|command| prep_image(&volume.name, command)))
    } else if volume.empty_dir.is_some() {
        let path = format!("{VOLUME_ROOT}/{}", volume.name);
        table.insert(volume.name.clone(), path.clone());

        let command = vec!["mkdir".to_string(), "-p".to_string(), path];
        Ok(Some(prep_image(&volume.name, command)))
    } else {
        Err(Error::UnsupportedVolume(volume.name.clone()))
    }
}

/// Builds a preparation image carrying nothing but a name and a command.
fn prep_image(volume_name: &str, command: Vec<String>) -> Image {
    Image {
        name: format!("create-volume-{volume_name}"),
        image: PREP_IMAGE.to_string(),
        config: ImageConfig {
            command: Some(command),
            ..ImageConfig::default()
        },
    }
}
