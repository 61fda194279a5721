//! # pod2boot
//!
//! **Workload Spec to Boot Manifest Translation**
//!
//! This crate translates a single orchestration-level workload spec (a
//! pod descriptor: containers, init containers, volumes, security and
//! resource policy) into the declarative boot-image manifest consumed by
//! a minimal-Linux image builder. The manifest describes an ordered boot
//! sequence of container images, each annotated with runtime
//! configuration: namespaces, bind mounts, capabilities, resource limits.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                           pod2boot                              │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌───────────────────────────────────────────────────────────┐  │
//! │  │                   Resource Resolver                       │  │
//! │  │   (group, version, kind) ──► pod-spec extractor           │  │
//! │  └──────────────────────────┬────────────────────────────────┘  │
//! │                             │                                   │
//! │  ┌──────────────────────────┼────────────────────────────────┐  │
//! │  │                   Pod Translator                          │  │
//! │  │  volumes ──► name→path table + prep images (onboot)       │  │
//! │  │  init containers ──► onboot  │  containers ──► services   │  │
//! │  └──────────────────────────┬────────────────────────────────┘  │
//! │                             │                                   │
//! │  ┌──────────────────────────┼────────────────────────────────┐  │
//! │  │                 Container Translator                      │  │
//! │  │  command │ env │ mounts │ capabilities │ uid/gid │ pid    │  │
//! │  │  namespace │ cpu/memory limits │ readonly flags           │  │
//! │  └───────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Translation Model
//!
//! Translation is a pure function over one in-memory input to one
//! in-memory output: single-threaded, single-pass, no I/O, no partial
//! results. The same input always renders the same manifest byte for
//! byte -- the default capability grant is an ordered list, not a set,
//! precisely so output order is stable across runs.
//!
//! Fatal conditions (unresolvable kinds, dangling volume references,
//! unsupported volume sources) abort the run with the first error.
//! Partial-support conditions (env indirection, unknown propagation or
//! limit names, declared ports) log a `tracing` warning and continue
//! with the affected field dropped.
//!
//! # Example
//!
//! ```rust,ignore
//! use pod2boot::{resolve, translate_pod};
//!
//! let doc: serde_yaml::Value = serde_yaml::from_str(&input)?;
//! let (group, version) = resolve::split_api_version("apps/v1");
//! let extract = resolve::lookup(group, version, "Deployment")?;
//! let manifest = translate_pod(&extract(&doc)?)?;
//! println!("{}", serde_yaml::to_string(&manifest)?);
//! ```

pub mod error;
pub mod manifest;
pub mod quantity;
pub mod resolve;
pub mod spec;
pub mod translate;

// Re-exports
pub use error::{Error, Result};
pub use manifest::{BootManifest, Image, ImageConfig};
pub use quantity::Quantity;
pub use resolve::{lookup, split_api_version, Extractor};
pub use spec::{Container, PodSpec, Volume};
pub use translate::{translate_container, translate_pod, translate_volume, VolumeTable};
