//! Error types for the translation engine.

/// Result type alias for translation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving or translating a workload spec.
///
/// Every variant here is fatal: the first one encountered aborts the run
/// and no partial manifest is produced. Partial-support conditions
/// (unknown mount propagation values, unimplemented env indirection,
/// unrepresentable cpu quantities) are not errors -- they are logged as
/// warnings and the affected field is dropped.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // =========================================================================
    // Resolver Errors
    // =========================================================================
    /// The workload object's API group is not registered.
    #[error("unknown group: {group}")]
    UnknownGroup { group: String },

    /// The group is registered but the version is not.
    #[error("unknown group/version: {group}/{version}")]
    UnknownVersion { group: String, version: String },

    /// The group and version are registered but the kind is not.
    #[error("unknown group/version/kind: {group}/{version}/{kind}")]
    UnknownKind {
        group: String,
        version: String,
        kind: String,
    },

    // =========================================================================
    // Translation Errors
    // =========================================================================
    /// A container mounts a volume name that no pod-level volume declares.
    #[error("failed to find volume in pod spec: {0}")]
    UnresolvedVolume(String),

    /// A declared volume is neither host-path nor empty-dir.
    #[error("unhandled volume type for volume: {0}")]
    UnsupportedVolume(String),

    // =========================================================================
    // Decode Errors
    // =========================================================================
    /// The input document is missing a field the dispatch layer needs.
    #[error("failed to decode workload: {0}")]
    Decode(String),

    /// YAML parse or typed-decode failure.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// I/O error reading the input document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
