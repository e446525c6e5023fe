/// Errors while reading a reachability cache blob.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read cache file: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown file format: magic bytes {0:?}")]
    UnknownFormat([u8; 4]),

    #[error("file version {file_version} is newer than supported version {supported_version}")]
    FutureVersion {
        file_version: u32,
        supported_version: u32,
    },

    #[error("migration failed from version {from} to {to}: {reason}")]
    MigrationFailed { from: u32, to: u32, reason: String },

    #[error("failed to decode payload: {0}")]
    Decode(String),

    #[error("inconsistent payload: {0}")]
    Invalid(String),
}

impl LoadError {
    /// True when the file simply does not exist yet.
    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadError::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}

/// Errors while writing a reachability cache blob.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("failed to write cache file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode payload: {0}")]
    Encode(String),
}
