//! Reachability cache blob writer.
//!
//! # File Format
//!
//! 1. **Magic bytes**: `RCH1` (4 bytes)
//! 2. **Version**: `u32` little-endian (4 bytes)
//! 3. **Flags**: `u32` little-endian (4 bytes), reserved, always 0
//! 4. **Payload**: bincode-encoded [`ReachabilityFile`]

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use reach_types::ReachabilityData;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::errors::SaveError;
use crate::metadata::CacheMetadata;

/// Magic bytes identifying a reachability cache blob.
pub const FORMAT_MAGIC: [u8; 4] = *b"RCH1";

/// Current file format version.
pub const FORMAT_VERSION: u32 = 1;

/// Header size in bytes (magic + version + flags).
pub const HEADER_SIZE: usize = 12;

/// The persisted payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReachabilityFile {
    pub metadata: CacheMetadata,
    pub data: ReachabilityData,
}

pub(crate) fn write_header<W: Write>(writer: &mut W, version: u32) -> std::io::Result<()> {
    writer.write_all(&FORMAT_MAGIC)?;
    writer.write_all(&version.to_le_bytes())?;
    writer.write_all(&0u32.to_le_bytes())?;
    Ok(())
}

/// Write a blob to any writer.
pub fn save_model_writer<W: Write>(
    data: &ReachabilityData,
    metadata: &CacheMetadata,
    writer: &mut W,
) -> Result<(), SaveError> {
    write_header(writer, FORMAT_VERSION)?;
    let file = ReachabilityFile {
        metadata: metadata.clone(),
        data: data.clone(),
    };
    bincode::serialize_into(&mut *writer, &file).map_err(|e| SaveError::Encode(e.to_string()))?;
    writer.flush()?;
    Ok(())
}

/// Encode a blob into memory.
pub fn save_model_bytes(
    data: &ReachabilityData,
    metadata: &CacheMetadata,
) -> Result<Vec<u8>, SaveError> {
    let mut buf = Vec::new();
    save_model_writer(data, metadata, &mut buf)?;
    Ok(buf)
}

/// Write a blob to `path`, creating parent directories as needed.
///
/// The blob is written to a sibling temporary file and renamed into place so
/// a failed write never leaves a truncated cache entry behind.
#[instrument(skip(data, metadata), fields(path = %path.as_ref().display()))]
pub fn save_model_file(
    data: &ReachabilityData,
    metadata: &CacheMetadata,
    path: impl AsRef<Path>,
) -> Result<(), SaveError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("pp.tmp");
    {
        let mut writer = BufWriter::new(File::create(&tmp)?);
        if let Err(e) = save_model_writer(data, metadata, &mut writer) {
            drop(writer);
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
    }
    fs::rename(&tmp, path)?;
    debug!(stats = data.stats.len(), voxels = data.density.len(), "saved reachability cache");
    Ok(())
}
