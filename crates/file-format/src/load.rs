use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use reach_types::ReachabilityData;
use tracing::{debug, instrument};

use crate::errors::LoadError;
use crate::metadata::CacheMetadata;
use crate::save::{ReachabilityFile, FORMAT_MAGIC, FORMAT_VERSION};

/// Header read from the start of a blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Header {
    magic: [u8; 4],
    version: u32,
    flags: u32,
}

impl Header {
    fn read_from<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;

        let mut version_bytes = [0u8; 4];
        reader.read_exact(&mut version_bytes)?;

        let mut flags_bytes = [0u8; 4];
        reader.read_exact(&mut flags_bytes)?;

        Ok(Self {
            magic,
            version: u32::from_le_bytes(version_bytes),
            flags: u32::from_le_bytes(flags_bytes),
        })
    }

    fn validate(&self) -> Result<(), LoadError> {
        if self.magic != FORMAT_MAGIC {
            return Err(LoadError::UnknownFormat(self.magic));
        }
        if self.version > FORMAT_VERSION {
            return Err(LoadError::FutureVersion {
                file_version: self.version,
                supported_version: FORMAT_VERSION,
            });
        }
        if self.flags != 0 {
            debug!(flags = self.flags, "ignoring reserved header flags");
        }
        Ok(())
    }
}

/// Read a blob from any reader.
///
/// Validates the magic bytes and version, and migrates older payloads.
pub fn load_model_reader<R: Read>(
    reader: &mut R,
) -> Result<(ReachabilityData, CacheMetadata), LoadError> {
    let header = Header::read_from(reader)?;
    header.validate()?;

    let file: ReachabilityFile =
        bincode::deserialize_from(&mut *reader).map_err(|e| LoadError::Decode(e.to_string()))?;

    let file = if header.version < FORMAT_VERSION {
        crate::migrate::migrate(file, header.version, FORMAT_VERSION)?
    } else {
        file
    };

    check_consistent(&file.data)?;
    Ok((file.data, file.metadata))
}

/// Reject payloads that decode but could not have been produced by a run.
fn check_consistent(data: &ReachabilityData) -> Result<(), LoadError> {
    let [nx, ny, nz] = data.density.shape;
    let expected = nx
        .checked_mul(ny)
        .and_then(|n| n.checked_mul(nz))
        .ok_or_else(|| LoadError::Invalid(format!("density shape {:?} overflows", data.density.shape)))?;
    if data.density.values.len() != expected {
        return Err(LoadError::Invalid(format!(
            "density shape {:?} needs {expected} values, found {}",
            data.density.shape,
            data.density.values.len()
        )));
    }
    if let Some(v) = data.density.values.iter().find(|v| !(0.0..=1.0).contains(*v)) {
        return Err(LoadError::Invalid(format!("density value {v} outside [0, 1]")));
    }

    let scalars = [
        data.point_scale.scale,
        data.point_scale.offset,
        data.xyz_delta,
        data.quat_delta,
    ];
    if scalars.iter().any(|v| !v.is_finite()) {
        return Err(LoadError::Invalid("non-finite grid parameters".into()));
    }

    let bad_stat = data.stats.iter().position(|s| {
        s.pose
            .rotation
            .iter()
            .chain(s.pose.translation.iter())
            .any(|v| !v.is_finite())
    });
    if let Some(idx) = bad_stat {
        return Err(LoadError::Invalid(format!("stat {idx} has a non-finite pose")));
    }
    Ok(())
}

/// Decode a blob held in memory.
pub fn load_model_bytes(bytes: &[u8]) -> Result<(ReachabilityData, CacheMetadata), LoadError> {
    let mut cursor = bytes;
    load_model_reader(&mut cursor)
}

/// Read a blob from `path`.
#[instrument(fields(path = %path.as_ref().display()))]
pub fn load_model_file(
    path: impl AsRef<Path>,
) -> Result<(ReachabilityData, CacheMetadata), LoadError> {
    let file = File::open(path.as_ref())?;
    let mut reader = BufReader::new(file);
    load_model_reader(&mut reader)
}
