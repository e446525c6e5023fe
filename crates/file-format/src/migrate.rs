use crate::errors::LoadError;
use crate::save::ReachabilityFile;

/// Bring a payload decoded at version `from` up to version `to`.
///
/// v1 is the first released layout, so any gap between versions is an error
/// until an upgrade step exists for it.
pub fn migrate(file: ReachabilityFile, from: u32, to: u32) -> Result<ReachabilityFile, LoadError> {
    match (from, to) {
        (a, b) if a == b => Ok(file),
        _ => Err(LoadError::MigrationFailed {
            from,
            to,
            reason: format!("no upgrade step from v{from}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::CacheMetadata;
    use reach_types::{DensityField, PointScale, ReachabilityData};

    fn empty_file() -> ReachabilityFile {
        ReachabilityFile {
            metadata: CacheMetadata::new("r", "h", "arm", 1.0, 0.0),
            data: ReachabilityData {
                stats: Vec::new(),
                density: DensityField::default(),
                point_scale: PointScale::new(1.0, 0.0),
                xyz_delta: 0.1,
                quat_delta: 0.0,
            },
        }
    }

    #[test]
    fn same_version_is_identity() {
        let file = empty_file();
        assert_eq!(migrate(file.clone(), 1, 1).unwrap(), file);
    }

    #[test]
    fn missing_upgrade_step_fails() {
        let err = migrate(empty_file(), 0, 1).unwrap_err();
        assert!(matches!(err, LoadError::MigrationFailed { from: 0, to: 1, .. }));
    }
}
