use file_format::{
    load_model_bytes, load_model_file, save_model_bytes, save_model_file, CacheKey, CacheMetadata,
    CacheStore, LoadError, FORMAT_MAGIC, FORMAT_VERSION, HEADER_SIZE,
};
use reach_types::{DensityField, Pose, PointScale, ReachabilityData, ReachabilityStat};

// ── Helpers ──────────────────────────────────────────────────────────────

fn sample_data() -> ReachabilityData {
    let mut density = DensityField::zeros([3, 3, 3]);
    density.values[13] = 1.0;
    density.values[4] = 0.25;
    ReachabilityData {
        stats: vec![
            ReachabilityStat {
                pose: Pose::new([1.0, 0.0, 0.0, 0.0], [0.0, 0.0, 0.0]),
                solutions: 4,
            },
            ReachabilityStat {
                pose: Pose::new([0.0, 1.0, 0.0, 0.0], [-0.1, 0.0, 0.1]),
                solutions: 2,
            },
        ],
        density,
        point_scale: PointScale::new(10.0, 1.0),
        xyz_delta: 0.1,
        quat_delta: 0.47,
    }
}

fn sample_metadata() -> CacheMetadata {
    CacheMetadata::new("reference-arm", "deadbeef", "arm", 0.15, 1.5)
}

// ── Round trip ───────────────────────────────────────────────────────────

#[test]
fn bytes_round_trip_preserves_everything() {
    let data = sample_data();
    let meta = sample_metadata();
    let bytes = save_model_bytes(&data, &meta).unwrap();

    assert_eq!(&bytes[..4], &FORMAT_MAGIC);
    assert_eq!(&bytes[4..8], &FORMAT_VERSION.to_le_bytes());
    assert_eq!(&bytes[8..HEADER_SIZE], &[0, 0, 0, 0]);

    let (loaded, loaded_meta) = load_model_bytes(&bytes).unwrap();
    assert_eq!(loaded, data);
    assert_eq!(loaded_meta, meta);
}

#[test]
fn file_round_trip_creates_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/deeper/model.pp");
    save_model_file(&sample_data(), &sample_metadata(), &path).unwrap();
    assert!(path.is_file());
    assert!(!path.with_extension("pp.tmp").exists());

    let (loaded, _) = load_model_file(&path).unwrap();
    assert_eq!(loaded.total_solutions(), 6);
}

// ── Rejections ───────────────────────────────────────────────────────────

#[test]
fn bad_magic_is_unknown_format() {
    let mut bytes = save_model_bytes(&sample_data(), &sample_metadata()).unwrap();
    bytes[..4].copy_from_slice(b"NOPE");
    match load_model_bytes(&bytes) {
        Err(LoadError::UnknownFormat(magic)) => assert_eq!(&magic, b"NOPE"),
        other => panic!("expected UnknownFormat, got {other:?}"),
    }
}

#[test]
fn newer_version_is_rejected() {
    let mut bytes = save_model_bytes(&sample_data(), &sample_metadata()).unwrap();
    bytes[4..8].copy_from_slice(&(FORMAT_VERSION + 1).to_le_bytes());
    match load_model_bytes(&bytes) {
        Err(LoadError::FutureVersion {
            file_version,
            supported_version,
        }) => {
            assert_eq!(file_version, FORMAT_VERSION + 1);
            assert_eq!(supported_version, FORMAT_VERSION);
        }
        other => panic!("expected FutureVersion, got {other:?}"),
    }
}

#[test]
fn truncated_header_is_io_error() {
    let err = load_model_bytes(b"RCH").unwrap_err();
    assert!(matches!(err, LoadError::Io(_)));
}

#[test]
fn truncated_payload_fails_to_decode() {
    let bytes = save_model_bytes(&sample_data(), &sample_metadata()).unwrap();
    let cut = &bytes[..bytes.len() / 2];
    assert!(load_model_bytes(cut).is_err());
}

#[test]
fn density_length_must_match_shape() {
    let mut data = sample_data();
    data.density = DensityField {
        shape: [10, 10, 10],
        values: vec![0.5],
    };
    let bytes = save_model_bytes(&data, &sample_metadata()).unwrap();
    match load_model_bytes(&bytes) {
        Err(LoadError::Invalid(msg)) => assert!(msg.contains("1000")),
        other => panic!("expected Invalid, got {other:?}"),
    }
}

#[test]
fn non_finite_values_are_rejected() {
    let mut data = sample_data();
    data.stats[1].pose.translation[2] = f64::NAN;
    let bytes = save_model_bytes(&data, &sample_metadata()).unwrap();
    assert!(matches!(load_model_bytes(&bytes), Err(LoadError::Invalid(_))));

    let mut data = sample_data();
    data.density.values[0] = f64::INFINITY;
    let bytes = save_model_bytes(&data, &sample_metadata()).unwrap();
    assert!(matches!(load_model_bytes(&bytes), Err(LoadError::Invalid(_))));
}

#[test]
fn missing_file_reports_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_model_file(dir.path().join("absent.pp")).unwrap_err();
    assert!(err.is_not_found());
}

// ── Cache store ──────────────────────────────────────────────────────────

#[test]
fn cache_store_save_load_remove() {
    let dir = tempfile::tempdir().unwrap();
    let store = CacheStore::new(dir.path());
    let key = CacheKey::new("deadbeef", "arm");

    assert!(!store.contains(&key));
    assert!(store.load(&key).unwrap_err().is_not_found());

    let path = store.save(&key, &sample_data(), &sample_metadata()).unwrap();
    assert_eq!(path, dir.path().join("robot.deadbeef/reachability.arm.pp"));
    assert!(store.contains(&key));

    let (data, meta) = store.load(&key).unwrap();
    assert_eq!(data, sample_data());
    assert_eq!(meta.robot_hash, "deadbeef");

    assert!(store.remove(&key).unwrap());
    assert!(!store.remove(&key).unwrap());
}

#[test]
fn distinct_manipulators_get_distinct_entries() {
    let dir = tempfile::tempdir().unwrap();
    let store = CacheStore::new(dir.path());
    let left = CacheKey::new("deadbeef", "left");
    let right = CacheKey::new("deadbeef", "right");
    store.save(&left, &sample_data(), &sample_metadata()).unwrap();
    assert!(store.contains(&left));
    assert!(!store.contains(&right));
}
