use super::common::{finder, write_file};
use bigdupe::duplicates::{FinderError, RunStats};
use bigdupe::scanner::{FileRecord, HashError, ScanError, Walker, WalkerConfig};
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_missing_candidates_are_dropped() {
    let records = vec![
        FileRecord::new(PathBuf::from("nonexistent_1.bin"), 100),
        FileRecord::new(PathBuf::from("nonexistent_2.bin"), 100),
    ];
    let mut stats = RunStats::start();
    stats.record_seen();
    stats.record_seen();

    let report = finder(0).process_records(records, stats).unwrap();

    assert!(report.groups.is_empty());
    assert_eq!(report.stats.hash_failures, 2);
    assert_eq!(report.stats.seen_files, 2);
    assert_eq!(report.stats.filtered_files, 2);
    for err in &report.hash_errors {
        assert!(
            matches!(err, HashError::NotFound(_)),
            "Expected NotFound HashError, got: {err:?}"
        );
    }
}

#[test]
fn test_candidate_deleted_after_walk() {
    let dir = tempdir().unwrap();
    let a = write_file(dir.path(), "a.bin", b"content");
    let b = write_file(dir.path(), "b.bin", b"content");
    let c = write_file(dir.path(), "c.bin", b"content");

    let mut stats = RunStats::start();
    let records = Walker::new(dir.path(), WalkerConfig::new(0, Vec::new()))
        .walk(&mut stats)
        .unwrap();
    fs::remove_file(&b).unwrap();

    let report = finder(0).process_records(records, stats).unwrap();

    assert_eq!(report.stats.seen_files, 3);
    assert_eq!(report.stats.filtered_files, 3);
    assert_eq!(report.stats.duplicate_files, 2);
    assert_eq!(report.stats.wasted_space, 7);
    assert_eq!(report.groups.values().next().unwrap().paths(), vec![a, c]);
    assert!(report.is_partial());
}

#[test]
fn test_missing_root_is_fatal() {
    let dir = tempdir().unwrap();
    let result = finder(0).find_duplicates(&dir.path().join("does-not-exist"));

    match result {
        Err(FinderError::Scan(ScanError::NotFound(_))) => {}
        other => panic!("Expected NotFound ScanError, got: {other:?}"),
    }
}

#[test]
fn test_file_root_is_fatal() {
    let dir = tempdir().unwrap();
    let file = write_file(dir.path(), "plain.bin", b"x");

    let result = finder(0).find_duplicates(&file);
    assert!(matches!(
        result,
        Err(FinderError::Scan(ScanError::NotADirectory(_)))
    ));
}

#[cfg(unix)]
#[test]
fn test_dangling_symlink_is_counted_and_skipped() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a.bin", b"dup");
    write_file(dir.path(), "b.bin", b"dup");
    std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("broken")).unwrap();

    let report = finder(0).find_duplicates(dir.path()).unwrap();

    assert_eq!(report.stats.seen_files, 3);
    assert_eq!(report.stats.stat_failures, 1);
    assert_eq!(report.groups.len(), 1);
    assert!(report.is_partial());
}

#[cfg(unix)]
#[test]
fn test_unreadable_subdirectory_is_skipped() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    write_file(dir.path(), "a.bin", b"dup");
    write_file(dir.path(), "b.bin", b"dup");
    let sub = dir.path().join("no_access");
    write_file(&sub, "hidden.bin", b"dup");
    fs::set_permissions(&sub, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can list it anyway; nothing to check then
    let listable = fs::read_dir(&sub).is_ok();
    let report = finder(0).find_duplicates(dir.path());

    fs::set_permissions(&sub, fs::Permissions::from_mode(0o755)).unwrap();

    let report = report.unwrap();
    if listable {
        assert_eq!(report.stats.seen_files, 3);
        return;
    }
    assert!(report.stats.walk_errors >= 1);
    assert_eq!(report.stats.seen_files, 2);
    assert_eq!(report.groups.values().next().unwrap().len(), 2);
    assert!(report.is_partial());
}

#[cfg(unix)]
#[test]
fn test_unreadable_candidate_is_dropped() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    write_file(dir.path(), "a.bin", b"dup");
    write_file(dir.path(), "b.bin", b"dup");
    let locked = write_file(dir.path(), "c.bin", b"dup");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    let readable = fs::File::open(&locked).is_ok();
    let report = finder(0).find_duplicates(dir.path()).unwrap();

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

    let group = report.groups.values().next().unwrap();
    if readable {
        assert_eq!(group.len(), 3);
        return;
    }
    assert_eq!(group.len(), 2);
    assert!(!group.paths().contains(&locked));
    assert_eq!(report.stats.hash_failures, 1);
    assert!(matches!(report.hash_errors[0], HashError::PermissionDenied(_)));
}
