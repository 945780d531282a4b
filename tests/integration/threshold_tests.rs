use super::common::{finder, write_file};
use bigdupe::scanner::DEFAULT_MIN_SIZE;
use std::fs::File;
use tempfile::tempdir;

#[test]
fn test_files_at_threshold_are_excluded() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a.bin", &[1u8; 1000]);
    write_file(dir.path(), "b.bin", &[1u8; 1000]);

    let report = finder(1000).find_duplicates(dir.path()).unwrap();

    assert_eq!(report.stats.seen_files, 2);
    assert_eq!(report.stats.filtered_files, 0);
    assert!(report.groups.is_empty());
}

#[test]
fn test_files_one_byte_over_threshold_are_included() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a.bin", &[1u8; 1001]);
    write_file(dir.path(), "b.bin", &[1u8; 1001]);

    let report = finder(1000).find_duplicates(dir.path()).unwrap();

    assert_eq!(report.stats.filtered_files, 2);
    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.stats.wasted_space, 1001);
}

#[test]
fn test_empty_files_never_pass_zero_threshold() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "empty1", b"");
    write_file(dir.path(), "empty2", b"");

    // size 0 is never strictly larger than 0
    let report = finder(0).find_duplicates(dir.path()).unwrap();

    assert_eq!(report.stats.seen_files, 2);
    assert_eq!(report.stats.filtered_files, 0);
}

#[test]
fn test_default_threshold_boundary() {
    let dir = tempdir().unwrap();
    for name in ["at1.bin", "at2.bin"] {
        File::create(dir.path().join(name))
            .unwrap()
            .set_len(DEFAULT_MIN_SIZE)
            .unwrap();
    }
    for name in ["over1.bin", "over2.bin"] {
        File::create(dir.path().join(name))
            .unwrap()
            .set_len(DEFAULT_MIN_SIZE + 1)
            .unwrap();
    }

    let report = finder(DEFAULT_MIN_SIZE).find_duplicates(dir.path()).unwrap();

    assert_eq!(report.stats.seen_files, 4);
    assert_eq!(report.stats.filtered_files, 2);
    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.stats.wasted_space, DEFAULT_MIN_SIZE + 1);
}
