use super::common::{finder, write_file};
use bigdupe::duplicates::{DuplicateFinder, FinderConfig};
use bigdupe::scanner::{Hasher, WalkerConfig};
use tempfile::tempdir;

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();

    let report = finder(0).find_duplicates(dir.path()).unwrap();

    assert!(report.groups.is_empty());
    assert_eq!(report.stats.seen_files, 0);
    assert_eq!(report.stats.filtered_files, 0);
    assert_eq!(report.stats.wasted_space, 0);
}

#[test]
fn test_scan_unique_sizes() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a.bin", b"1");
    write_file(dir.path(), "b.bin", b"22");
    write_file(dir.path(), "c.bin", b"333");

    let report = finder(0).find_duplicates(dir.path()).unwrap();

    assert!(report.groups.is_empty());
    assert_eq!(report.stats.seen_files, 3);
    assert_eq!(report.stats.filtered_files, 3);
    assert_eq!(report.stats.duplicate_files, 0);
}

#[test]
fn test_scan_same_size_different_content() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a.bin", b"aaaa");
    write_file(dir.path(), "b.bin", b"bbbb");

    let report = finder(0).find_duplicates(dir.path()).unwrap();

    assert!(report.groups.is_empty());
    assert_eq!(report.stats.duplicate_groups, 0);
}

#[test]
fn test_scan_three_files_two_identical() {
    let dir = tempdir().unwrap();
    let a = write_file(dir.path(), "a.bin", &[7u8; 500]);
    let b = write_file(dir.path(), "nested/b.bin", &[7u8; 500]);
    let c = write_file(dir.path(), "c.bin", &[8u8; 500]);

    let report = finder(100).find_duplicates(dir.path()).unwrap();

    assert_eq!(report.groups.len(), 1);
    let (hash, group) = report.groups.iter().next().unwrap();
    let expected = Hasher::new().full_hash_hex(&a).unwrap();
    assert_eq!(hash, &expected);
    assert_eq!(group.len(), 2);
    assert!(group.paths().contains(&a));
    assert!(group.paths().contains(&b));
    assert!(!group.paths().contains(&c));
    assert_eq!(report.stats.wasted_space, 500);
    assert_eq!(report.stats.duplicate_files, 2);
}

#[test]
fn test_scan_multiple_groups_and_waste() {
    let dir = tempdir().unwrap();
    for i in 0..3 {
        write_file(dir.path(), &format!("big/{i}.bin"), &[1u8; 1000]);
    }
    for i in 0..2 {
        write_file(dir.path(), &format!("small/{i}.bin"), &[2u8; 10]);
    }
    write_file(dir.path(), "other.bin", &[3u8; 1000]);

    let report = finder(0).find_duplicates(dir.path()).unwrap();

    assert_eq!(report.groups.len(), 2);
    assert_eq!(report.stats.duplicate_files, 5);
    assert_eq!(report.stats.wasted_space, 2 * 1000 + 10);
    let computed: u64 = report.groups.values().map(|g| g.wasted_space()).sum();
    assert_eq!(computed, report.stats.wasted_space);
}

#[test]
fn test_group_members_share_size_and_hash() {
    let dir = tempdir().unwrap();
    for i in 0..4 {
        write_file(dir.path(), &format!("x{i}.bin"), &[i as u8 % 2; 64]);
    }

    let report = finder(0).find_duplicates(dir.path()).unwrap();

    for (hash, group) in &report.groups {
        assert!(group.len() >= 2);
        for file in &group.files {
            assert_eq!(file.size, group.size);
            assert_eq!(file.content_hash.as_deref(), Some(hash.as_str()));
            assert!(file.is_duplicate_candidate);
        }
    }
    assert!(report.stats.seen_files >= report.stats.filtered_files);
    assert!(report.stats.filtered_files >= report.stats.duplicate_files);
}

#[test]
fn test_group_order_is_stable() {
    let dir = tempdir().unwrap();
    for name in ["d.bin", "b.bin", "a.bin", "c.bin"] {
        write_file(dir.path(), name, b"identical");
    }

    let config = FinderConfig::default()
        .with_walker_config(WalkerConfig::new(0, Vec::new()))
        .with_io_threads(3);
    let report = DuplicateFinder::new(config)
        .find_duplicates(dir.path())
        .unwrap();

    let names: Vec<_> = report.groups.values().next().unwrap().files
        .iter()
        .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.bin", "b.bin", "c.bin", "d.bin"]);
}

#[test]
fn test_mmap_hashing_finds_same_groups() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a.bin", &[9u8; 4096]);
    write_file(dir.path(), "b.bin", &[9u8; 4096]);

    let streamed = finder(0).find_duplicates(dir.path()).unwrap();
    let mapped = DuplicateFinder::new(
        FinderConfig::default()
            .with_walker_config(WalkerConfig::new(0, Vec::new()))
            .with_mmap(true),
    )
    .find_duplicates(dir.path())
    .unwrap();

    assert_eq!(
        streamed.groups.keys().collect::<Vec<_>>(),
        mapped.groups.keys().collect::<Vec<_>>()
    );
}

#[cfg(unix)]
#[test]
fn test_symlink_to_file_is_followed() {
    let dir = tempdir().unwrap();
    let target = write_file(dir.path(), "real.bin", b"payload");
    std::os::unix::fs::symlink(&target, dir.path().join("alias.bin")).unwrap();

    let report = finder(0).find_duplicates(dir.path()).unwrap();

    // The link resolves to the same content and size as its target
    assert_eq!(report.stats.seen_files, 2);
    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.stats.wasted_space, 7);
}
