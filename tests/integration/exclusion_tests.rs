use super::common::{finder, write_file};
use bigdupe::duplicates::{DuplicateFinder, FinderConfig};
use bigdupe::scanner::WalkerConfig;
use std::fs;
use tempfile::tempdir;

fn finder_excluding(exclude: &[&str]) -> DuplicateFinder {
    let walker = WalkerConfig::new(0, exclude.iter().map(|s| (*s).to_string()).collect());
    DuplicateFinder::new(FinderConfig::default().with_walker_config(walker))
}

#[test]
fn test_default_excludes_skip_whole_subtrees() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "keep/a.bin", b"dup!");
    write_file(dir.path(), "keep/b.bin", b"dup!");
    write_file(dir.path(), "web/node_modules/pkg/a.bin", b"dup!");
    write_file(dir.path(), "web/node_modules/pkg/deep/b.bin", b"dup!");
    write_file(dir.path(), ".git/objects/pack.bin", b"dup!");
    write_file(dir.path(), "infra/.terraform/plugin.bin", b"dup!");

    let report = finder(0).find_duplicates(dir.path()).unwrap();

    assert_eq!(report.stats.seen_files, 2);
    let group = report.groups.values().next().unwrap();
    assert_eq!(group.len(), 2);
    for path in group.paths() {
        let text = path.to_string_lossy().into_owned();
        assert!(!text.contains("node_modules"));
        assert!(!text.contains(".git"));
        assert!(!text.contains(".terraform"));
    }
}

#[test]
fn test_suffix_must_match_whole_component() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "my_node_modules/a.bin", b"same");
    write_file(dir.path(), "node_modules_old/b.bin", b"same");

    let report = finder(0).find_duplicates(dir.path()).unwrap();

    assert_eq!(report.stats.seen_files, 2);
    assert_eq!(report.groups.len(), 1);
}

#[test]
fn test_excluded_file_is_never_counted() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a.bin", b"xx");
    write_file(dir.path(), "skip.me", b"xx");

    let report = finder_excluding(&["skip.me"])
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.stats.seen_files, 1);
    assert!(report.groups.is_empty());
}

#[test]
fn test_multi_component_suffix() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "build/cache/a.bin", b"zz");
    write_file(dir.path(), "cache/b.bin", b"zz");
    write_file(dir.path(), "c.bin", b"zz");

    let report = finder_excluding(&["build/cache"])
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.stats.seen_files, 2);
    assert_eq!(report.groups.values().next().unwrap().len(), 2);
}

#[test]
fn test_no_excludes_walks_everything() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "node_modules/a.bin", b"q");
    write_file(dir.path(), ".git/b.bin", b"q");

    let report = finder_excluding(&[]).find_duplicates(dir.path()).unwrap();

    assert_eq!(report.stats.seen_files, 2);
    assert_eq!(report.groups.len(), 1);
}

#[test]
fn test_excluded_root_yields_empty_report() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("node_modules");
    fs::create_dir(&root).unwrap();
    write_file(&root, "a.bin", b"same");
    write_file(&root, "b.bin", b"same");

    let report = finder(0).find_duplicates(&root).unwrap();

    assert_eq!(report.stats.seen_files, 0);
    assert!(report.groups.is_empty());
}
