use dupsweep::config::{ScanConfig, SortMode};
use dupsweep::duplicates::DuplicateFinder;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

fn write_file(dir: &TempDir, rel: &str, content: &[u8]) -> PathBuf {
    let path = dir.path().join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path.canonicalize().unwrap()
}

fn find(config: ScanConfig) -> Vec<Vec<PathBuf>> {
    let (groups, _) = DuplicateFinder::new(config).find_duplicates().unwrap();
    groups.into_iter().map(|g| g.paths).collect()
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::new(ScanConfig::new(dir.path()).unwrap());

    let (groups, summary) = finder.find_duplicates().unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 0);
    assert_eq!(summary.duplicate_groups, 0);
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();
    write_file(&dir, "a.txt", b"content a");
    write_file(&dir, "b.txt", b"content b");
    write_file(&dir, "c.txt", b"content c!");

    let (groups, summary) = DuplicateFinder::new(ScanConfig::new(dir.path()).unwrap())
        .find_duplicates()
        .unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 3);
    assert_eq!(summary.candidates, 2);
}

#[test]
fn test_three_copies_and_a_unique_file() {
    let dir = tempdir().unwrap();
    let a = write_file(&dir, "a", b"x");
    let b = write_file(&dir, "b", b"x");
    let c = write_file(&dir, "c", b"x");
    write_file(&dir, "u", b"y");

    let groups = find(ScanConfig::new(dir.path()).unwrap());

    assert_eq!(groups, vec![vec![a, b, c]]);
}

#[test]
fn test_identical_files_converge_regardless_of_depth_and_name() {
    let dir = tempdir().unwrap();
    let content = b"the same bytes everywhere";
    let mut expected = vec![
        write_file(&dir, "top.bin", content),
        write_file(&dir, "one/renamed.dat", content),
        write_file(&dir, "one/two/three/deep", content),
        write_file(&dir, "other/branch/copy (1).bin", content),
    ];
    expected.sort();
    write_file(&dir, "one/two/noise", b"the same bytes everywherE");

    let groups = find(ScanConfig::new(dir.path()).unwrap().with_workers(3));

    assert_eq!(groups, vec![expected]);
}

#[test]
fn test_different_sizes_never_grouped() {
    let dir = tempdir().unwrap();
    write_file(&dir, "a", b"aa");
    write_file(&dir, "b", b"aaa");
    write_file(&dir, "c", b"aaaa");

    assert!(find(ScanConfig::new(dir.path()).unwrap()).is_empty());
}

#[test]
fn test_min_size_excludes_small_files() {
    let dir = tempdir().unwrap();
    write_file(&dir, "tiny1", b"1");
    write_file(&dir, "tiny2", b"1");
    let big1 = write_file(&dir, "big1", b"12345678");
    let big2 = write_file(&dir, "big2", b"12345678");

    let config = ScanConfig::new(dir.path())
        .unwrap()
        .with_size_range(Some(5), None);
    let (groups, summary) = DuplicateFinder::new(config).find_duplicates().unwrap();

    assert_eq!(summary.total_files, 2);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].paths, vec![big1, big2]);
}

#[test]
fn test_max_size_is_inclusive() {
    let dir = tempdir().unwrap();
    write_file(&dir, "a", b"1234");
    write_file(&dir, "b", b"1234");
    write_file(&dir, "c", b"12345");
    write_file(&dir, "d", b"12345");

    let config = ScanConfig::new(dir.path())
        .unwrap()
        .with_size_range(None, Some(4));
    let groups = find(config);

    assert_eq!(groups.len(), 1);
    assert!(groups[0].iter().all(|p| fs::metadata(p).unwrap().len() == 4));
}

#[test]
fn test_empty_files_are_duplicates() {
    let dir = tempdir().unwrap();
    let e1 = write_file(&dir, "empty1", b"");
    let e2 = write_file(&dir, "empty2", b"");

    assert_eq!(find(ScanConfig::new(dir.path()).unwrap()), vec![vec![e1, e2]]);
}

#[cfg(unix)]
#[test]
fn test_symlinks_never_candidates() {
    let dir = tempdir().unwrap();
    let target = write_file(&dir, "real.txt", b"linked content");
    std::os::unix::fs::symlink(&target, dir.path().join("link1.txt")).unwrap();
    std::os::unix::fs::symlink(&target, dir.path().join("link2.txt")).unwrap();
    std::os::unix::fs::symlink(dir.path().join("missing"), dir.path().join("dangling")).unwrap();

    let (groups, summary) = DuplicateFinder::new(ScanConfig::new(dir.path()).unwrap())
        .find_duplicates()
        .unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 1);
    assert!(!summary.has_errors());
}

#[cfg(unix)]
#[test]
fn test_symlinked_directory_not_descended() {
    let dir = tempdir().unwrap();
    write_file(&dir, "data/file.bin", b"payload");
    std::os::unix::fs::symlink(dir.path().join("data"), dir.path().join("mirror")).unwrap();

    assert!(find(ScanConfig::new(dir.path()).unwrap()).is_empty());
}

#[test]
fn test_sort_by_file_size() {
    let dir = tempdir().unwrap();
    write_file(&dir, "s1", b"s");
    write_file(&dir, "s2", b"s");
    write_file(&dir, "s3", b"s");
    write_file(&dir, "l1", b"large!");
    write_file(&dir, "l2", b"large!");

    let config = ScanConfig::new(dir.path())
        .unwrap()
        .with_sort_mode(SortMode::BySize);
    let (groups, _) = DuplicateFinder::new(config).find_duplicates().unwrap();

    assert_eq!(groups.iter().map(|g| g.size).collect::<Vec<_>>(), vec![6, 1]);
}

#[test]
fn test_default_order_is_by_keeper_path() {
    let dir = tempdir().unwrap();
    write_file(&dir, "zz/a", b"first");
    write_file(&dir, "zz/b", b"first");
    write_file(&dir, "aa/a", b"second");
    write_file(&dir, "aa/b", b"second");

    let groups = find(ScanConfig::new(dir.path()).unwrap());

    assert_eq!(groups.len(), 2);
    assert!(groups[0][0] < groups[1][0]);
    assert!(groups[0][0].ends_with(Path::new("aa/a")));
}

#[test]
fn test_results_stable_across_worker_counts() {
    let dir = tempdir().unwrap();
    for i in 0..20 {
        write_file(&dir, &format!("d{}/f{}", i % 4, i), format!("c{}", i % 5).as_bytes());
    }

    let single = find(ScanConfig::new(dir.path()).unwrap().with_workers(1));
    let many = find(ScanConfig::new(dir.path()).unwrap().with_workers(8));

    assert_eq!(single.len(), 5);
    assert_eq!(single, many);
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_is_skipped_not_fatal() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let a = write_file(&dir, "a", b"same");
    let b = write_file(&dir, "b", b"same");
    let locked = write_file(&dir, "locked", b"same");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Root ignores permission bits; nothing to observe then.
    if fs::File::open(&locked).is_ok() {
        return;
    }

    let (groups, summary) = DuplicateFinder::new(ScanConfig::new(dir.path()).unwrap())
        .find_duplicates()
        .unwrap();

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].paths, vec![a, b]);
    assert_eq!(summary.failed_files, 1);
    assert!(summary.has_errors());
}

#[cfg(unix)]
#[test]
fn test_unreadable_directory_under_exclude_is_silent() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let a = write_file(&dir, "a", b"same");
    let b = write_file(&dir, "b", b"same");
    write_file(&dir, "private/inner/c", b"same");
    let private = dir.path().join("private");
    fs::set_permissions(&private, fs::Permissions::from_mode(0o000)).unwrap();

    let config = ScanConfig::new(dir.path())
        .unwrap()
        .with_exclude(vec!["**/private/**".to_string()]);
    let (groups, summary) = DuplicateFinder::new(config).find_duplicates().unwrap();

    fs::set_permissions(&private, fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].paths, vec![a, b]);
    assert!(!summary.has_errors());
}
