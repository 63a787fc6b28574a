use dupsweep::config::{ConfigError, ScanConfig};
use dupsweep::duplicates::{DuplicateFinder, FinderError};
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn populate(root: &std::path::Path) {
    for (rel, content) in [
        ("app.log", "log line"),
        ("old/app.log", "log line"),
        ("a.txt", "text body"),
        ("docs/b.txt", "text body"),
        ("img/c.jpg", "text body"),
        ("build/cache/a.txt", "text body"),
    ] {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
}

fn names(config: ScanConfig) -> Vec<Vec<String>> {
    let root = config.root.clone();
    let (groups, _) = DuplicateFinder::new(config).find_duplicates().unwrap();
    groups
        .into_iter()
        .map(|g| {
            g.paths
                .iter()
                .map(|p| p.strip_prefix(&root).unwrap().to_string_lossy().replace('\\', "/"))
                .collect()
        })
        .collect()
}

#[test]
fn test_exclude_drops_log_files() {
    let dir = tempdir().unwrap();
    populate(dir.path());

    let config = ScanConfig::new(dir.path())
        .unwrap()
        .with_exclude(vec!["*.log".to_string()]);
    let groups = names(config);

    assert_eq!(groups.len(), 1);
    assert!(groups[0].iter().all(|p| !p.ends_with(".log")));
}

#[test]
fn test_include_restricts_candidates() {
    let dir = tempdir().unwrap();
    populate(dir.path());

    let config = ScanConfig::new(dir.path())
        .unwrap()
        .with_include(vec!["*.txt".to_string()]);

    assert_eq!(
        names(config),
        vec![vec![
            "a.txt".to_string(),
            "build/cache/a.txt".to_string(),
            "docs/b.txt".to_string(),
        ]]
    );
}

#[test]
fn test_exclude_applies_after_include() {
    let dir = tempdir().unwrap();
    populate(dir.path());

    let config = ScanConfig::new(dir.path())
        .unwrap()
        .with_include(vec!["*.txt".to_string()])
        .with_exclude(vec!["*/build/*".to_string()]);

    assert_eq!(
        names(config),
        vec![vec!["a.txt".to_string(), "docs/b.txt".to_string()]]
    );
}

#[test]
fn test_star_crosses_directory_separators() {
    let dir = tempdir().unwrap();
    populate(dir.path());

    // The root itself is absolute, so a leading `*` must span it.
    let config = ScanConfig::new(dir.path())
        .unwrap()
        .with_include(vec!["*/img/*".to_string(), "*/docs/*".to_string()]);

    assert_eq!(
        names(config),
        vec![vec!["docs/b.txt".to_string(), "img/c.jpg".to_string()]]
    );
}

#[test]
fn test_excluding_everything_finds_nothing() {
    let dir = tempdir().unwrap();
    populate(dir.path());

    let config = ScanConfig::new(dir.path())
        .unwrap()
        .with_exclude(vec!["*".to_string()]);
    let (groups, summary) = DuplicateFinder::new(config).find_duplicates().unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 0);
}

#[test]
fn test_invalid_pattern_is_a_configuration_error() {
    let dir = tempdir().unwrap();
    let config = ScanConfig::new(dir.path())
        .unwrap()
        .with_include(vec!["[unclosed".to_string()]);

    let err = DuplicateFinder::new(config).find_duplicates().unwrap_err();

    assert!(matches!(
        err,
        FinderError::Config(ConfigError::InvalidPattern { .. })
    ));
}

#[test]
fn test_inverted_size_range_is_a_configuration_error() {
    let dir = tempdir().unwrap();
    let config = ScanConfig::new(dir.path())
        .unwrap()
        .with_size_range(Some(10), Some(5));

    let err = DuplicateFinder::new(config).find_duplicates().unwrap_err();

    assert!(matches!(
        err,
        FinderError::Config(ConfigError::InvalidSizeRange { min: 10, max: 5 })
    ));
}

#[test]
fn test_root_must_be_a_directory() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("plain.txt");
    fs::write(&file, "x").unwrap();

    assert!(matches!(
        ScanConfig::new(&file),
        Err(ConfigError::NotADirectory(_))
    ));
    assert!(matches!(
        ScanConfig::new(PathBuf::from("/definitely/not/here/dupsweep")),
        Err(ConfigError::PathNotFound(_))
    ));
}
