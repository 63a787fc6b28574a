use clap::Parser;
use dupsweep::cli::Cli;
use dupsweep::config::{default_worker_count, ConfigError, ScanConfig, Settings, SortMode};
use dupsweep::duplicates::DuplicateFinder;
use figment::Jail;
use std::fs;

fn cli(args: &[&str]) -> Cli {
    Cli::parse_from(std::iter::once("dupsweep").chain(args.iter().copied()))
}

#[test]
fn test_settings_file_feeds_the_scan() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "dupsweep.toml",
            r#"
                exclude = ["*.log"]
                min_size = "2"
                sort = "count"
            "#,
        )?;
        fs::create_dir("data").unwrap();
        for (name, content) in [("a.txt", "ab"), ("b.txt", "ab"), ("c.log", "ab"), ("d.txt", "a"), ("e.txt", "a")] {
            fs::write(jail.directory().join("data").join(name), content).unwrap();
        }

        let settings = Settings::load(Some(&jail.directory().join("dupsweep.toml"))).unwrap();
        let data = jail.directory().join("data");
        let config = ScanConfig::from_sources(&cli(&[data.to_str().unwrap()]), settings).unwrap();

        assert_eq!(config.sort_mode, SortMode::ByCount);
        assert_eq!(config.min_size, Some(2));

        let (groups, _) = DuplicateFinder::new(config).find_duplicates().unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 2);
        Ok(())
    });
}

#[test]
fn test_environment_overrides_file() {
    Jail::expect_with(|jail| {
        jail.create_file("dupsweep.toml", "threads = 2\nverify_content = false\n")?;
        jail.set_env("DUPSWEEP_THREADS", "6");
        jail.set_env("DUPSWEEP_VERIFY_CONTENT", "true");

        let settings = Settings::load(Some(&jail.directory().join("dupsweep.toml"))).unwrap();

        assert_eq!(settings.threads, Some(6));
        assert!(settings.verify_content);
        Ok(())
    });
}

#[test]
fn test_cli_flags_override_settings() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "dupsweep.toml",
            "include = [\"*.jpg\"]\nmax_size = \"1MiB\"\nsort = \"count\"\n",
        )?;
        let settings = Settings::load(Some(&jail.directory().join("dupsweep.toml"))).unwrap();
        let root = jail.directory().to_str().unwrap().to_string();

        let config = ScanConfig::from_sources(
            &cli(&[&root, "--include", "*.png", "--max-size", "10K", "--sort-by-file-size"]),
            settings,
        )
        .unwrap();

        assert_eq!(config.include, vec!["*.png".to_string()]);
        assert_eq!(config.max_size, Some(10_000));
        assert_eq!(config.sort_mode, SortMode::BySize);
        Ok(())
    });
}

#[test]
fn test_negative_threads_in_settings_file() {
    Jail::expect_with(|jail| {
        jail.create_file("dupsweep.toml", "threads = -1\n")?;
        fs::write(jail.directory().join("one"), "dup").unwrap();
        fs::write(jail.directory().join("two"), "dup").unwrap();

        let settings = Settings::load(Some(&jail.directory().join("dupsweep.toml"))).unwrap();
        let root = jail.directory().to_str().unwrap().to_string();
        let config = ScanConfig::from_sources(&cli(&[&root]), settings).unwrap();

        assert_eq!(config.worker_count(), default_worker_count());
        let (groups, _) = DuplicateFinder::new(config).find_duplicates().unwrap();
        assert_eq!(groups.len(), 1);
        Ok(())
    });
}

#[test]
fn test_unparseable_size_in_settings() {
    Jail::expect_with(|jail| {
        jail.create_file("dupsweep.toml", "min_size = \"12 parsecs\"\n")?;
        let settings = Settings::load(Some(&jail.directory().join("dupsweep.toml"))).unwrap();
        let root = jail.directory().to_str().unwrap().to_string();

        let err = ScanConfig::from_sources(&cli(&[&root]), settings).unwrap_err();

        assert!(matches!(err, ConfigError::InvalidSize(_)));
        Ok(())
    });
}

#[test]
fn test_bad_pattern_in_settings_rejected_up_front() {
    Jail::expect_with(|jail| {
        jail.create_file("dupsweep.toml", "exclude = [\"{unclosed\"]\n")?;
        let settings = Settings::load(Some(&jail.directory().join("dupsweep.toml"))).unwrap();
        let root = jail.directory().to_str().unwrap().to_string();

        let err = ScanConfig::from_sources(&cli(&[&root]), settings).unwrap_err();

        assert!(matches!(err, ConfigError::InvalidPattern { .. }));
        Ok(())
    });
}

#[test]
fn test_malformed_settings_file() {
    Jail::expect_with(|jail| {
        jail.create_file("dupsweep.toml", "threads = \"many\"\n")?;

        let err = Settings::load(Some(&jail.directory().join("dupsweep.toml"))).unwrap_err();

        assert!(matches!(err, ConfigError::Settings(_)));
        Ok(())
    });
}
