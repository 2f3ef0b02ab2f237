use listquill::config::Config;
use std::fs;

#[test]
fn test_config_defaults() {
    let config = Config::default();

    assert_eq!(config.indent_size, 2);
    assert!(!config.create_backup);
    assert_eq!(config.log_filter, "listquill=info");
    assert_eq!(config.max_optimize_passes, 16);
}

#[test]
fn test_config_path_location() {
    if let Some(path) = Config::config_path() {
        assert!(path.ends_with(".config/listquill/config.toml"));
    }
}

#[test]
fn test_missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load_from(dir.path().join("config.toml"));
    assert_eq!(config, Config::default());
}

#[test]
fn test_malformed_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "indent_size = \"wide\"").unwrap();
    assert_eq!(Config::load_from(&path), Config::default());
}

#[test]
fn test_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");
    let config = Config {
        indent_size: 4,
        create_backup: true,
        log_filter: "listquill=trace".to_string(),
        max_optimize_passes: 3,
    };

    config.save_to(&path).unwrap();
    assert_eq!(Config::load_from(&path), config);
}
