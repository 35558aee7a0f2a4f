//! Config file round trip and data-root discovery

use std::path::PathBuf;

use material_intensity::{find_data_root, Config, IntensityError, MatchPolicy};
use tempfile::TempDir;

#[test]
fn test_save_then_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("material-intensity.toml");

    let config = Config {
        database_name: "ecoinvent_310_cutoff".to_string(),
        data_root: Some(PathBuf::from("/srv/openLCA-data-1.4")),
        analysis: true,
        import: false,
        match_policy: MatchPolicy::Strict,
        ..Config::default()
    };
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.database_name, "ecoinvent_310_cutoff");
    assert_eq!(loaded.data_root, config.data_root);
    assert!(loaded.analysis);
    assert!(!loaded.import);
    assert_eq!(loaded.match_policy, MatchPolicy::Strict);
    assert_eq!(
        loaded.database_file(&PathBuf::from("/srv/openLCA-data-1.4")),
        PathBuf::from("/srv/openLCA-data-1.4/databases/ecoinvent_310_cutoff.db")
    );
}

#[test]
fn test_bad_file_is_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "analysis = \"maybe\"").unwrap();

    assert!(matches!(Config::load(&path), Err(IntensityError::Config(_))));
    assert!(matches!(
        Config::load(dir.path().join("absent.toml")),
        Err(IntensityError::Io(_))
    ));
}

#[test]
fn test_discovery_from_config_start() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("home").join("user").join("openLCA-data-1.4");
    std::fs::create_dir_all(target.join("databases")).unwrap();

    let config = Config {
        discovery_start: dir.path().to_path_buf(),
        ..Config::default()
    };
    assert_eq!(find_data_root(&config.discovery_start, &config.sentinel).unwrap(), target);
}
