//! Configuration files driving the service end to end.

use onion_layers::commands::{Command, OnionService};
use onion_layers::config::{ConfigLoader, OnionConfig};
use onion_layers::error::OnionError;
use onion_layers::types::Rgb;
use onion_layers::Host;
use std::path::Path;
use tempfile::TempDir;

use crate::integration::Strip;

fn write_config(dir: &Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("onion.toml");
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn test_file_settings_reach_the_service() {
    let dir = TempDir::new().unwrap();
    let lock_path = dir.path().join("locks").join("onion.lock");
    std::fs::create_dir_all(lock_path.parent().unwrap()).unwrap();
    let file = write_config(
        dir.path(),
        &format!(
            r#"
[navigation]
neighbor_opacity = 40.0

[tint]
prefix = "skin-"
after = [0, 0, 255]

[lock]
path = "{}"
"#,
            lock_path.display()
        ),
    );

    let config = ConfigLoader::load_from_file(&file).unwrap();
    let lock = config.file_lock().unwrap();
    assert_eq!(lock.path(), lock_path.as_path());

    let service = OnionService::new(lock, config.settings());
    let mut strip = Strip::new(4, &["ink"]);
    service.run(&mut strip.host, Command::DownContext).unwrap();
    assert_eq!(strip.states()[0], (true, 40.0));

    service.run(&mut strip.host, Command::DownAutoTint).unwrap();
    let tint = strip.host.find_item_by_name("skin-after").unwrap().unwrap();
    assert_eq!(strip.host.parent(tint).unwrap(), Some(strip.frames[1]));
    assert_eq!(strip.host.fill_of(tint).unwrap(), Some(Rgb(0, 0, 255)));
    assert!(strip.host.find_item_by_name("onion-tint-after").unwrap().is_none());
}

#[test]
fn test_missing_lock_directory_fails_the_command() {
    let dir = TempDir::new().unwrap();
    let mut config = OnionConfig::default();
    config.lock.path = Some(dir.path().join("absent").join("onion.lock"));

    let service = OnionService::new(config.file_lock().unwrap(), config.settings());
    let mut strip = Strip::new(3, &["ink"]);
    let writes = strip.host.writes();

    let err = service.run(&mut strip.host, Command::Down).unwrap_err();
    assert!(matches!(err, OnionError::LockUnavailable { .. }));
    assert_eq!(strip.host.writes(), writes);
}

#[test]
fn test_unknown_keys_are_ignored_and_bad_values_rejected() {
    let dir = TempDir::new().unwrap();
    let file = write_config(dir.path(), "[navigation]\nradius = 2\nflavour = \"mint\"\n");
    let config = ConfigLoader::load_from_file(&file).unwrap();
    assert_eq!(config.navigation.radius, 2);
    assert_eq!(config.settings().navigation.radius, 2);

    let file = write_config(dir.path(), "[navigation]\nneighbor_opacity = 140.0\n");
    assert!(matches!(
        ConfigLoader::load_from_file(&file),
        Err(OnionError::ConfigError(_))
    ));

    let file = write_config(dir.path(), "[tint]\nprefix = \"\"\n");
    assert!(ConfigLoader::load_from_file(&file).is_err());
}

#[test]
fn test_effective_config_round_trips() {
    let dir = TempDir::new().unwrap();
    let mut config = OnionConfig::default();
    config.navigation.radius = 3;
    config.lock.path = Some(dir.path().join("onion.lock"));

    let text = toml::to_string_pretty(&config).unwrap();
    let file = write_config(dir.path(), &text);
    assert_eq!(ConfigLoader::load_from_file(&file).unwrap(), config);
}
