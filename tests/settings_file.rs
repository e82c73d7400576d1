//! Loading focus settings from JSON files on disk.
use std::io::Write;

use focus_tracker::{FocusSettings, SettingsError};
use tempfile::NamedTempFile;

fn write_settings(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap_or_else(|e| panic!("temp file: {e}"));
    file.write_all(contents.as_bytes())
        .unwrap_or_else(|e| panic!("write settings: {e}"));
    file
}

#[test]
fn loads_every_field() {
    let file = write_settings(
        r#"{
            "focus_check_distance": 4.0,
            "distraction_delay": 1.5,
            "fade_duration": 0.25,
            "fog_max_alpha": 0.6
        }"#,
    );
    let settings = FocusSettings::load(file.path()).unwrap_or_else(|e| panic!("load: {e}"));
    assert_eq!(
        settings,
        FocusSettings {
            focus_check_distance: 4.0,
            distraction_delay: 1.5,
            fade_duration: 0.25,
            fog_max_alpha: 0.6,
        }
    );
}

#[test]
fn empty_object_yields_defaults() {
    let file = write_settings("{}");
    let settings = FocusSettings::load(file.path()).unwrap_or_else(|e| panic!("load: {e}"));
    assert_eq!(settings, FocusSettings::default());
}

#[test]
fn wrong_types_are_reported() {
    let file = write_settings(r#"{ "fade_duration": "slow" }"#);
    let err = FocusSettings::load(file.path());
    assert!(matches!(err, Err(SettingsError::Parse(_))));
}

#[test]
fn read_errors_name_the_path() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("temp dir: {e}"));
    let missing = dir.path().join("missing.json");
    let message = FocusSettings::load(&missing)
        .err()
        .map(|e| e.to_string())
        .unwrap_or_default();
    assert!(message.contains("missing.json"), "unexpected message: {message}");
}
