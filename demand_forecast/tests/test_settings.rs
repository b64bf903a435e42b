use demand_forecast::{ForecastError, ForecastSettings, Method};
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_settings_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"{{"last_available_year": 2019, "target_year": 2050, "forecast_method": "linear"}}"#
    )
    .unwrap();

    let settings = ForecastSettings::from_json_file(file.path()).unwrap();
    assert_eq!(settings.last_available_year, 2019.0);
    assert_eq!(settings.forecast_method, Method::Linear);
}

#[test]
fn test_missing_settings_file_keeps_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("settings.json");

    match ForecastSettings::from_json_file(&missing) {
        Err(ForecastError::IoError(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
        other => panic!("expected an IO error, got {:?}", other),
    }
}

#[test]
fn test_invalid_settings_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "not json").unwrap();

    assert!(matches!(
        ForecastSettings::from_json_file(file.path()),
        Err(ForecastError::Settings(_))
    ));
}
