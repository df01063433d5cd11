//! Configuration file tests

use gamblebot::config::Config;
use gamblebot::error::PipelineError;
use rust_decimal_macros::dec;
use std::io::Write;

#[test]
fn test_example_config_loads() {
    let config: Config = toml::from_str(include_str!("../config.toml.example")).unwrap();
    assert_eq!(config.model.recent_window, 4);
    assert_eq!(config.staking.kelly_fraction, dec!(0.5));
    assert_eq!(config.odds.regions, "us,us2");
    assert!(config.odds.api_key.is_none());
    assert!(config.data.local_dir.is_none());
    assert!(config.validate().is_ok());
}

#[test]
fn test_load_partial_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[staking]\nkelly_fraction = 0.25\n\n[report]\ntop = 5").unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.staking.kelly_fraction, dec!(0.25));
    assert_eq!(config.staking.unit_size, dec!(1));
    assert_eq!(config.report.top, 5);
    assert_eq!(config.filter.positions, vec!["RB", "WR", "TE"]);
}

#[test]
fn test_invalid_kelly_is_configuration_error() {
    let config: Config = toml::from_str("[staking]\nkelly_fraction = 1.5").unwrap();
    assert!(matches!(config.validate(), Err(PipelineError::Configuration(_))));
}

#[test]
fn test_unknown_format_rejected() {
    let result: Result<Config, _> = toml::from_str("[telemetry]\nformat = \"xml\"");
    assert!(result.is_err());
}
